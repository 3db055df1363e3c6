//! Backend API client
//!
//! [`ApiClient`] issues requests; the per-area accessors (`auth()`, `chat()`,
//! `market()`, `stocks()`, `search()`, `scheduler()`) build endpoint paths and
//! delegate to its verb helpers.

pub mod client;
pub mod endpoints;
pub mod types;

mod auth;
mod chat;
mod market;
mod scheduler;
mod search;
mod stocks;

pub use auth::AuthApi;
pub use chat::ChatApi;
pub use client::{merge_headers, normalize_response, ApiClient, RequestOptions};
pub use endpoints::{Endpoint, HttpMethod, Query};
pub use market::{movers_path, MarketApi, DEFAULT_MOVERS_LIMIT};
pub use scheduler::SchedulerApi;
pub use search::{search_path, SearchApi, DEFAULT_SEARCH_LIMIT};
pub use stocks::{history_path, StocksApi, DEFAULT_INTERVAL, DEFAULT_PERIOD};
