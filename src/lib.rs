//! Stock AI client
//!
//! Typed client for the Stock AI backend plus the headless controllers of its
//! dashboard, chat, explorer and alert scheduler pages.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod refresh;
pub mod state;
pub mod storage;
pub mod views;

use app::{App, PageSnapshot};
use config::Config;
use error::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use views::Page;

/// Install the global tracing subscriber; `RUST_LOG` overrides the default filter
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stock_ai_client=debug,reqwest=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Load configuration, open `page` (or `symbol`'s detail) and return its state
pub async fn run(page: Option<Page>, symbol: Option<&str>) -> Result<PageSnapshot> {
    tracing::info!("Starting Stock AI client...");

    let config = Config::load()?;
    tracing::info!("Backend: {}", config.api_base_url);

    let mut app = App::new(config).await?;
    if let Some(user) = app.current_user() {
        tracing::info!("Logged in as {}", user.name);
    }

    match (page, symbol) {
        (_, Some(symbol)) => app.open_stock(symbol).await,
        (Some(page), None) if page != app.current_page() => app.show_page(page).await,
        _ => {}
    }

    Ok(app.snapshot())
}
