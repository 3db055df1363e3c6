//! View lifecycle plumbing
//!
//! - `RefreshHandle` - periodic re-fetch bound to a view, stopped on teardown
//! - `RequestGeneration` - drops responses superseded by a newer request
//! - `ViewCell` - view state shared with background tasks, inert after close

mod auto_refresh;
mod cell;
mod generation;

pub use auto_refresh::RefreshHandle;
pub use cell::ViewCell;
pub use generation::{RequestGeneration, Ticket};
