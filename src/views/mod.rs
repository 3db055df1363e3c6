//! View controllers
//!
//! Each page owns its state in a [`ViewCell`](crate::refresh::ViewCell) and
//! exposes it as a serializable snapshot. Turning snapshots into markup is the
//! frontend's job.

pub mod chat;
pub mod dashboard;
pub mod explorer;
pub mod format;
pub mod scheduler;

use crate::error::{ApiError, AppError, ErrorResponse};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use chat::{ChatState, ChatView};
pub use dashboard::{DashboardState, DashboardView};
pub use explorer::{ExplorerState, ExplorerView};
pub use scheduler::{SchedulerState, SchedulerView};

/// Page identifier used for navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    Dashboard,
    Chat,
    Explorer,
    Scheduler,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Dashboard, Page::Chat, Page::Explorer, Page::Scheduler];

    pub fn as_str(&self) -> &'static str {
        match self {
            Page::Dashboard => "dashboard",
            Page::Chat => "chat",
            Page::Explorer => "explorer",
            Page::Scheduler => "scheduler",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Page {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Page::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AppError::NotFound(format!("Unknown page '{}'", s)))
    }
}

/// Lifecycle shared by every page
#[async_trait]
pub trait View: Send + Sync {
    fn page(&self) -> Page;

    /// Load the page's initial data and start any background work
    async fn init(&mut self);

    /// Stop background work; later responses must not touch this view
    fn teardown(&mut self);
}

/// Load state of one region of a page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum Panel<T> {
    Idle,
    Loading,
    Ready(T),
    Failed(ErrorResponse),
}

impl<T> Default for Panel<T> {
    fn default() -> Self {
        Panel::Idle
    }
}

impl<T> Panel<T> {
    /// Failed panel showing `message` in place of the content
    pub fn failed(err: &ApiError, message: impl Into<String>) -> Self {
        let code = ErrorResponse::from(err).code;
        Panel::Failed(ErrorResponse::new(&code, message))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Panel::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Panel::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorResponse> {
        match self {
            Panel::Failed(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Danger,
}

/// Transient user-facing outcome of an action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}
