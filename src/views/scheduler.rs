//! Scheduled market-analysis alerts

use crate::api::types::{NextRuns, Scheduler, SchedulerCreate, SchedulerUpdate, TriggerTime};
use crate::error::Result;
use crate::refresh::ViewCell;
use crate::state::AppContext;
use crate::views::format::format_datetime;
use crate::views::{Notice, NoticeLevel, Page, Panel, View};
use async_trait::async_trait;
use serde::Serialize;
use tracing::{error, info, warn};

pub const DEFAULT_ALERT_PROMPT: &str = "Provide a comprehensive market analysis";

/// Split a comma-separated symbol list: trimmed, upper-cased, empties dropped
pub fn parse_symbols(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertRow {
    pub id: String,
    pub trigger_time: TriggerTime,
    pub trigger_label: String,
    pub prompt: String,
    pub symbols: Vec<String>,
    pub is_active: bool,
    pub status: String,
    pub next_run: String,
}

impl From<&Scheduler> for AlertRow {
    fn from(s: &Scheduler) -> Self {
        Self {
            id: s.id.clone(),
            trigger_time: s.trigger_time,
            trigger_label: s.trigger_time.label().to_string(),
            prompt: s.prompt.clone(),
            symbols: s.symbols.clone(),
            is_active: s.is_active,
            status: if s.is_active { "Active" } else { "Paused" }.to_string(),
            next_run: s
                .next_run
                .as_deref()
                .map(format_datetime)
                .unwrap_or_else(|| "N/A".to_string()),
        }
    }
}

/// Next fire time of each trigger, formatted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NextRunsInfo {
    pub morning: String,
    pub evening: String,
}

impl From<&NextRuns> for NextRunsInfo {
    fn from(runs: &NextRuns) -> Self {
        let fmt = |trigger| {
            runs.for_trigger(trigger)
                .map(format_datetime)
                .unwrap_or_else(|| "N/A".to_string())
        };
        Self {
            morning: fmt(TriggerTime::Morning),
            evening: fmt(TriggerTime::Evening),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SchedulerState {
    pub logged_in: bool,
    pub next_runs: Panel<NextRunsInfo>,
    pub alerts: Panel<Vec<AlertRow>>,
    /// Outcomes not yet shown to the user, oldest first
    pub notices: Vec<Notice>,
}

pub struct SchedulerView {
    ctx: AppContext,
    state: ViewCell<SchedulerState>,
}

impl SchedulerView {
    pub fn new(ctx: AppContext) -> Self {
        let logged_in = ctx.session.is_logged_in();
        Self {
            ctx,
            state: ViewCell::new(SchedulerState {
                logged_in,
                ..SchedulerState::default()
            }),
        }
    }

    fn notify(&self, level: NoticeLevel, message: impl Into<String>) {
        let notice = Notice::new(level, message);
        self.state.update(|s| s.notices.push(notice));
    }

    pub async fn load_next_runs(&self) {
        self.state.update(|s| s.next_runs = Panel::Loading);
        let result = self.ctx.api.scheduler().next_runs().await;
        self.state.update(|s| {
            s.next_runs = match result {
                Ok(runs) => Panel::Ready(NextRunsInfo::from(&runs)),
                Err(e) => {
                    error!("Failed to load next runs: {}", e);
                    Panel::failed(&e, e.message())
                }
            };
        });
    }

    /// Reload the user's alerts; does nothing when logged out
    pub async fn load_alerts(&self) {
        let Some(user_id) = self.ctx.session.user_id() else {
            self.state.update(|s| {
                s.logged_in = false;
                s.alerts = Panel::Idle;
            });
            return;
        };

        self.state.update(|s| {
            s.logged_in = true;
            s.alerts = Panel::Loading;
        });

        let result = self.ctx.api.scheduler().user_schedulers(&user_id).await;
        self.state.update(|s| {
            s.alerts = match result {
                Ok(list) => Panel::Ready(list.schedulers.iter().map(AlertRow::from).collect()),
                Err(e) => {
                    error!("Failed to load schedulers: {}", e);
                    Panel::failed(&e, format!("Failed to load schedulers: {}", e.message()))
                }
            };
        });
    }

    /// Create an active alert for the logged-in user
    ///
    /// Fails with an auth error when nobody is logged in; backend failures
    /// are reported as a notice.
    pub async fn create_alert(&self, trigger_time: TriggerTime, symbols: &str, prompt: &str) -> Result<()> {
        let session = self.ctx.session.require_auth()?;

        let prompt = prompt.trim();
        let request = SchedulerCreate {
            user_id: session.id,
            trigger_time,
            symbols: parse_symbols(symbols),
            prompt: if prompt.is_empty() {
                DEFAULT_ALERT_PROMPT.to_string()
            } else {
                prompt.to_string()
            },
            is_active: true,
        };

        match self.ctx.api.scheduler().create(&request).await {
            Ok(created) => {
                info!("Created {} alert {}", created.trigger_time.as_str(), created.id);
                self.notify(NoticeLevel::Success, "Alert created successfully!");
                self.load_alerts().await;
            }
            Err(e) => {
                self.notify(NoticeLevel::Danger, format!("Failed to create alert: {}", e.message()));
            }
        }
        Ok(())
    }

    /// Activate or pause an alert; the list is reloaded either way
    pub async fn toggle_alert(&self, id: &str, is_active: bool) {
        match self
            .ctx
            .api
            .scheduler()
            .update(id, &SchedulerUpdate::active(is_active))
            .await
        {
            Ok(_) => {
                let verb = if is_active { "activated" } else { "paused" };
                self.notify(NoticeLevel::Success, format!("Alert {}", verb));
            }
            Err(e) => {
                self.notify(NoticeLevel::Danger, format!("Failed to update alert: {}", e.message()));
            }
        }
        self.load_alerts().await;
    }

    pub async fn delete_alert(&self, id: &str) {
        match self.ctx.api.scheduler().delete(id).await {
            Ok(_) => {
                info!("Deleted alert {}", id);
                self.notify(NoticeLevel::Success, "Alert deleted");
                self.load_alerts().await;
            }
            Err(e) => {
                self.notify(NoticeLevel::Danger, format!("Failed to delete alert: {}", e.message()));
            }
        }
    }

    /// Run an alert immediately
    pub async fn test_alert(&self, id: &str) {
        self.notify(NoticeLevel::Info, "Running test alert...");
        match self.ctx.api.scheduler().test(id).await {
            Ok(result) if result.email_sent => {
                self.notify(NoticeLevel::Success, "Test alert sent to your email!");
            }
            Ok(_) => {
                warn!("Test alert {} ran without sending email", id);
                self.notify(NoticeLevel::Warning, "Test completed but email not configured");
            }
            Err(e) => {
                self.notify(NoticeLevel::Danger, format!("Test failed: {}", e.message()));
            }
        }
    }

    /// Remove and return pending notices
    pub fn take_notices(&self) -> Vec<Notice> {
        let mut notices = Vec::new();
        self.state.update(|s| notices = std::mem::take(&mut s.notices));
        notices
    }

    pub fn snapshot(&self) -> SchedulerState {
        self.state.snapshot()
    }
}

#[async_trait]
impl View for SchedulerView {
    fn page(&self) -> Page {
        Page::Scheduler
    }

    async fn init(&mut self) {
        if self.ctx.session.is_logged_in() {
            tokio::join!(self.load_next_runs(), self.load_alerts());
        } else {
            self.load_next_runs().await;
        }
    }

    fn teardown(&mut self) {
        self.state.close();
    }
}
