//! Top-level application controller

use crate::config::Config;
use crate::error::Result;
use crate::state::{AppContext, UserSession};
use crate::views::{
    ChatState, ChatView, DashboardState, DashboardView, ExplorerState, ExplorerView, Page,
    SchedulerState, SchedulerView, View,
};
use serde::Serialize;
use tracing::info;

pub const LOGIN_SUCCESS: &str = "Login successful!";
pub const REGISTER_SUCCESS: &str = "Registration successful! Please login.";

/// The page currently on screen
pub enum ActiveView {
    Dashboard(DashboardView),
    Chat(ChatView),
    Explorer(ExplorerView),
    Scheduler(SchedulerView),
}

impl ActiveView {
    fn new(page: Page, ctx: AppContext) -> Self {
        match page {
            Page::Dashboard => ActiveView::Dashboard(DashboardView::new(ctx)),
            Page::Chat => ActiveView::Chat(ChatView::new(ctx)),
            Page::Explorer => ActiveView::Explorer(ExplorerView::new(ctx)),
            Page::Scheduler => ActiveView::Scheduler(SchedulerView::new(ctx)),
        }
    }

    fn view_mut(&mut self) -> &mut dyn View {
        match self {
            ActiveView::Dashboard(v) => v,
            ActiveView::Chat(v) => v,
            ActiveView::Explorer(v) => v,
            ActiveView::Scheduler(v) => v,
        }
    }

    pub fn page(&self) -> Page {
        match self {
            ActiveView::Dashboard(_) => Page::Dashboard,
            ActiveView::Chat(_) => Page::Chat,
            ActiveView::Explorer(_) => Page::Explorer,
            ActiveView::Scheduler(_) => Page::Scheduler,
        }
    }
}

/// Serializable state of the page on screen
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "page", content = "state", rename_all = "lowercase")]
pub enum PageSnapshot {
    Dashboard(DashboardState),
    Chat(ChatState),
    Explorer(ExplorerState),
    Scheduler(SchedulerState),
}

/// Result of a login or registration
#[derive(Debug, Clone, Serialize)]
pub struct AuthOutcome {
    pub message: String,
    pub user: Option<UserSession>,
}

pub struct App {
    ctx: AppContext,
    active: ActiveView,
}

impl App {
    /// Restore the saved session and open the dashboard
    pub async fn new(config: Config) -> Result<Self> {
        let ctx = AppContext::new(config)?;
        ctx.session.rehydrate();

        let mut active = ActiveView::new(Page::Dashboard, ctx.clone());
        active.view_mut().init().await;

        Ok(Self { ctx, active })
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    pub fn current_page(&self) -> Page {
        self.active.page()
    }

    pub fn current_user(&self) -> Option<UserSession> {
        self.ctx.session.current()
    }

    /// Tear down the current page, then build and initialise `page`
    pub async fn show_page(&mut self, page: Page) {
        info!("Switching page: {} -> {}", self.active.page(), page);

        self.active.view_mut().teardown();
        self.active = ActiveView::new(page, self.ctx.clone());
        self.active.view_mut().init().await;
    }

    /// Open the explorer on `symbol`'s detail
    pub async fn open_stock(&mut self, symbol: &str) {
        if self.active.page() != Page::Explorer {
            self.show_page(Page::Explorer).await;
        }
        if let ActiveView::Explorer(explorer) = &self.active {
            explorer.show_stock_detail(symbol).await;
        }
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<AuthOutcome> {
        info!("Login attempt for {}", email);

        let response = self.ctx.api.auth().login(email, password).await?;
        let session = UserSession::from(response.user);
        self.ctx.session.establish(session.clone())?;

        info!("User {} logged in", session.id);

        if let ActiveView::Scheduler(scheduler) = &self.active {
            scheduler.load_alerts().await;
        }

        Ok(AuthOutcome {
            message: LOGIN_SUCCESS.to_string(),
            user: Some(session),
        })
    }

    /// Create an account; the user still has to log in afterwards
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<AuthOutcome> {
        let created = self.ctx.api.auth().register(name, email, password).await?;
        info!("Registered user {}", created.id);

        Ok(AuthOutcome {
            message: REGISTER_SUCCESS.to_string(),
            user: None,
        })
    }

    /// Forget the session; the alerts page is left for the dashboard
    pub async fn logout(&mut self) -> Result<()> {
        self.ctx.session.clear()?;
        info!("User logged out");

        if self.active.page() == Page::Scheduler {
            self.show_page(Page::Dashboard).await;
        }
        Ok(())
    }

    pub fn dashboard(&self) -> Option<&DashboardView> {
        match &self.active {
            ActiveView::Dashboard(v) => Some(v),
            _ => None,
        }
    }

    pub fn chat(&self) -> Option<&ChatView> {
        match &self.active {
            ActiveView::Chat(v) => Some(v),
            _ => None,
        }
    }

    pub fn explorer(&self) -> Option<&ExplorerView> {
        match &self.active {
            ActiveView::Explorer(v) => Some(v),
            _ => None,
        }
    }

    pub fn scheduler(&self) -> Option<&SchedulerView> {
        match &self.active {
            ActiveView::Scheduler(v) => Some(v),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> PageSnapshot {
        match &self.active {
            ActiveView::Dashboard(v) => PageSnapshot::Dashboard(v.snapshot()),
            ActiveView::Chat(v) => PageSnapshot::Chat(v.snapshot()),
            ActiveView::Explorer(v) => PageSnapshot::Explorer(v.snapshot()),
            ActiveView::Scheduler(v) => PageSnapshot::Scheduler(v.snapshot()),
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.active.view_mut().teardown();
    }
}
