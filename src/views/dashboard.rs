//! Market dashboard: indices, top movers and the AI market summary

use crate::api::types::{IndexQuote, MarketSummary, Mover};
use crate::api::ApiClient;
use crate::error::ErrorResponse;
use crate::refresh::{RefreshHandle, RequestGeneration, ViewCell};
use crate::state::AppContext;
use crate::views::format::{format_number, format_percent, format_price, format_signed, format_time};
use crate::views::{Page, Panel, View};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info};

pub const MARKET_DATA_ERROR: &str = "Failed to load market data";
pub const AI_SUMMARY_ERROR: &str =
    "Unable to generate AI summary. Please ensure the OpenAI API key is configured.";

/// One card in the indices strip
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexCard {
    pub symbol: String,
    pub name: String,
    pub price: String,
    pub change: String,
    pub change_percent: String,
    pub positive: bool,
}

impl From<&IndexQuote> for IndexCard {
    fn from(q: &IndexQuote) -> Self {
        Self {
            symbol: q.symbol.clone(),
            name: q.name.clone(),
            price: format_number(q.price),
            change: format_signed(q.change),
            change_percent: format_percent(q.change_percent),
            positive: q.change >= 0.0,
        }
    }
}

/// One row of a gainers/losers table; selecting it opens the stock detail
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoverRow {
    pub symbol: String,
    pub name: String,
    pub price: String,
    pub change: String,
    pub change_percent: String,
    pub positive: bool,
}

impl From<&Mover> for MoverRow {
    fn from(m: &Mover) -> Self {
        Self {
            symbol: m.symbol.clone(),
            name: m.name.clone().unwrap_or_default(),
            price: format_price(m.price),
            change: format_signed(m.change),
            change_percent: format_percent(m.change_percent),
            positive: m.change >= 0.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardState {
    pub market_status: Option<String>,
    pub last_updated: Option<String>,
    pub indices: Panel<Vec<IndexCard>>,
    pub gainers: Panel<Vec<MoverRow>>,
    pub losers: Panel<Vec<MoverRow>>,
    pub ai_summary: Panel<String>,
}

impl DashboardState {
    fn loading() -> Self {
        Self {
            indices: Panel::Loading,
            gainers: Panel::Loading,
            losers: Panel::Loading,
            ai_summary: Panel::Loading,
            ..Self::default()
        }
    }

    fn apply_summary(&mut self, summary: &MarketSummary) {
        self.market_status = Some(summary.market_status.clone()).filter(|s| !s.is_empty());
        self.indices = Panel::Ready(summary.major_indices.iter().map(IndexCard::from).collect());
        self.gainers = Panel::Ready(summary.top_gainers.iter().map(MoverRow::from).collect());
        self.losers = Panel::Ready(summary.top_losers.iter().map(MoverRow::from).collect());
        self.last_updated = summary
            .last_updated
            .as_deref()
            .map(|t| format!("Updated: {}", format_time(t)));
    }
}

async fn load_market_summary(
    api: Arc<ApiClient>,
    state: ViewCell<DashboardState>,
    generation: Arc<RequestGeneration>,
) {
    let ticket = generation.begin();
    let result = api.market().summary().await;

    if !generation.is_current(ticket) {
        debug!("Dropping superseded market summary response");
        return;
    }

    let applied = match result {
        Ok(summary) => state.update(|s| s.apply_summary(&summary)),
        Err(e) => {
            error!("Failed to load market summary: {}", e);
            state.update(|s| {
                s.indices = Panel::failed(&e, MARKET_DATA_ERROR);
                s.gainers = Panel::failed(&e, MARKET_DATA_ERROR);
                s.losers = Panel::failed(&e, MARKET_DATA_ERROR);
            })
        }
    };

    if !applied {
        debug!("Dashboard closed; market summary discarded");
    }
}

async fn load_ai_summary(
    api: Arc<ApiClient>,
    state: ViewCell<DashboardState>,
    generation: Arc<RequestGeneration>,
) {
    let ticket = generation.begin();
    state.update(|s| s.ai_summary = Panel::Loading);

    let result = api.market().ai_summary().await;
    if !generation.is_current(ticket) {
        debug!("Dropping superseded AI summary response");
        return;
    }

    state.update(|s| {
        s.ai_summary = match result {
            Ok(data) => match data.summary.filter(|t| !t.trim().is_empty()) {
                Some(text) => Panel::Ready(text),
                None => {
                    error!(
                        "AI summary unavailable: {}",
                        data.error.as_deref().unwrap_or("empty summary")
                    );
                    Panel::Failed(ErrorResponse::new("APPLICATION_ERROR", AI_SUMMARY_ERROR))
                }
            },
            Err(e) => {
                error!("Failed to load AI summary: {}", e);
                Panel::failed(&e, AI_SUMMARY_ERROR)
            }
        };
    });
}

pub struct DashboardView {
    ctx: AppContext,
    state: ViewCell<DashboardState>,
    summary_generation: Arc<RequestGeneration>,
    ai_generation: Arc<RequestGeneration>,
    refresh: Option<RefreshHandle>,
}

impl DashboardView {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            state: ViewCell::new(DashboardState::loading()),
            summary_generation: Arc::new(RequestGeneration::new()),
            ai_generation: Arc::new(RequestGeneration::new()),
            refresh: None,
        }
    }

    pub async fn refresh_market_summary(&self) {
        load_market_summary(
            self.ctx.api.clone(),
            self.state.clone(),
            self.summary_generation.clone(),
        )
        .await
    }

    pub async fn refresh_ai_summary(&self) {
        load_ai_summary(
            self.ctx.api.clone(),
            self.state.clone(),
            self.ai_generation.clone(),
        )
        .await
    }

    pub fn is_auto_refreshing(&self) -> bool {
        self.refresh.as_ref().is_some_and(RefreshHandle::is_running)
    }

    pub fn snapshot(&self) -> DashboardState {
        self.state.snapshot()
    }

    fn start_auto_refresh(&mut self) {
        self.stop_auto_refresh();

        let api = self.ctx.api.clone();
        let state = self.state.clone();
        let generation = self.summary_generation.clone();
        self.refresh = Some(RefreshHandle::start(
            "market-summary",
            self.ctx.config.market_summary_refresh,
            move || load_market_summary(api.clone(), state.clone(), generation.clone()),
        ));
    }

    fn stop_auto_refresh(&mut self) {
        if let Some(mut handle) = self.refresh.take() {
            handle.stop();
        }
    }
}

#[async_trait]
impl View for DashboardView {
    fn page(&self) -> Page {
        Page::Dashboard
    }

    async fn init(&mut self) {
        info!("Loading dashboard");
        tokio::join!(self.refresh_market_summary(), self.refresh_ai_summary());

        if self.state.is_alive() {
            self.start_auto_refresh();
        }
    }

    fn teardown(&mut self) {
        self.stop_auto_refresh();
        self.state.close();
    }
}

impl Drop for DashboardView {
    fn drop(&mut self) {
        self.teardown();
    }
}
