//! Stock explorer: top movers, per-symbol detail, price chart and AI analysis

use crate::api::types::{MarketType, MoversResponse, NewsItem, StockHistory, StockInfo, Technicals};
use crate::api::DEFAULT_MOVERS_LIMIT;
use crate::error::{ApiResult, AppError, Result};
use crate::api::ApiClient;
use crate::refresh::{RefreshHandle, RequestGeneration, ViewCell};
use crate::state::AppContext;
use crate::views::chat::normalize_symbol;
use crate::views::dashboard::MoverRow;
use crate::views::format::{format_change, format_market_cap, format_price, format_volume};
use crate::views::{Page, Panel, View};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Chart periods offered by the detail view
pub const PERIODS: [&str; 4] = ["1mo", "3mo", "6mo", "1y"];
pub const DETAIL_PERIOD: &str = "3mo";
pub const CHART_INTERVAL: &str = "1d";

/// Symbols offered as one-click shortcuts
pub const QUICK_SYMBOLS: [&str; 6] = ["AAPL", "MSFT", "GOOGL", "NVDA", "SPY", "QQQ"];

pub const MOVERS_ERROR: &str = "Failed to load top movers";
pub const HISTORY_ERROR: &str = "Failed to load price history";
pub const AI_ANALYSIS_ERROR: &str =
    "Failed to generate analysis. Please ensure the OpenAI API key is configured.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RsiZone {
    Overbought,
    Oversold,
    Neutral,
}

impl RsiZone {
    pub fn classify(rsi: f64) -> Self {
        if rsi > 70.0 {
            RsiZone::Overbought
        } else if rsi < 30.0 {
            RsiZone::Oversold
        } else {
            RsiZone::Neutral
        }
    }
}

fn format_optional_price(value: Option<f64>) -> String {
    value.map(format_price).unwrap_or_else(|| "N/A".to_string())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TechnicalsCard {
    pub rsi: String,
    pub rsi_zone: Option<RsiZone>,
    pub sma_20: String,
    pub sma_50: String,
    pub signals: Vec<String>,
}

impl TechnicalsCard {
    /// `None` when the backend reported the indicators as unavailable
    fn from_technicals(t: &Technicals) -> Option<Self> {
        if t.error.is_some() {
            return None;
        }
        Some(Self {
            rsi: t
                .rsi
                .map(|r| format!("{:.2}", r))
                .unwrap_or_else(|| "N/A".to_string()),
            rsi_zone: t.rsi.map(RsiZone::classify),
            sma_20: format_optional_price(t.indicator("sma_20")),
            sma_50: format_optional_price(t.indicator("sma_50")),
            signals: t.signals.clone(),
        })
    }
}

/// Display-ready detail of one symbol
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockDetail {
    pub symbol: String,
    pub name: String,
    pub sector: String,
    pub industry: String,
    pub price: String,
    pub change: String,
    pub positive: bool,
    pub open: String,
    pub day_high: String,
    pub day_low: String,
    pub week_52_high: String,
    pub week_52_low: String,
    pub volume: String,
    pub pe_ratio: String,
    pub market_cap: String,
    pub technicals: Option<TechnicalsCard>,
    pub news: Vec<NewsItem>,
}

impl StockDetail {
    fn build(info: &StockInfo, technicals: &Technicals, news: Vec<NewsItem>) -> Self {
        let change = info.change();
        Self {
            symbol: info.symbol.clone(),
            name: info.name.clone(),
            sector: info.sector.clone().unwrap_or_else(|| "N/A".to_string()),
            industry: info.industry.clone().unwrap_or_else(|| "N/A".to_string()),
            price: format_price(info.current_price),
            change: format_change(change, info.change_percent()),
            positive: change >= 0.0,
            open: format_price(info.open),
            day_high: format_price(info.day_high),
            day_low: format_price(info.day_low),
            week_52_high: format_optional_price(info.fifty_two_week_high),
            week_52_low: format_optional_price(info.fifty_two_week_low),
            volume: format_volume(info.volume),
            pe_ratio: info
                .pe_ratio
                .map(|pe| format!("{:.2}", pe))
                .unwrap_or_else(|| "N/A".to_string()),
            market_cap: format_market_cap(info.market_cap),
            technicals: TechnicalsCard::from_technicals(technicals),
            news,
        }
    }

    /// Replace the intraday quote fields with a fresher snapshot
    fn apply_quote(&mut self, info: &StockInfo) {
        let change = info.change();
        self.price = format_price(info.current_price);
        self.change = format_change(change, info.change_percent());
        self.positive = change >= 0.0;
        self.open = format_price(info.open);
        self.day_high = format_price(info.day_high);
        self.day_low = format_price(info.day_low);
        self.volume = format_volume(info.volume);
        self.market_cap = format_market_cap(info.market_cap);
    }
}

/// Closing prices for the line chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub period: String,
    pub labels: Vec<String>,
    pub closes: Vec<f64>,
    /// Last close at or above the first
    pub positive: bool,
}

impl ChartSeries {
    fn from_history(period: &str, history: &StockHistory) -> Self {
        Self {
            period: period.to_string(),
            labels: history.data.iter().map(|c| c.date.clone()).collect(),
            closes: history.data.iter().map(|c| c.close).collect(),
            positive: history.is_positive(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ExplorerState {
    pub top_stocks: Panel<Vec<MoverRow>>,
    pub top_etfs: Panel<Vec<MoverRow>>,
    /// Symbol whose detail is shown; `None` on the default view
    pub current_symbol: Option<String>,
    pub detail: Panel<StockDetail>,
    pub period: String,
    pub chart: Panel<ChartSeries>,
    pub ai_analysis: Panel<String>,
}

impl ExplorerState {
    fn show_default(&mut self) {
        self.current_symbol = None;
        self.detail = Panel::Idle;
        self.chart = Panel::Idle;
        self.ai_analysis = Panel::Idle;
        self.period = DETAIL_PERIOD.to_string();
    }
}

async fn refresh_price(api: Arc<ApiClient>, state: ViewCell<ExplorerState>, symbol: String) {
    let info = match api.stocks().info(&symbol).await {
        Ok(info) => info,
        Err(e) => {
            warn!("Price refresh for {} failed: {}", symbol, e);
            return;
        }
    };

    state.update(|s| {
        if s.current_symbol.as_deref() != Some(symbol.as_str()) {
            return;
        }
        if let Panel::Ready(detail) = &mut s.detail {
            detail.apply_quote(&info);
        }
    });
}

pub struct ExplorerView {
    ctx: AppContext,
    state: ViewCell<ExplorerState>,
    detail_generation: RequestGeneration,
    history_generation: RequestGeneration,
    analysis_generation: RequestGeneration,
    price_refresh: Mutex<Option<RefreshHandle>>,
}

impl ExplorerView {
    pub fn new(ctx: AppContext) -> Self {
        let mut state = ExplorerState::default();
        state.show_default();
        Self {
            ctx,
            state: ViewCell::new(state),
            detail_generation: RequestGeneration::new(),
            history_generation: RequestGeneration::new(),
            analysis_generation: RequestGeneration::new(),
            price_refresh: Mutex::new(None),
        }
    }

    /// Poll the shown symbol's quote until the detail is left
    fn start_price_refresh(&self, symbol: String) {
        let api = self.ctx.api.clone();
        let state = self.state.clone();
        let handle = RefreshHandle::start("stock-price", self.ctx.config.stock_price_refresh, move || {
            refresh_price(api.clone(), state.clone(), symbol.clone())
        });

        if let Some(mut previous) = self.price_refresh.lock().replace(handle) {
            previous.stop();
        }
    }

    fn stop_price_refresh(&self) {
        if let Some(mut handle) = self.price_refresh.lock().take() {
            handle.stop();
        }
    }

    pub fn is_price_refreshing(&self) -> bool {
        self.price_refresh
            .lock()
            .as_ref()
            .is_some_and(RefreshHandle::is_running)
    }

    /// Top stock and ETF gainers; each list fails on its own
    pub async fn load_default_view(&self) {
        self.state.update(|s| {
            s.top_stocks = Panel::Loading;
            s.top_etfs = Panel::Loading;
        });

        let market = self.ctx.api.market();
        let (stocks, etfs) = tokio::join!(
            market.movers(MarketType::Stocks, DEFAULT_MOVERS_LIMIT),
            market.movers(MarketType::Etf, DEFAULT_MOVERS_LIMIT)
        );

        let to_panel = |result: ApiResult<MoversResponse>| match result {
            Ok(movers) => Panel::Ready(movers.gainers.iter().map(MoverRow::from).collect()),
            Err(e) => {
                error!("Failed to load default view: {}", e);
                Panel::failed(&e, MOVERS_ERROR)
            }
        };
        let stocks = to_panel(stocks);
        let etfs = to_panel(etfs);

        self.state.update(|s| {
            s.top_stocks = stocks;
            s.top_etfs = etfs;
        });
    }

    /// Load info, history, technicals and news for `symbol` together
    ///
    /// Any single failure fails the whole detail. Blank input does nothing.
    pub async fn show_stock_detail(&self, symbol: &str) {
        let Some(symbol) = normalize_symbol(symbol) else {
            return;
        };
        info!("Showing detail for {}", symbol);

        self.stop_price_refresh();
        let ticket = self.detail_generation.begin();
        let history_ticket = self.history_generation.begin();
        self.analysis_generation.invalidate();

        self.state.update(|s| {
            s.current_symbol = Some(symbol.clone());
            s.detail = Panel::Loading;
            s.chart = Panel::Loading;
            s.ai_analysis = Panel::Idle;
            s.period = DETAIL_PERIOD.to_string();
        });

        let stocks = self.ctx.api.stocks();
        let result = tokio::try_join!(
            stocks.info(&symbol),
            stocks.history(&symbol, DETAIL_PERIOD, CHART_INTERVAL),
            stocks.technicals(&symbol),
            stocks.news(&symbol)
        );

        if !self.detail_generation.is_current(ticket) {
            debug!("Dropping superseded detail for {}", symbol);
            return;
        }

        let loaded = result.is_ok();
        let applied = self.state.update(|s| match result {
            Ok((info, history, technicals, news)) => {
                s.detail = Panel::Ready(StockDetail::build(&info, &technicals, news.news));
                // A period switch made while loading takes precedence
                if self.history_generation.is_current(history_ticket) {
                    s.chart = Panel::Ready(ChartSeries::from_history(DETAIL_PERIOD, &history));
                }
            }
            Err(e) => {
                error!("Failed to load data for {}: {}", symbol, e);
                s.detail = Panel::failed(&e, format!("Failed to load data for {}: {}", symbol, e.message()));
                s.chart = Panel::Idle;
            }
        });

        if loaded && applied {
            self.start_price_refresh(symbol);
        }
    }

    /// Re-fetch the chart for one of [`PERIODS`]
    pub async fn select_period(&self, period: &str) -> Result<()> {
        if !PERIODS.contains(&period) {
            return Err(AppError::Validation(format!("Unsupported period '{}'", period)));
        }
        let symbol = self.current_symbol().ok_or_else(|| {
            AppError::Validation("Select a stock before choosing a period".to_string())
        })?;

        let ticket = self.history_generation.begin();
        self.state.update(|s| {
            s.period = period.to_string();
            s.chart = Panel::Loading;
        });

        let result = self
            .ctx
            .api
            .stocks()
            .history(&symbol, period, CHART_INTERVAL)
            .await;

        if !self.history_generation.is_current(ticket) {
            debug!("Dropping superseded {} history for {}", period, symbol);
            return Ok(());
        }

        self.state.update(|s| {
            s.chart = match result {
                Ok(history) => Panel::Ready(ChartSeries::from_history(period, &history)),
                Err(e) => {
                    error!("Failed to load {} history for {}: {}", period, symbol, e);
                    Panel::failed(&e, HISTORY_ERROR)
                }
            };
        });
        Ok(())
    }

    /// Ask the backend for an AI write-up of the current symbol
    pub async fn load_ai_analysis(&self) -> Result<()> {
        let symbol = self.current_symbol().ok_or_else(|| {
            AppError::Validation("Select a stock before requesting analysis".to_string())
        })?;

        let ticket = self.analysis_generation.begin();
        self.state.update(|s| s.ai_analysis = Panel::Loading);

        let result = self.ctx.api.stocks().ai_analysis(&symbol).await;
        if !self.analysis_generation.is_current(ticket) {
            debug!("Dropping superseded AI analysis for {}", symbol);
            return Ok(());
        }

        self.state.update(|s| {
            s.ai_analysis = match result {
                Ok(a) => Panel::Ready(a.analysis),
                Err(e) => {
                    error!("Failed to generate analysis for {}: {}", symbol, e);
                    Panel::failed(&e, AI_ANALYSIS_ERROR)
                }
            };
        });
        Ok(())
    }

    /// Leave the detail; responses still in flight for it are dropped
    pub fn back_to_default(&self) {
        self.stop_price_refresh();
        self.detail_generation.invalidate();
        self.history_generation.invalidate();
        self.analysis_generation.invalidate();
        self.state.update(ExplorerState::show_default);
    }

    pub fn current_symbol(&self) -> Option<String> {
        self.state.read(|s| s.current_symbol.clone())
    }

    pub fn snapshot(&self) -> ExplorerState {
        self.state.snapshot()
    }
}

#[async_trait]
impl View for ExplorerView {
    fn page(&self) -> Page {
        Page::Explorer
    }

    async fn init(&mut self) {
        self.load_default_view().await;
    }

    fn teardown(&mut self) {
        self.stop_price_refresh();
        self.detail_generation.invalidate();
        self.history_generation.invalidate();
        self.analysis_generation.invalidate();
        self.state.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rsi_zone() {
        assert_eq!(RsiZone::classify(75.0), RsiZone::Overbought);
        assert_eq!(RsiZone::classify(25.0), RsiZone::Oversold);
        assert_eq!(RsiZone::classify(50.0), RsiZone::Neutral);
    }

    #[test]
    fn test_detail_formatting() {
        let info: StockInfo = serde_json::from_value(json!({
            "symbol": "AAPL",
            "name": "Apple Inc.",
            "sector": "Technology",
            "current_price": 189.5,
            "previous_close": 190.0,
            "open": 190.1,
            "day_high": 191.0,
            "day_low": 188.2,
            "volume": 52300000.0,
            "market_cap": 2950000000000.0,
            "52_week_high": 199.62
        }))
        .unwrap();
        let technicals: Technicals = serde_json::from_value(json!({
            "symbol": "AAPL",
            "rsi": 28.4,
            "sma_20": 185.25,
            "signals": ["RSI oversold"]
        }))
        .unwrap();

        let detail = StockDetail::build(&info, &technicals, Vec::new());
        assert_eq!(detail.price, "$189.50");
        assert_eq!(detail.change, "-0.50 (-0.26%)");
        assert!(!detail.positive);
        assert_eq!(detail.industry, "N/A");
        assert_eq!(detail.pe_ratio, "N/A");
        assert_eq!(detail.volume, "52.30M");
        assert_eq!(detail.market_cap, "$2.95T");
        assert_eq!(detail.week_52_high, "$199.62");
        assert_eq!(detail.week_52_low, "N/A");

        let card = detail.technicals.unwrap();
        assert_eq!(card.rsi, "28.40");
        assert_eq!(card.rsi_zone, Some(RsiZone::Oversold));
        assert_eq!(card.sma_20, "$185.25");
        assert_eq!(card.sma_50, "N/A");
    }

    #[test]
    fn test_technicals_unavailable() {
        let technicals: Technicals =
            serde_json::from_value(json!({"error": "Insufficient data"})).unwrap();
        assert!(TechnicalsCard::from_technicals(&technicals).is_none());
    }
}
