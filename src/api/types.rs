//! Request and response models for the backend API
//!
//! Response models are lenient: missing fields fall back to defaults so a
//! partially populated payload still renders.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

// ============================================================================
// Auth
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// User record as returned by login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub user: User,
    #[serde(default)]
    pub message: Option<String>,
}

/// Created account
#[derive(Debug, Clone, Deserialize)]
pub struct RegisteredUser {
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

// ============================================================================
// Chat
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
    pub symbol: Option<&'a str>,
    pub conversation_history: &'a [ChatMessage],
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

// ============================================================================
// Market
// ============================================================================

/// Index level (S&P 500, Dow, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexQuote {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub change: f64,
    #[serde(default)]
    pub change_percent: f64,
}

/// Stock or ETF in a gainers/losers listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mover {
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub change: f64,
    #[serde(default)]
    pub change_percent: f64,
    #[serde(default)]
    pub volume: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSummary {
    #[serde(default)]
    pub market_status: String,
    #[serde(default)]
    pub major_indices: Vec<IndexQuote>,
    #[serde(default)]
    pub top_gainers: Vec<Mover>,
    #[serde(default)]
    pub top_losers: Vec<Mover>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AiMarketSummary {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndicesResponse {
    #[serde(default)]
    pub indices: Vec<IndexQuote>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MoversResponse {
    #[serde(default)]
    pub gainers: Vec<Mover>,
    #[serde(default)]
    pub losers: Vec<Mover>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Listing selector for the movers endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MarketType {
    #[default]
    Stocks,
    Etf,
}

impl MarketType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketType::Stocks => "stocks",
            MarketType::Etf => "etf",
        }
    }
}

impl fmt::Display for MarketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Stocks
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockInfo {
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub current_price: f64,
    #[serde(default)]
    pub previous_close: f64,
    #[serde(default)]
    pub open: f64,
    #[serde(default)]
    pub day_high: f64,
    #[serde(default)]
    pub day_low: f64,
    #[serde(default)]
    pub volume: Option<f64>,
    #[serde(default)]
    pub avg_volume: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub pe_ratio: Option<f64>,
    #[serde(default, rename = "52_week_high", alias = "fifty_two_week_high")]
    pub fifty_two_week_high: Option<f64>,
    #[serde(default, rename = "52_week_low", alias = "fifty_two_week_low")]
    pub fifty_two_week_low: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
}

impl StockInfo {
    /// Absolute change against the previous close
    pub fn change(&self) -> f64 {
        self.current_price - self.previous_close
    }

    /// Percent change against the previous close, zero when there is no close
    pub fn change_percent(&self) -> f64 {
        if self.previous_close == 0.0 {
            0.0
        } else {
            self.change() / self.previous_close * 100.0
        }
    }
}

/// Daily (or intraday) OHLCV bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub date: String,
    #[serde(default)]
    pub open: f64,
    #[serde(default)]
    pub high: f64,
    #[serde(default)]
    pub low: f64,
    #[serde(default)]
    pub close: f64,
    #[serde(default)]
    pub volume: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StockHistory {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub interval: String,
    #[serde(default)]
    pub data: Vec<Candle>,
}

impl StockHistory {
    /// Whether the last close is at or above the first one
    pub fn is_positive(&self) -> bool {
        match (self.data.first(), self.data.last()) {
            (Some(first), Some(last)) if self.data.len() > 1 => last.close >= first.close,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub published: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewsResponse {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub news: Vec<NewsItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Technicals {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub rsi: Option<f64>,
    #[serde(default)]
    pub macd: Option<f64>,
    #[serde(default)]
    pub macd_signal: Option<f64>,
    #[serde(default)]
    pub signals: Vec<String>,
    #[serde(default)]
    pub error: Option<String>,
    /// Moving averages and other indicators the backend adds over time
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl Technicals {
    /// Numeric indicator outside the fixed fields, e.g. `sma_20`
    pub fn indicator(&self, name: &str) -> Option<f64> {
        self.extra.get(name).and_then(Value::as_f64)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AiAnalysis {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub analysis: String,
}

// ============================================================================
// Search
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

// ============================================================================
// Scheduler
// ============================================================================

/// When an alert fires
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerTime {
    #[default]
    Morning,
    Evening,
}

impl TriggerTime {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerTime::Morning => "morning",
            TriggerTime::Evening => "evening",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TriggerTime::Morning => "Morning",
            TriggerTime::Evening => "Evening",
        }
    }
}

/// Stored alert configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scheduler {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub prompt: String,
    pub trigger_time: TriggerTime,
    #[serde(default)]
    pub symbols: Vec<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub next_run: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchedulerCreate {
    pub user_id: String,
    pub trigger_time: TriggerTime,
    pub symbols: Vec<String>,
    pub prompt: String,
    pub is_active: bool,
}

/// Partial update; only set fields are sent
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SchedulerUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_time: Option<TriggerTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbols: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl SchedulerUpdate {
    pub fn active(is_active: bool) -> Self {
        Self {
            is_active: Some(is_active),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchedulerList {
    #[serde(default)]
    pub schedulers: Vec<Scheduler>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

/// Outcome of a manually triggered alert
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlertTestResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub email_sent: bool,
    #[serde(default)]
    pub content: Option<String>,
}

/// Next fire time per trigger, ISO-8601 local time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextRuns {
    #[serde(default)]
    pub morning: Option<String>,
    #[serde(default)]
    pub evening: Option<String>,
}

impl NextRuns {
    pub fn for_trigger(&self, trigger: TriggerTime) -> Option<&str> {
        match trigger {
            TriggerTime::Morning => self.morning.as_deref(),
            TriggerTime::Evening => self.evening.as_deref(),
        }
    }
}
