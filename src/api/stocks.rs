//! Per-symbol endpoints

use crate::api::client::ApiClient;
use crate::api::endpoints::{Endpoint, Query};
use crate::api::types::{AiAnalysis, NewsResponse, StockHistory, StockInfo, Technicals};
use crate::error::ApiResult;
use serde_json::Value;

pub const DEFAULT_PERIOD: &str = "1mo";
pub const DEFAULT_INTERVAL: &str = "1d";

pub struct StocksApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn stocks(&self) -> StocksApi<'_> {
        StocksApi { client: self }
    }
}

/// Path for a symbol's price history
pub fn history_path(symbol: &str, period: &str, interval: &str) -> String {
    let query = Query::new().param("period", period).param("interval", interval);
    Endpoint::StockHistory(symbol).path_with_query(&query)
}

impl StocksApi<'_> {
    pub async fn info(&self, symbol: &str) -> ApiResult<StockInfo> {
        self.client.get(&Endpoint::StockInfo(symbol).path()).await
    }

    pub async fn history(&self, symbol: &str, period: &str, interval: &str) -> ApiResult<StockHistory> {
        self.client.get(&history_path(symbol, period, interval)).await
    }

    pub async fn news(&self, symbol: &str) -> ApiResult<NewsResponse> {
        self.client.get(&Endpoint::StockNews(symbol).path()).await
    }

    pub async fn technicals(&self, symbol: &str) -> ApiResult<Technicals> {
        self.client.get(&Endpoint::StockTechnicals(symbol).path()).await
    }

    /// Income statement, balance sheet and cash flow, passed through as-is
    pub async fn financials(&self, symbol: &str) -> ApiResult<Value> {
        self.client.get(&Endpoint::StockFinancials(symbol).path()).await
    }

    /// Analyst rating changes, passed through as-is
    pub async fn recommendations(&self, symbol: &str) -> ApiResult<Value> {
        self.client.get(&Endpoint::StockRecommendations(symbol).path()).await
    }

    pub async fn ai_analysis(&self, symbol: &str) -> ApiResult<AiAnalysis> {
        self.client.get(&Endpoint::StockAiAnalysis(symbol).path()).await
    }
}
