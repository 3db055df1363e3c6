//! Market-wide endpoints

use crate::api::client::ApiClient;
use crate::api::endpoints::{Endpoint, Query};
use crate::api::types::{AiMarketSummary, IndicesResponse, MarketSummary, MarketType, MoversResponse};
use crate::error::ApiResult;

/// Default number of movers per listing
pub const DEFAULT_MOVERS_LIMIT: u32 = 10;

pub struct MarketApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn market(&self) -> MarketApi<'_> {
        MarketApi { client: self }
    }
}

/// Path for the movers listing
pub fn movers_path(market_type: MarketType, limit: u32) -> String {
    let query = Query::new()
        .param("market_type", market_type)
        .param("limit", limit);
    Endpoint::MarketMovers.path_with_query(&query)
}

impl MarketApi<'_> {
    pub async fn summary(&self) -> ApiResult<MarketSummary> {
        self.client.get(&Endpoint::MarketSummary.path()).await
    }

    pub async fn ai_summary(&self) -> ApiResult<AiMarketSummary> {
        self.client.get(&Endpoint::MarketAiSummary.path()).await
    }

    pub async fn indices(&self) -> ApiResult<IndicesResponse> {
        self.client.get(&Endpoint::MarketIndices.path()).await
    }

    pub async fn movers(&self, market_type: MarketType, limit: u32) -> ApiResult<MoversResponse> {
        self.client.get(&movers_path(market_type, limit)).await
    }
}
