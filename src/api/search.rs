//! Symbol search endpoint

use crate::api::client::ApiClient;
use crate::api::endpoints::{Endpoint, Query};
use crate::api::types::SearchResponse;
use crate::error::ApiResult;

pub const DEFAULT_SEARCH_LIMIT: u32 = 10;

pub struct SearchApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn search(&self) -> SearchApi<'_> {
        SearchApi { client: self }
    }
}

pub fn search_path(query: &str, limit: u32) -> String {
    Endpoint::Search.path_with_query(&Query::new().param("query", query).param("limit", limit))
}

impl SearchApi<'_> {
    pub async fn stocks(&self, query: &str, limit: u32) -> ApiResult<SearchResponse> {
        self.client.get(&search_path(query, limit)).await
    }
}
