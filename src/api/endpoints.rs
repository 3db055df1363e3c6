//! Endpoint descriptors
//!
//! Every backend operation maps to a fixed method and path template. Identifiers
//! substituted into a template are percent-encoded as a single path segment, so
//! a symbol or scheduler id can never change the shape of the path.

use std::fmt;

/// HTTP methods used by the backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Logical backend operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint<'a> {
    // Auth
    Login,
    Register,
    // Chat
    Chat,
    // Market
    MarketSummary,
    MarketAiSummary,
    MarketIndices,
    MarketMovers,
    // Stocks
    StockInfo(&'a str),
    StockHistory(&'a str),
    StockNews(&'a str),
    StockTechnicals(&'a str),
    StockFinancials(&'a str),
    StockRecommendations(&'a str),
    StockAiAnalysis(&'a str),
    // Search
    Search,
    // Scheduler
    SchedulerCreate,
    SchedulerUser(&'a str),
    SchedulerGet(&'a str),
    SchedulerUpdate(&'a str),
    SchedulerDelete(&'a str),
    SchedulerTest(&'a str),
    SchedulerNextRuns,
}

impl Endpoint<'_> {
    pub fn method(&self) -> HttpMethod {
        match self {
            Endpoint::Login
            | Endpoint::Register
            | Endpoint::Chat
            | Endpoint::SchedulerCreate
            | Endpoint::SchedulerTest(_) => HttpMethod::Post,
            Endpoint::SchedulerUpdate(_) => HttpMethod::Put,
            Endpoint::SchedulerDelete(_) => HttpMethod::Delete,
            _ => HttpMethod::Get,
        }
    }

    /// Path relative to the backend origin, parameters substituted
    pub fn path(&self) -> String {
        match self {
            Endpoint::Login => "/api/auth/login".to_string(),
            Endpoint::Register => "/api/auth/register".to_string(),
            Endpoint::Chat => "/api/chat".to_string(),
            Endpoint::MarketSummary => "/api/market/summary".to_string(),
            Endpoint::MarketAiSummary => "/api/market/ai-summary".to_string(),
            Endpoint::MarketIndices => "/api/market/indices".to_string(),
            Endpoint::MarketMovers => "/api/market/movers".to_string(),
            Endpoint::StockInfo(symbol) => format!("/api/stocks/{}", segment(symbol)),
            Endpoint::StockHistory(symbol) => format!("/api/stocks/{}/history", segment(symbol)),
            Endpoint::StockNews(symbol) => format!("/api/stocks/{}/news", segment(symbol)),
            Endpoint::StockTechnicals(symbol) => {
                format!("/api/stocks/{}/technicals", segment(symbol))
            }
            Endpoint::StockFinancials(symbol) => {
                format!("/api/stocks/{}/financials", segment(symbol))
            }
            Endpoint::StockRecommendations(symbol) => {
                format!("/api/stocks/{}/recommendations", segment(symbol))
            }
            Endpoint::StockAiAnalysis(symbol) => {
                format!("/api/stocks/{}/ai-analysis", segment(symbol))
            }
            Endpoint::Search => "/api/search".to_string(),
            Endpoint::SchedulerCreate => "/api/scheduler".to_string(),
            Endpoint::SchedulerUser(user_id) => {
                format!("/api/scheduler/user/{}", segment(user_id))
            }
            Endpoint::SchedulerGet(id)
            | Endpoint::SchedulerUpdate(id)
            | Endpoint::SchedulerDelete(id) => format!("/api/scheduler/{}", segment(id)),
            Endpoint::SchedulerTest(id) => format!("/api/scheduler/{}/test", segment(id)),
            Endpoint::SchedulerNextRuns => "/api/scheduler/next-runs".to_string(),
        }
    }

    /// Path with a query string appended
    pub fn path_with_query(&self, query: &Query) -> String {
        format!("{}{}", self.path(), query)
    }
}

fn segment(value: &str) -> String {
    // "." and ".." would be resolved away by URL normalization
    if !value.is_empty() && value.chars().all(|c| c == '.') {
        return value.replace('.', "%2E");
    }
    urlencoding::encode(value).into_owned()
}

/// Ordered query-string builder
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.pairs.push((key.to_string(), value.to_string()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.pairs.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(
                f,
                "{}{}={}",
                sep,
                urlencoding::encode(key),
                urlencoding::encode(value)
            )?;
        }
        Ok(())
    }
}
