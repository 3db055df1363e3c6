//! AI analyst chat endpoint

use crate::api::client::ApiClient;
use crate::api::endpoints::Endpoint;
use crate::api::types::{ChatMessage, ChatRequest, ChatResponse};
use crate::error::ApiResult;

pub struct ChatApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn chat(&self) -> ChatApi<'_> {
        ChatApi { client: self }
    }
}

impl ChatApi<'_> {
    /// Send one message together with the prior conversation
    pub async fn send(
        &self,
        message: &str,
        symbol: Option<&str>,
        conversation_history: &[ChatMessage],
    ) -> ApiResult<ChatResponse> {
        let body = ChatRequest {
            message,
            symbol,
            conversation_history,
        };
        self.client.post(&Endpoint::Chat.path(), &body).await
    }
}
