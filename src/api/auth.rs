//! Authentication endpoints

use crate::api::client::ApiClient;
use crate::api::endpoints::Endpoint;
use crate::api::types::{LoginRequest, LoginResponse, RegisterRequest, RegisteredUser};
use crate::error::ApiResult;

pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi { client: self }
    }
}

impl AuthApi<'_> {
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<LoginResponse> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.client.post(&Endpoint::Login.path(), &body).await
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> ApiResult<RegisteredUser> {
        let body = RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        self.client.post(&Endpoint::Register.path(), &body).await
    }
}
