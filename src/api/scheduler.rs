//! Alert scheduler endpoints

use crate::api::client::ApiClient;
use crate::api::endpoints::Endpoint;
use crate::api::types::{
    AlertTestResult, MessageResponse, NextRuns, Scheduler, SchedulerCreate, SchedulerList,
    SchedulerUpdate,
};
use crate::error::ApiResult;
use serde_json::json;

pub struct SchedulerApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn scheduler(&self) -> SchedulerApi<'_> {
        SchedulerApi { client: self }
    }
}

impl SchedulerApi<'_> {
    pub async fn create(&self, data: &SchedulerCreate) -> ApiResult<Scheduler> {
        self.client.post(&Endpoint::SchedulerCreate.path(), data).await
    }

    pub async fn user_schedulers(&self, user_id: &str) -> ApiResult<SchedulerList> {
        self.client.get(&Endpoint::SchedulerUser(user_id).path()).await
    }

    pub async fn get(&self, id: &str) -> ApiResult<Scheduler> {
        self.client.get(&Endpoint::SchedulerGet(id).path()).await
    }

    pub async fn update(&self, id: &str, data: &SchedulerUpdate) -> ApiResult<Scheduler> {
        self.client.put(&Endpoint::SchedulerUpdate(id).path(), data).await
    }

    pub async fn delete(&self, id: &str) -> ApiResult<MessageResponse> {
        self.client.delete(&Endpoint::SchedulerDelete(id).path()).await
    }

    /// Run an alert immediately
    pub async fn test(&self, id: &str) -> ApiResult<AlertTestResult> {
        self.client.post(&Endpoint::SchedulerTest(id).path(), &json!({})).await
    }

    pub async fn next_runs(&self) -> ApiResult<NextRuns> {
        self.client.get(&Endpoint::SchedulerNextRuns.path()).await
    }
}
