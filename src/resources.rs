//! Typed access to the admin API's REST collections.
//!
//! All operations are authenticated and go through the client's retry policy.
//! Bodies and results are plain JSON; the server owns the schemas.

use crate::client::{ApiRequest, GatewayClient};
use crate::Result;
use serde_json::Value;
use std::fmt::Display;

pub const APPLICATIONS: &str = "/api/applications";
pub const PLANS: &str = "/api/plans";
pub const HISTORY: &str = "/api/history";
pub const STAFF: &str = "/api/staff";
pub const SETTINGS: &str = "/api/settings";
pub const SEND_MANUAL: &str = "/api/send-manual";
pub const SCHEDULER_SYNC: &str = "/api/scheduler/sync";

/// CRUD handle for one collection path.
pub struct Resource<'a> {
    client: &'a GatewayClient,
    path: String,
}

impl<'a> Resource<'a> {
    pub fn new(client: &'a GatewayClient, path: impl Into<String>) -> Self {
        Self {
            client,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Path of one member, with the id percent-encoded.
    pub fn item_path(&self, id: impl Display) -> String {
        format!("{}/{}", self.path, urlencoding::encode(&id.to_string()))
    }

    pub async fn list(&self) -> Result<Value> {
        self.client.call(ApiRequest::get(self.path.as_str())).await
    }

    pub async fn get(&self, id: impl Display) -> Result<Value> {
        self.client.call(ApiRequest::get(self.item_path(id))).await
    }

    pub async fn create(&self, body: Value) -> Result<Value> {
        self.client
            .call(ApiRequest::post(self.path.as_str(), body))
            .await
    }

    pub async fn update(&self, id: impl Display, body: Value) -> Result<Value> {
        self.client
            .call(ApiRequest::put(self.item_path(id), body))
            .await
    }

    pub async fn delete(&self, id: impl Display) -> Result<Value> {
        self.client.call(ApiRequest::delete(self.item_path(id))).await
    }
}

impl GatewayClient {
    /// Subscription applications awaiting review.
    pub fn applications(&self) -> Resource<'_> {
        Resource::new(self, APPLICATIONS)
    }

    pub fn plans(&self) -> Resource<'_> {
        Resource::new(self, PLANS)
    }

    /// Subscribers of one plan: `/api/plans/{id}/subscribers`.
    pub fn subscribers(&self, plan_id: impl Display) -> Resource<'_> {
        let plans = self.plans();
        let path = format!("{}/subscribers", plans.item_path(plan_id));
        Resource::new(self, path)
    }

    /// Delivery send history.
    pub fn history(&self) -> Resource<'_> {
        Resource::new(self, HISTORY)
    }

    pub fn staff(&self) -> Resource<'_> {
        Resource::new(self, STAFF)
    }

    pub async fn settings(&self) -> Result<Value> {
        self.call(ApiRequest::get(SETTINGS)).await
    }

    pub async fn update_settings(&self, body: Value) -> Result<Value> {
        self.call(ApiRequest::put(SETTINGS, body)).await
    }

    /// Trigger a manual send.
    pub async fn send_manual(&self, body: Value) -> Result<Value> {
        self.call(ApiRequest::post(SEND_MANUAL, body)).await
    }

    /// Ask the server to resync its delivery scheduler.
    pub async fn sync_scheduler(&self) -> Result<Value> {
        self.call(ApiRequest::post(SCHEDULER_SYNC, Value::Object(Default::default())))
            .await
    }
}
