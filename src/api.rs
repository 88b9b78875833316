use std::sync::Arc;

use serde::Deserialize;

use crate::auth::CredentialProvider;
use crate::error::{ClientError, ClientResult};
use crate::metrics;
use crate::models::Notification;

#[derive(Debug, Deserialize)]
struct ListResponse {
    notifications: Vec<Notification>,
}

#[derive(Debug, Deserialize)]
struct UnreadCountResponse {
    unread_count: u64,
}

/// Request/response client for the notification REST API
///
/// Sends the access token as a bearer header when one is available. All
/// methods surface failures as `ClientError`; the session layer decides
/// how to degrade.
pub struct NotificationApi {
    base_url: String,
    http_client: reqwest::Client,
    credentials: Arc<dyn CredentialProvider>,
}

impl NotificationApi {
    pub fn new(base_url: impl Into<String>, credentials: Arc<dyn CredentialProvider>) -> Self {
        let base_url = base_url.into();
        NotificationApi {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client: reqwest::Client::new(),
            credentials,
        }
    }

    /// Fetch one page of notifications.
    pub async fn list(
        &self,
        limit: u32,
        skip: u32,
        unread_only: bool,
    ) -> ClientResult<Vec<Notification>> {
        let url = format!(
            "{}/notifications/?limit={}&skip={}&unread_only={}",
            self.base_url, limit, skip, unread_only
        );
        let result = async {
            let response = self
                .check(self.authorized(self.http_client.get(&url)).send().await?)
                .await?;
            let payload: ListResponse = response.json().await?;
            Ok(payload.notifications)
        }
        .await;
        self.observe("list", &result);
        result
    }

    /// Fetch the server-side unread counter.
    pub async fn unread_count(&self) -> ClientResult<u64> {
        let url = format!("{}/notifications/unread-count/", self.base_url);
        let result = async {
            let response = self
                .check(self.authorized(self.http_client.get(&url)).send().await?)
                .await?;
            let payload: UnreadCountResponse = response.json().await?;
            Ok(payload.unread_count)
        }
        .await;
        self.observe("unread_count", &result);
        result
    }

    pub async fn mark_read(&self, id: &str) -> ClientResult<()> {
        let url = format!("{}/notifications/{}/read/", self.base_url, id);
        let result = async {
            self.check(self.authorized(self.http_client.post(&url)).send().await?)
                .await?;
            Ok(())
        }
        .await;
        self.observe("mark_read", &result);
        result
    }

    pub async fn mark_all_read(&self) -> ClientResult<()> {
        let url = format!("{}/notifications/mark-all-read/", self.base_url);
        let result = async {
            self.check(self.authorized(self.http_client.post(&url)).send().await?)
                .await?;
            Ok(())
        }
        .await;
        self.observe("mark_all_read", &result);
        result
    }

    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        let url = format!("{}/notifications/{}/", self.base_url, id);
        let result = async {
            self.check(self.authorized(self.http_client.delete(&url)).send().await?)
                .await?;
            Ok(())
        }
        .await;
        self.observe("delete", &result);
        result
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.credentials.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn check(&self, response: reqwest::Response) -> ClientResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ClientError::Api {
            status: status.as_u16(),
            body,
        })
    }

    fn observe<T>(&self, operation: &str, result: &ClientResult<T>) {
        let outcome = if result.is_ok() { "ok" } else { "error" };
        metrics::observe_api_request(operation, outcome);
    }
}
