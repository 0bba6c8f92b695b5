//! HTTP transport for the workbench API.
//!
//! [`StatusSource`] and [`HealthSource`] are the seams the poller and the
//! health pinger depend on; [`ApiClient`] is the reqwest-backed
//! implementation used in production.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Method, NoProxy, Proxy, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::health::HealthReport;
use crate::results::{DashboardBuild, ProductList, ReportList, ResultKind};
use crate::snapshot::TaskSnapshot;
use crate::tasks::{AiReportRequest, RunTestsRequest, SystemConfig, TaskLaunch, TrendsRequest};

/// Anything that can report the current state of a task.
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch_status(&self, task_id: &str) -> Result<TaskSnapshot, ClientError>;
}

/// Anything that can report the backend's health.
#[async_trait]
pub trait HealthSource: Send + Sync {
    async fn fetch_health(&self) -> Result<HealthReport, ClientError>;
}

#[async_trait]
impl<T: StatusSource + ?Sized> StatusSource for Arc<T> {
    async fn fetch_status(&self, task_id: &str) -> Result<TaskSnapshot, ClientError> {
        (**self).fetch_status(task_id).await
    }
}

#[async_trait]
impl<T: HealthSource + ?Sized> HealthSource for Arc<T> {
    async fn fetch_health(&self) -> Result<HealthReport, ClientError> {
        (**self).fetch_health().await
    }
}

/// reqwest-backed client for the `/api` surface.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base: Url,
    client: Client,
}

impl ApiClient {
    /// Build a client from `config`.
    ///
    /// Every request inherits `config.request_timeout` as its deadline. An
    /// unusable proxy URL is logged and ignored. Hosts in `config.no_proxy`
    /// bypass the proxy.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let base = Url::parse(&config.api_base)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {e}", config.api_base)))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(config.api_base.clone()));
        }

        let mut builder = Client::builder()
            .user_agent(concat!("testdeck-client/", env!("CARGO_PKG_VERSION")))
            .timeout(config.request_timeout);

        if let Some(ref proxy_url) = config.proxy {
            let bypass = config.no_proxy.as_deref().and_then(NoProxy::from_string);
            match Proxy::all(proxy_url) {
                Ok(p) => builder = builder.proxy(p.no_proxy(bypass)),
                Err(e) => warn!(proxy = %proxy_url, error = %e, "ignoring invalid proxy URL"),
            }
        }

        Ok(Self {
            base,
            client: builder.build()?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Append `segments` to the API base, percent-encoding each one.
    pub fn endpoint<'a, I>(&self, segments: I) -> Result<Url, ClientError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Start a test run.
    pub async fn run_tests(&self, request: &RunTestsRequest) -> Result<TaskLaunch, ClientError> {
        self.post_json(&["tests", "run"], Some(request)).await
    }

    /// Start product discovery.
    pub async fn discover_products(&self) -> Result<TaskLaunch, ClientError> {
        self.post_json::<_, ()>(&["products", "discover"], None).await
    }

    /// Start AI report generation.
    pub async fn generate_ai_report(
        &self,
        request: &AiReportRequest,
    ) -> Result<TaskLaunch, ClientError> {
        self.post_json(&["reports", "ai", "generate"], Some(request)).await
    }

    /// Start product change detection.
    pub async fn detect_changes(&self) -> Result<TaskLaunch, ClientError> {
        self.post_json::<_, ()>(&["changes", "detect"], None).await
    }

    /// Start historical trend analysis.
    pub async fn analyze_trends(&self, request: &TrendsRequest) -> Result<TaskLaunch, ClientError> {
        self.post_json(&["trends", "analyze"], Some(request)).await
    }

    /// Fetch the workbench's static configuration.
    pub async fn system_config(&self) -> Result<SystemConfig, ClientError> {
        self.get_json(&["config"]).await
    }

    /// List discovered products.
    pub async fn list_products(&self) -> Result<ProductList, ClientError> {
        self.get_json(&["products", "list"]).await
    }

    /// List test reports, newest first.
    pub async fn list_reports(&self) -> Result<ReportList, ClientError> {
        self.get_json(&["reports", "list"]).await
    }

    /// Latest output of a finished job. A job that never ran answers `404`,
    /// surfaced as [`ClientError::Status`].
    pub async fn latest(&self, kind: ResultKind) -> Result<Value, ClientError> {
        self.get_json(&kind.path()).await
    }

    /// Health report of the test suite itself (`GET /health/check`), distinct
    /// from the backend liveness check.
    pub async fn test_suite_health(&self) -> Result<Value, ClientError> {
        self.get_json(&["health", "check"]).await
    }

    /// Regenerate the quality dashboard. The backend answers once the
    /// dashboard is written, so this is bounded by the request timeout.
    pub async fn generate_dashboard(&self) -> Result<DashboardBuild, ClientError> {
        self.post_json::<_, ()>(&["dashboard", "generate"], None).await
    }

    async fn get_json<T>(&self, path: &[&str]) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        let url = self.endpoint(path.iter().copied())?;
        self.send_json(Method::GET, url, None::<&()>).await
    }

    async fn post_json<T, B>(
        &self,
        path: &[&str],
        body: Option<&B>,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        let url = self.endpoint(path.iter().copied())?;
        self.send_json(Method::POST, url, body).await
    }

    async fn send_json<T, B>(&self, method: Method, url: Url, body: Option<&B>) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        debug!(%method, %url, "sending request");
        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl StatusSource for ApiClient {
    async fn fetch_status(&self, task_id: &str) -> Result<TaskSnapshot, ClientError> {
        if task_id.trim().is_empty() {
            return Err(ClientError::InvalidTaskId(task_id.to_owned()));
        }
        let url = self.endpoint(["tests", "status", task_id])?;
        self.send_json(Method::GET, url, None::<&()>).await
    }
}

#[async_trait]
impl HealthSource for ApiClient {
    async fn fetch_health(&self) -> Result<HealthReport, ClientError> {
        self.get_json(&["health"]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(&ClientConfig::default().with_api_base(base)).unwrap()
    }

    #[test]
    fn endpoint_appends_segments_to_base_path() {
        let c = client("http://localhost:5000/api/");
        let url = c.endpoint(["tests", "status", "test_1"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/tests/status/test_1");
    }

    #[test]
    fn endpoint_encodes_task_ids() {
        let c = client("http://localhost:5000/api");
        let url = c.endpoint(["tests", "status", "a/b c?"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/tests/status/a%2Fb%20c%3F");
    }

    #[test]
    fn invalid_base_is_rejected() {
        let err = ApiClient::new(&ClientConfig::default().with_api_base("not a url")).unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn empty_task_id_fails_without_a_request() {
        // Port 9 (discard) is never contacted: the id is rejected up front.
        let c = client("http://127.0.0.1:9/api");
        for id in ["", "   "] {
            let err = c.fetch_status(id).await.unwrap_err();
            assert!(matches!(err, ClientError::InvalidTaskId(_)), "got {err:?}");
        }
    }
}
