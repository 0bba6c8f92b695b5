//! Request and response bodies of the task-launching endpoints.
//!
//! Every launch endpoint starts a background job on the workbench and answers
//! immediately with the id to poll.

use serde::{Deserialize, Serialize};

/// Answer of every `POST` endpoint that starts a background task.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TaskLaunch {
    pub task_id: String,
    /// Usually `"started"`.
    #[serde(default)]
    pub status: String,
}

/// Filters for `POST /tests/run`. Unset filters are omitted from the body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunTestsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
}

impl RunTestsRequest {
    pub fn priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn product_id(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = Some(product_id.into());
        self
    }
}

/// Body of `POST /reports/ai/generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AiReportRequest {
    pub provider: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub summary_only: bool,
}

impl Default for AiReportRequest {
    fn default() -> Self {
        Self {
            provider: "deepseek".to_owned(),
            summary_only: false,
        }
    }
}

/// Body of `POST /trends/analyze`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrendsRequest {
    pub days: u32,
}

impl Default for TrendsRequest {
    fn default() -> Self {
        Self { days: 30 }
    }
}

/// Answer of `GET /config`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SystemConfig {
    pub project_name: String,
    pub version: String,
    #[serde(default)]
    pub data_dir: String,
    #[serde(default)]
    pub reports_dir: String,
}
