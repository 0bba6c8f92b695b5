//! Response bodies of the endpoints that return finished work: product and
//! report listings, the latest output of each background job, the test-suite
//! health report and dashboard generation.
//!
//! Job outputs are produced by scripts the client does not own, so they are
//! kept as raw JSON.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{EnumString, IntoStaticStr};

/// Answer of `GET /products/list`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ProductList {
    #[serde(default)]
    pub products: Vec<Value>,
    #[serde(default)]
    pub total: usize,
}

/// One entry of `GET /reports/list`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ReportEntry {
    pub id: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub summary: Map<String, Value>,
    /// Report directory relative to the workbench root.
    #[serde(default)]
    pub path: String,
}

/// Answer of `GET /reports/list`, newest first.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ReportList {
    #[serde(default)]
    pub reports: Vec<ReportEntry>,
    #[serde(default)]
    pub total: usize,
}

/// Answer of `POST /dashboard/generate`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DashboardBuild {
    pub status: String,
    /// Where the generated dashboard is served.
    #[serde(default)]
    pub url: String,
}

/// Job whose most recent output can be fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum ResultKind {
    /// `GET /reports/latest`: the last test run's results.
    Report,
    /// `GET /changes/latest`: the last product change detection.
    Changes,
    /// `GET /trends/latest`: the last trend analysis.
    Trends,
}

impl ResultKind {
    pub(crate) fn path(self) -> [&'static str; 2] {
        match self {
            ResultKind::Report => ["reports", "latest"],
            ResultKind::Changes => ["changes", "latest"],
            ResultKind::Trends => ["trends", "latest"],
        }
    }
}
