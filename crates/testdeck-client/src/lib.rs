//! Client side of the test workbench API.
//!
//! ```rust,no_run
//! # #[tokio::main]
//! # async fn main() -> Result<(), testdeck_client::ClientError> {
//! use testdeck_client::{ApiClient, ClientConfig, PollCallbacks, RunTestsRequest, StatusPoller};
//!
//! let config = ClientConfig::from_env();
//! let client = ApiClient::new(&config)?;
//! let launch = client.run_tests(&RunTestsRequest::default().priority("P0")).await?;
//!
//! let poller = StatusPoller::new(client, config.poll_settings());
//! let handle = poller.poll(
//!     launch.task_id,
//!     PollCallbacks::new()
//!         .on_update(|s| println!("status: {}", s.status))
//!         .on_complete(|s| println!("done: {:?}", s.error)),
//! );
//! handle.wait().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod health;
pub mod poller;
pub mod results;
pub mod snapshot;
pub mod tasks;
pub mod transport;

pub use config::ClientConfig;
pub use error::ClientError;
pub use health::{HealthPinger, HealthReport, HealthState, check_health};
pub use poller::{PollCallbacks, PollHandle, PollOutcome, PollSettings, StatusPoller};
pub use results::{DashboardBuild, ProductList, ReportEntry, ReportList, ResultKind};
pub use snapshot::{TaskSnapshot, TaskStatus};
pub use tasks::{AiReportRequest, RunTestsRequest, SystemConfig, TaskLaunch, TrendsRequest};
pub use transport::{ApiClient, HealthSource, StatusSource};

pub use tokio_util::sync::CancellationToken;
