//! Rendering helpers for the test workbench dashboard.
//!
//! Everything here writes into a [`Document`]; nothing touches a page until
//! a host calls into it. [`Dashboard`] ties the helpers to a live backend.

pub mod badge;
pub mod dashboard;
pub mod format;
pub mod health;
pub mod init;
pub mod markup;
pub mod page;
pub mod states;
pub mod toast;

pub use dashboard::{Dashboard, SharedPage};
pub use health::render_health;
pub use init::{PageInit, init_page};
pub use page::{Document, Element, Page};
pub use toast::{ToastKind, Toaster};

/// Stateless helpers shared by every page script.
pub mod utils {
    pub use crate::badge::{priority_badge, status_badge};
    pub use crate::format::{format_date_time, format_date_time_in, format_duration};
    pub use crate::states::{show_empty_state, show_error, show_loading};
    pub use testdeck_client::check_health;
}
