//! Badges for priority and test-result tags.
//!
//! Unrecognised tags never fail: they render as the generic
//! [`UNKNOWN_BADGE`].

use std::str::FromStr;

use strum::{EnumIter, EnumString, IntoStaticStr};

use crate::markup::badge;

/// Fallback for any tag we do not know.
pub const UNKNOWN_BADGE: &str = r#"<span class="badge bg-secondary">未知</span>"#;

/// Test case priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, IntoStaticStr)]
pub enum Priority {
    P0,
    P1,
    P2,
}

impl Priority {
    pub fn bg_class(self) -> &'static str {
        match self {
            Priority::P0 => "bg-danger",
            Priority::P1 => "bg-warning",
            Priority::P2 => "bg-info",
        }
    }

    pub fn badge(self) -> String {
        let tag: &'static str = self.into();
        badge(self.bg_class(), tag)
    }
}

/// Outcome of a single test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum TestStatus {
    Passed,
    Failed,
    Skipped,
    Running,
    Pending,
}

impl TestStatus {
    pub fn bg_class(self) -> &'static str {
        match self {
            TestStatus::Passed => "bg-success",
            TestStatus::Failed => "bg-danger",
            TestStatus::Skipped => "bg-warning",
            TestStatus::Running => "bg-primary",
            TestStatus::Pending => "bg-secondary",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TestStatus::Passed => "通过",
            TestStatus::Failed => "失败",
            TestStatus::Skipped => "跳过",
            TestStatus::Running => "运行中",
            TestStatus::Pending => "待处理",
        }
    }

    pub fn badge(self) -> String {
        badge(self.bg_class(), self.label())
    }
}

/// Badge for a priority tag such as `"P0"`.
pub fn priority_badge(tag: &str) -> String {
    Priority::from_str(tag)
        .map(Priority::badge)
        .unwrap_or_else(|_| UNKNOWN_BADGE.to_owned())
}

/// Badge for a test status tag such as `"passed"`.
pub fn status_badge(tag: &str) -> String {
    TestStatus::from_str(tag)
        .map(TestStatus::badge)
        .unwrap_or_else(|_| UNKNOWN_BADGE.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn priority_badges() {
        assert_eq!(
            priority_badge("P0"),
            r#"<span class="badge bg-danger">P0</span>"#
        );
        assert_eq!(
            priority_badge("P1"),
            r#"<span class="badge bg-warning">P1</span>"#
        );
        assert_eq!(priority_badge("P2"), r#"<span class="badge bg-info">P2</span>"#);
    }

    #[test]
    fn unknown_priority_falls_back() {
        assert_eq!(priority_badge("X"), UNKNOWN_BADGE);
        assert_eq!(priority_badge("p0"), UNKNOWN_BADGE);
        assert_eq!(priority_badge(""), UNKNOWN_BADGE);
    }

    #[test]
    fn status_badges() {
        assert_eq!(
            status_badge("passed"),
            r#"<span class="badge bg-success">通过</span>"#
        );
        assert_eq!(
            status_badge("running"),
            r#"<span class="badge bg-primary">运行中</span>"#
        );
        assert_eq!(status_badge("broken"), UNKNOWN_BADGE);
    }

    #[test]
    fn every_known_tag_renders_non_empty_markup() {
        for p in Priority::iter() {
            let tag: &'static str = p.into();
            assert_ne!(priority_badge(tag), UNKNOWN_BADGE);
        }
        for s in TestStatus::iter() {
            let tag: &'static str = s.into();
            assert_ne!(status_badge(tag), UNKNOWN_BADGE);
            assert!(!s.badge().is_empty());
        }
    }
}
