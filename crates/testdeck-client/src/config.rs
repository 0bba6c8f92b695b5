//! Client configuration, loaded from environment variables.

use std::time::Duration;

use crate::poller::PollSettings;

/// Default API base, matching the workbench's development server.
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:5000/api";

/// Runtime configuration for [`ApiClient`](crate::ApiClient) and the pollers
/// built on top of it.
///
/// Every field has a sensible default so the client works out-of-the-box
/// without any environment variables set.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL every endpoint path is appended to (default: [`DEFAULT_API_BASE`]).
    pub api_base: String,

    /// Delay between two status requests of one polling session (default: 5s).
    pub poll_interval: Duration,

    /// Non-terminal responses tolerated before a session gives up (default: 120).
    pub max_attempts: u32,

    /// Deadline for any single HTTP request (default: 30s).
    pub request_timeout: Duration,

    /// Period of the background health check (default: 30s).
    pub health_interval: Duration,

    /// Optional HTTP/HTTPS proxy URL.
    pub proxy: Option<String>,

    /// Comma-separated hosts reached without [`proxy`](Self::proxy), in
    /// `NO_PROXY` syntax.
    pub no_proxy: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_owned(),
            poll_interval: Duration::from_secs(5),
            max_attempts: 120,
            request_timeout: Duration::from_secs(30),
            health_interval: Duration::from_secs(30),
            proxy: None,
            no_proxy: None,
        }
    }
}

impl ClientConfig {
    /// Build [`ClientConfig`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build [`ClientConfig`] from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let secs = |key: &str, default: Duration| {
            parse_or(&lookup, key, default.as_secs()).max(1)
        };

        Self {
            api_base: normalize_base(
                &lookup("TESTDECK_API_BASE").unwrap_or(defaults.api_base),
            ),
            poll_interval: Duration::from_secs(secs(
                "TESTDECK_POLL_INTERVAL_SECS",
                defaults.poll_interval,
            )),
            max_attempts: parse_or(&lookup, "TESTDECK_MAX_ATTEMPTS", defaults.max_attempts)
                .max(1),
            request_timeout: Duration::from_secs(secs(
                "TESTDECK_REQUEST_TIMEOUT_SECS",
                defaults.request_timeout,
            )),
            health_interval: Duration::from_secs(secs(
                "TESTDECK_HEALTH_INTERVAL_SECS",
                defaults.health_interval,
            )),
            proxy: lookup("HTTP_PROXY").or_else(|| lookup("HTTPS_PROXY")),
            no_proxy: lookup("NO_PROXY").or_else(|| lookup("no_proxy")),
        }
    }

    /// Override the API base (a trailing `/` is dropped).
    pub fn with_api_base(mut self, api_base: impl AsRef<str>) -> Self {
        self.api_base = normalize_base(api_base.as_ref());
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_health_interval(mut self, interval: Duration) -> Self {
        self.health_interval = interval;
        self
    }

    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    pub fn with_no_proxy(mut self, hosts: impl Into<String>) -> Self {
        self.no_proxy = Some(hosts.into());
        self
    }

    /// Settings for a [`StatusPoller`](crate::StatusPoller) derived from this config.
    pub fn poll_settings(&self) -> PollSettings {
        PollSettings {
            interval: self.poll_interval,
            max_attempts: self.max_attempts,
            request_timeout: self.request_timeout,
        }
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn normalize_base(base: &str) -> String {
    base.trim().trim_end_matches('/').to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_polling_contract() {
        let cfg = ClientConfig::from_lookup(|_| None);
        assert_eq!(cfg, ClientConfig::default());
        assert_eq!(cfg.poll_interval, Duration::from_secs(5));
        assert_eq!(cfg.max_attempts, 120);
        assert_eq!(cfg.health_interval, Duration::from_secs(30));
        assert_eq!(cfg.api_base, DEFAULT_API_BASE);
    }

    #[test]
    fn env_overrides_are_applied() {
        let cfg = ClientConfig::from_lookup(lookup_from(&[
            ("TESTDECK_API_BASE", "https://bench.example.com/api/"),
            ("TESTDECK_POLL_INTERVAL_SECS", "2"),
            ("TESTDECK_MAX_ATTEMPTS", "10"),
            ("TESTDECK_REQUEST_TIMEOUT_SECS", "7"),
            ("HTTPS_PROXY", "http://proxy:8080"),
            ("no_proxy", "127.0.0.1,localhost"),
        ]));
        assert_eq!(cfg.api_base, "https://bench.example.com/api");
        assert_eq!(cfg.poll_interval, Duration::from_secs(2));
        assert_eq!(cfg.max_attempts, 10);
        assert_eq!(cfg.request_timeout, Duration::from_secs(7));
        assert_eq!(cfg.proxy.as_deref(), Some("http://proxy:8080"));
        assert_eq!(cfg.no_proxy.as_deref(), Some("127.0.0.1,localhost"));
    }

    #[test]
    fn unparsable_values_fall_back_to_defaults() {
        let cfg = ClientConfig::from_lookup(lookup_from(&[
            ("TESTDECK_POLL_INTERVAL_SECS", "soon"),
            ("TESTDECK_MAX_ATTEMPTS", "-3"),
            ("TESTDECK_HEALTH_INTERVAL_SECS", "0"),
        ]));
        assert_eq!(cfg.poll_interval, Duration::from_secs(5));
        assert_eq!(cfg.max_attempts, 120);
        assert_eq!(cfg.health_interval, Duration::from_secs(1));
    }

    #[test]
    fn builder_setters_and_poll_settings() {
        let cfg = ClientConfig::default()
            .with_api_base("http://localhost:9000/api///")
            .with_poll_interval(Duration::from_millis(250))
            .with_max_attempts(3)
            .with_request_timeout(Duration::from_secs(1))
            .with_proxy("http://proxy:3128");
        assert_eq!(cfg.api_base, "http://localhost:9000/api");
        let settings = cfg.poll_settings();
        assert_eq!(settings.interval, Duration::from_millis(250));
        assert_eq!(settings.max_attempts, 3);
        assert_eq!(settings.request_timeout, Duration::from_secs(1));
    }
}
