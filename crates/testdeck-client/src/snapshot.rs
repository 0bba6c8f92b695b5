//! Task status snapshots as returned by `GET /tests/status/{task_id}`.
//!
//! A snapshot is a transient value: fetched once, handed to the caller and
//! dropped. The backend only promises a `status` tag; everything else is
//! passed through untouched in [`TaskSnapshot::extra`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::EnumString;

/// Error message carried by the snapshot synthesised when the attempt
/// ceiling is reached.
pub const TIMED_OUT_MESSAGE: &str = "task timed out";

/// Status tag of a task.
///
/// The four terminal tags are modelled as dedicated variants; every other tag
/// the backend may report (`running`, `started`, ...) is kept verbatim in
/// [`TaskStatus::InProgress`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum TaskStatus {
    Completed,
    Failed,
    Timeout,
    Error,
    #[strum(default)]
    InProgress(String),
}

impl TaskStatus {
    /// Parse a wire tag. Never fails: unknown tags become `InProgress`.
    pub fn from_tag(tag: &str) -> Self {
        TaskStatus::from_str(tag).unwrap_or_else(|_| TaskStatus::InProgress(tag.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
            TaskStatus::Timeout => "timeout",
            TaskStatus::Error => "error",
            TaskStatus::InProgress(tag) => tag,
        }
    }

    /// Returns `true` if a polling session must stop on this status.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TaskStatus::InProgress(_))
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One observation of a task's state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSnapshot", into = "RawSnapshot")]
pub struct TaskSnapshot {
    pub status: TaskStatus,
    /// Human-readable failure description, usually present on `error` and
    /// `timeout` snapshots.
    pub error: Option<String>,
    /// Every other field of the response body, keyed and ordered by name.
    pub extra: Map<String, Value>,
}

impl TaskSnapshot {
    pub fn new(status: TaskStatus) -> Self {
        Self {
            status,
            error: None,
            extra: Map::new(),
        }
    }

    /// Snapshot reported when a session exhausts its attempt budget.
    pub fn timed_out() -> Self {
        Self {
            status: TaskStatus::Timeout,
            error: Some(TIMED_OUT_MESSAGE.to_owned()),
            extra: Map::new(),
        }
    }

    /// Snapshot reported when fetching or decoding a status fails.
    pub fn transport_error(message: impl Into<String>) -> Self {
        Self {
            status: TaskStatus::Error,
            error: Some(message.into()),
            extra: Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Look up a pass-through field by name.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// The backend's `result` object, present once a task has finished.
    pub fn result(&self) -> Option<&Value> {
        self.field("result")
    }
}

// ── wire representation ──────────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
struct RawSnapshot {
    status: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<Value>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl TryFrom<RawSnapshot> for TaskSnapshot {
    type Error = String;

    fn try_from(raw: RawSnapshot) -> Result<Self, Self::Error> {
        let status = match raw.status {
            Value::String(tag) => TaskStatus::from_tag(&tag),
            other => return Err(format!("`status` must be a string, got {other}")),
        };
        let error = match raw.error {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s),
            Some(other) => Some(other.to_string()),
        };
        Ok(Self {
            status,
            error,
            extra: raw.extra,
        })
    }
}

impl From<TaskSnapshot> for RawSnapshot {
    fn from(snapshot: TaskSnapshot) -> Self {
        Self {
            status: Value::String(snapshot.status.as_str().to_owned()),
            error: snapshot.error.map(Value::String),
            extra: snapshot.extra,
        }
    }
}
