//! Task records and display view-models
//!
//! Task records arrive as JSON from the task-tracking subsystem. Status
//! values are parsed leniently: anything unrecognized is kept verbatim so
//! it can still be rendered as an unknown status.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Phases of a facility sync run, in protocol order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncState {
    SessionCreation,
    RemoteQueuing,
    Pulling,
    LocalDequeuing,
    LocalQueuing,
    Pushing,
    RemoteDequeuing,
}

impl SyncState {
    /// Number of phases in a sync run
    pub const TOTAL_STEPS: u8 = 7;

    pub const ALL: [SyncState; 7] = [
        Self::SessionCreation,
        Self::RemoteQueuing,
        Self::Pulling,
        Self::LocalDequeuing,
        Self::LocalQueuing,
        Self::Pushing,
        Self::RemoteDequeuing,
    ];

    /// 1-based position of this phase within the run
    pub fn step(self) -> u8 {
        match self {
            Self::SessionCreation => 1,
            Self::RemoteQueuing => 2,
            Self::Pulling => 3,
            Self::LocalDequeuing => 4,
            Self::LocalQueuing => 5,
            Self::Pushing => 6,
            Self::RemoteDequeuing => 7,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::SessionCreation => "SESSION_CREATION",
            Self::RemoteQueuing => "REMOTE_QUEUING",
            Self::Pulling => "PULLING",
            Self::LocalDequeuing => "LOCAL_DEQUEUING",
            Self::LocalQueuing => "LOCAL_QUEUING",
            Self::Pushing => "PUSHING",
            Self::RemoteDequeuing => "REMOTE_DEQUEUING",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|state| state.as_str() == s)
    }
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Overall task status.
///
/// Sync phase names share this namespace: a sync task may report its
/// current phase as its status.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    #[default]
    Pending,
    Queued,
    Completed,
    Canceled,
    Canceling,
    Failed,
    RemovingFacility,
    Phase(SyncState),
    Other(String),
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Queued => write!(f, "QUEUED"),
            Self::Completed => write!(f, "COMPLETED"),
            Self::Canceled => write!(f, "CANCELED"),
            Self::Canceling => write!(f, "CANCELING"),
            Self::Failed => write!(f, "FAILED"),
            Self::RemovingFacility => write!(f, "REMOVING_FACILITY"),
            Self::Phase(state) => write!(f, "{}", state),
            Self::Other(raw) => write!(f, "{}", raw),
        }
    }
}

impl From<String> for TaskStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "PENDING" => Self::Pending,
            "QUEUED" => Self::Queued,
            "COMPLETED" => Self::Completed,
            "CANCELED" => Self::Canceled,
            "CANCELING" => Self::Canceling,
            "FAILED" => Self::Failed,
            "REMOVING_FACILITY" => Self::RemovingFacility,
            other => match SyncState::parse(other) {
                Some(state) => Self::Phase(state),
                None => Self::Other(s),
            },
        }
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Other(raw) => raw,
            known => known.to_string(),
        }
    }
}

/// Job type as reported by the task-tracking subsystem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskKind {
    SyncDataPortal,
    SyncPeerFull,
    SyncPeerPull,
    DeleteFacility,
    ImportFacility,
    Other(String),
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SyncDataPortal => write!(f, "SYNCDATAPORTAL"),
            Self::SyncPeerFull => write!(f, "SYNCPEERFULL"),
            Self::SyncPeerPull => write!(f, "SYNCPEERPULL"),
            Self::DeleteFacility => write!(f, "DELETEFACILITY"),
            Self::ImportFacility => write!(f, "IMPORTFACILITY"),
            Self::Other(raw) => write!(f, "{}", raw),
        }
    }
}

impl From<String> for TaskKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "SYNCDATAPORTAL" => Self::SyncDataPortal,
            "SYNCPEERFULL" => Self::SyncPeerFull,
            "SYNCPEERPULL" => Self::SyncPeerPull,
            "DELETEFACILITY" => Self::DeleteFacility,
            "IMPORTFACILITY" => Self::ImportFacility,
            _ => Self::Other(s),
        }
    }
}

impl From<TaskKind> for String {
    fn from(kind: TaskKind) -> Self {
        match kind {
            TaskKind::Other(raw) => raw,
            known => known.to_string(),
        }
    }
}

/// A snapshot of a facility task, as produced by the task tracker
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskRecord {
    #[serde(rename = "type", default)]
    pub kind: Option<TaskKind>,
    pub status: TaskStatus,
    #[serde(default, deserialize_with = "lenient_sync_state")]
    pub sync_state: Option<SyncState>,
    /// Facility id on sync and import tasks
    #[serde(default)]
    pub facility: Option<String>,
    /// Facility id on removal tasks
    #[serde(default)]
    pub facility_id: Option<String>,
    #[serde(default)]
    pub facility_name: String,
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(default)]
    pub device_name: Option<String>,
    #[serde(default)]
    pub bytes_sent: u64,
    #[serde(default)]
    pub bytes_received: u64,
    #[serde(default)]
    pub started_by_username: String,
}

// Unknown phase names are treated as "no phase" rather than a parse error.
fn lenient_sync_state<'de, D>(deserializer: D) -> Result<Option<SyncState>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(SyncState::parse))
}

/// What the task panel renders for one task
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDisplayInfo {
    pub heading_msg: String,
    pub status_msg: String,
    pub started_by_msg: String,
    pub bytes_transferred_msg: String,
    pub device_name_msg: String,
    pub is_running: bool,
    pub can_clear: bool,
    pub can_cancel: bool,
    pub can_retry: bool,
}
