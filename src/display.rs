//! Display info for facility tasks
//!
//! Turns a [`TaskRecord`] snapshot into the labels and affordance flags the
//! task panel renders. Sync, removal and import tasks each have their own
//! entry point; [`TaskDisplayInfoMapper::display_info`] picks one from the
//! record's job type.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::bytes::{ByteHumanizer, BytesForHumans};
use crate::error::{Error, Result};
use crate::models::{SyncState, TaskDisplayInfo, TaskKind, TaskRecord, TaskStatus};
use crate::strings::{MessageCatalog, MessageKey, StringResolver};

/// Characters of a facility/device id shown next to its name
const ID_PREFIX_LEN: usize = 4;

type DescriptionTable = HashMap<TaskStatus, MessageKey>;

static GENERIC_DESCRIPTIONS: LazyLock<DescriptionTable> = LazyLock::new(|| {
    HashMap::from([
        (TaskStatus::Pending, MessageKey::TaskWaitingStatus),
        (TaskStatus::Queued, MessageKey::TaskWaitingStatus),
        (TaskStatus::Completed, MessageKey::TaskFinishedStatus),
        (TaskStatus::Canceled, MessageKey::TaskCanceledStatus),
        (TaskStatus::Canceling, MessageKey::TaskCancelingStatus),
        (TaskStatus::Failed, MessageKey::TaskFailedStatus),
    ])
});

static SYNC_DESCRIPTIONS: LazyLock<DescriptionTable> = LazyLock::new(|| {
    let mut table = GENERIC_DESCRIPTIONS.clone();
    table.extend(SyncState::ALL.into_iter().map(|state| {
        let key = match state {
            SyncState::SessionCreation => MessageKey::EstablishingConnectionStatus,
            SyncState::RemoteQueuing => MessageKey::RemotelyPreparingDataStatus,
            SyncState::Pulling => MessageKey::ReceivingDataStatus,
            SyncState::LocalDequeuing => MessageKey::LocallyIntegratingDataStatus,
            SyncState::LocalQueuing => MessageKey::LocallyPreparingDataStatus,
            SyncState::Pushing => MessageKey::SendingDataStatus,
            SyncState::RemoteDequeuing => MessageKey::RemotelyIntegratingDataStatus,
        };
        (TaskStatus::Phase(state), key)
    }));
    table
});

static REMOVE_DESCRIPTIONS: LazyLock<DescriptionTable> = LazyLock::new(|| {
    let mut table = GENERIC_DESCRIPTIONS.clone();
    table.insert(TaskStatus::RemovingFacility, MessageKey::RemovingFacilityStatus);
    table
});

/// Decides whether a finished task may be dismissed from the task list
pub trait ClearPolicy {
    fn is_clearable(&self, task: &TaskRecord) -> bool;
}

impl<F> ClearPolicy for F
where
    F: Fn(&TaskRecord) -> bool,
{
    fn is_clearable(&self, task: &TaskRecord) -> bool {
        self(task)
    }
}

/// Tasks that have canceled, completed or failed can be cleared
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalStatuses;

impl ClearPolicy for TerminalStatuses {
    fn is_clearable(&self, task: &TaskRecord) -> bool {
        matches!(
            task.status,
            TaskStatus::Canceled | TaskStatus::Completed | TaskStatus::Failed
        )
    }
}

/// Which display rules apply to a task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskView {
    Sync,
    Remove,
    Import,
}

impl TryFrom<&TaskKind> for TaskView {
    type Error = Error;

    fn try_from(kind: &TaskKind) -> Result<Self> {
        match kind {
            TaskKind::SyncDataPortal | TaskKind::SyncPeerFull | TaskKind::SyncPeerPull => {
                Ok(Self::Sync)
            }
            TaskKind::DeleteFacility => Ok(Self::Remove),
            TaskKind::ImportFacility => Ok(Self::Import),
            TaskKind::Other(raw) => Err(Error::UnsupportedTaskKind(raw.clone())),
        }
    }
}

/// Maps task records to [`TaskDisplayInfo`] using the given collaborators
#[derive(Debug, Clone)]
pub struct TaskDisplayInfoMapper<S, H = BytesForHumans, C = TerminalStatuses> {
    strings: S,
    bytes: H,
    clear_policy: C,
}

impl Default for TaskDisplayInfoMapper<MessageCatalog> {
    fn default() -> Self {
        Self::new(MessageCatalog::english(), BytesForHumans::default(), TerminalStatuses)
    }
}

impl<S, H, C> TaskDisplayInfoMapper<S, H, C>
where
    S: StringResolver,
    H: ByteHumanizer,
    C: ClearPolicy,
{
    pub fn new(strings: S, bytes: H, clear_policy: C) -> Self {
        Self {
            strings,
            bytes,
            clear_policy,
        }
    }

    /// Render a task according to its job type
    pub fn display_info(&self, task: &TaskRecord) -> Result<TaskDisplayInfo> {
        let kind = task.kind.as_ref().ok_or(Error::MissingTaskKind)?;
        let view = TaskView::try_from(kind)?;
        Ok(self.render(view, task))
    }

    pub fn render(&self, view: TaskView, task: &TaskRecord) -> TaskDisplayInfo {
        match view {
            TaskView::Sync => self.sync_facility(task),
            TaskView::Remove => self.remove_facility(task),
            TaskView::Import => self.import_facility(task),
        }
    }

    /// Display info for a facility sync task
    pub fn sync_facility(&self, task: &TaskRecord) -> TaskDisplayInfo {
        tracing::debug!(
            status = %task.status,
            sync_state = ?task.sync_state,
            "Rendering sync facility task"
        );

        let facility_name = self.name_with_id(&task.facility_name, task.facility.as_deref());

        // The setup wizard leaves device_name out; the panel then shows no device line.
        let device_name_msg = match task.device_name.as_deref().filter(|n| !n.is_empty()) {
            Some(device_name) => {
                let phrase = self.name_with_id(device_name, task.device_id.as_deref());
                self.strings
                    .resolve(MessageKey::QuotedPhrase, &[("phrase", phrase.as_str())])
            }
            None => String::new(),
        };

        let sync_step = task.sync_state.map(SyncState::step);
        let description = self.describe(&SYNC_DESCRIPTIONS, &task.status);

        let status_msg = match sync_step {
            Some(step) => {
                let step = step.to_string();
                let total = SyncState::TOTAL_STEPS.to_string();
                self.strings.resolve(
                    MessageKey::SyncStepAndDescription,
                    &[
                        ("step", step.as_str()),
                        ("total", total.as_str()),
                        ("description", description.as_str()),
                    ],
                )
            }
            None => description,
        };

        let bytes_transferred_msg = if task.status == TaskStatus::Completed {
            let received = self.bytes.humanize(task.bytes_received);
            let sent = self.bytes.humanize(task.bytes_sent);
            self.strings.resolve(
                MessageKey::SyncBytesSentAndReceived,
                &[("bytesReceived", received.as_str()), ("bytesSent", sent.as_str())],
            )
        } else {
            String::new()
        };

        let can_clear = self.clear_policy.is_clearable(task);

        TaskDisplayInfo {
            heading_msg: self.strings.resolve(
                MessageKey::SyncFacilityTaskLabel,
                &[("facilityName", facility_name.as_str())],
            ),
            status_msg,
            started_by_msg: self.started_by(task),
            bytes_transferred_msg,
            device_name_msg,
            is_running: sync_step.is_some() && !can_clear,
            can_clear,
            can_cancel: !can_clear,
            can_retry: task.status == TaskStatus::Failed,
        }
    }

    /// Display info for a facility removal task.
    ///
    /// Removal is a single phase, so the status line never carries a step.
    pub fn remove_facility(&self, task: &TaskRecord) -> TaskDisplayInfo {
        tracing::debug!(status = %task.status, "Rendering remove facility task");

        let facility_name = self.name_with_id(&task.facility_name, task.facility_id.as_deref());
        let removing = task.status == TaskStatus::RemovingFacility;
        let can_clear = self.clear_policy.is_clearable(task);

        TaskDisplayInfo {
            heading_msg: self.strings.resolve(
                MessageKey::RemoveFacilityTaskLabel,
                &[("facilityName", facility_name.as_str())],
            ),
            status_msg: self.describe(&REMOVE_DESCRIPTIONS, &task.status),
            started_by_msg: self.started_by(task),
            bytes_transferred_msg: String::new(),
            device_name_msg: String::new(),
            is_running: removing,
            can_clear,
            can_cancel: !can_clear && !removing,
            can_retry: task.status == TaskStatus::Failed,
        }
    }

    /// Display info for a facility import task.
    ///
    /// Built from the sync rendering (heading included), with the outcome
    /// replacing the device line. Imports are never retried or cleared here.
    pub fn import_facility(&self, task: &TaskRecord) -> TaskDisplayInfo {
        let sync = self.sync_facility(task);
        let facility = [("facilityName", task.facility_name.as_str())];

        let outcome = match task.status {
            TaskStatus::Failed => Some((MessageKey::ImportFailedStatus, MessageKey::TaskFailedStatus)),
            TaskStatus::Completed => {
                Some((MessageKey::ImportSuccessStatus, MessageKey::TaskFinishedStatus))
            }
            _ => None,
        };

        match outcome {
            Some((device_key, status_key)) => TaskDisplayInfo {
                device_name_msg: self.strings.resolve(device_key, &facility),
                status_msg: self.strings.resolve(status_key, &[]),
                is_running: false,
                can_retry: false,
                can_clear: false,
                ..sync
            },
            None => TaskDisplayInfo {
                device_name_msg: String::new(),
                can_retry: false,
                can_clear: false,
                ..sync
            },
        }
    }

    fn describe(&self, table: &DescriptionTable, status: &TaskStatus) -> String {
        let key = table.get(status).copied().unwrap_or_else(|| {
            tracing::debug!(%status, "No description for task status");
            MessageKey::TaskUnknownStatus
        });
        self.strings.resolve(key, &[])
    }

    fn name_with_id(&self, name: &str, id: Option<&str>) -> String {
        let short_id: String = id.unwrap_or_default().chars().take(ID_PREFIX_LEN).collect();
        self.strings.resolve(
            MessageKey::NameWithIdInParens,
            &[("name", name), ("id", short_id.as_str())],
        )
    }

    fn started_by(&self, task: &TaskRecord) -> String {
        self.strings.resolve(
            MessageKey::TaskStartedByLabel,
            &[("username", task.started_by_username.as_str())],
        )
    }
}
