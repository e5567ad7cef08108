//! facility-taskview - display info for facility tasks
//!
//! Derives the headings, status lines and action flags a task panel shows
//! for facility sync, removal and import tasks.

pub mod api;
pub mod bytes;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod strings;

pub use bytes::{ByteHumanizer, ByteUnits, BytesForHumans};
pub use display::{ClearPolicy, TaskDisplayInfoMapper, TaskView, TerminalStatuses};
pub use error::{Error, Result};
pub use models::{SyncState, TaskDisplayInfo, TaskKind, TaskRecord, TaskStatus};
pub use strings::{MessageCatalog, MessageKey, StringResolver};
