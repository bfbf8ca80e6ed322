//! Timer events

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event emitted by the timer controller
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimerEvent {
    pub event_type: TimerEventType,
    pub entry_id: Option<Uuid>,
    pub timestamp: DateTime<Utc>,
}

/// Types of timer events
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimerEventType {
    /// A new entry started running
    Started { project_id: Uuid },
    /// The running entry was stopped and persisted
    Stopped { duration_seconds: u64 },
    /// The running entry was paused (persisted like a stop, no audit record)
    Paused { elapsed_seconds: u64 },
    /// A stopped entry was revived with a fresh start time
    Resumed,
    /// Periodic elapsed-time recomputation
    Tick { elapsed_seconds: u64 },
    /// State was reconstructed from the remote store
    Refreshed { running: bool, elapsed_seconds: u64 },
}

impl TimerEvent {
    pub fn new(event_type: TimerEventType, entry_id: Option<Uuid>) -> Self {
        Self {
            event_type,
            entry_id,
            timestamp: Utc::now(),
        }
    }

    pub fn started(entry_id: Uuid, project_id: Uuid) -> Self {
        Self::new(TimerEventType::Started { project_id }, Some(entry_id))
    }

    pub fn stopped(entry_id: Uuid, duration_seconds: u64) -> Self {
        Self::new(TimerEventType::Stopped { duration_seconds }, Some(entry_id))
    }

    pub fn paused(entry_id: Uuid, elapsed_seconds: u64) -> Self {
        Self::new(TimerEventType::Paused { elapsed_seconds }, Some(entry_id))
    }

    pub fn resumed(entry_id: Uuid) -> Self {
        Self::new(TimerEventType::Resumed, Some(entry_id))
    }

    pub fn tick(entry_id: Uuid, elapsed_seconds: u64) -> Self {
        Self::new(TimerEventType::Tick { elapsed_seconds }, Some(entry_id))
    }

    pub fn refreshed(entry_id: Option<Uuid>, elapsed_seconds: u64) -> Self {
        Self::new(
            TimerEventType::Refreshed {
                running: entry_id.is_some(),
                elapsed_seconds,
            },
            entry_id,
        )
    }
}
