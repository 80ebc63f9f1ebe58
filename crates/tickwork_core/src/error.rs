//! Scheduler error types.

use crate::id::ScheduleId;
use crate::Tick;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by a drain pass.
///
/// Unknown ids, cancelled items and dead entities are not errors. The only
/// failure is a payload that returned `Err`; the item is consumed first, so
/// it never runs again, and items still due stay queued for the next pass.
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    /// An entity action or its completion callback failed.
    #[error("action {id} failed at tick {tick}: {source}")]
    ActionFailed {
        id: ScheduleId,
        tick: Tick,
        #[source]
        source: BoxError,
    },

    /// A timed event job failed.
    #[error("event {id} ({name}) failed at tick {tick}: {source}")]
    EventFailed {
        id: ScheduleId,
        name: String,
        tick: Tick,
        #[source]
        source: BoxError,
    },
}

impl SchedulerError {
    /// Id of the item whose payload failed.
    #[must_use]
    pub fn id(&self) -> ScheduleId {
        match self {
            Self::ActionFailed { id, .. } | Self::EventFailed { id, .. } => *id,
        }
    }
}
