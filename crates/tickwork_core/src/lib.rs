//! # tickwork_core
//!
//! Discrete-time scheduling for simulation loops that advance logical ticks
//! rather than wall-clock time.
//!
//! Callers register work tagged with a target tick and call `advance(tick)`
//! each step. Every due item runs exactly once, earliest tick first and
//! highest priority first within a tick. Cancellation is a constant-time
//! removal from an active-set; the queue entry is left behind and discarded
//! when it reaches the head.
//!
//! This crate provides:
//!
//! - [`EntityActionScheduler`] — actions bound to an [`Entity`], run against
//!   an [`EntityStore`] and an [`EventSink`].
//! - [`TimedEventScheduler`] — self-contained [`TimedEvent`] jobs with an
//!   explicit priority and display name.
//! - [`PendingQueue`], [`ActiveSet`] and [`Timeline`] — the shared machinery
//!   both schedulers are built on.
//!
//! Neither scheduler is thread-safe. Callers that share one across threads
//! must serialise every call behind a single lock.
//!
//! [`Entity`]: tickwork_entity::Entity

pub mod action;
pub mod active;
pub mod error;
pub mod id;
pub mod queue;
pub mod store;
pub mod timed;
pub mod timeline;

pub use action::{ActionCompleted, ActionContext, ActionFn, EntityActionScheduler, ScheduledAction};
pub use active::ActiveSet;
pub use error::SchedulerError;
pub use id::{ActionId, EventId, IdAllocator, ScheduleId};
pub use queue::{PendingKey, PendingQueue};
pub use store::{EntityStore, EventSink};
pub use timed::{EventContext, JobFn, TimedEvent, TimedEventScheduler};
pub use timeline::Timeline;

/// Logical simulation time.
pub type Tick = i64;

/// Same-tick ordering weight. Higher runs first.
pub type Priority = i32;
