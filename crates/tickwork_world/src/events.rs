//! Deferred event queue.
//!
//! Events are enqueued during the tick and broadcast to subscribers later by
//! [`EventQueue::dispatch`], in the order they were enqueued. Handlers are
//! selected by the event's concrete type.

use std::any::{Any, TypeId};
use std::collections::HashMap;

use tickwork_core::EventSink;
use tracing::trace;

type Handler = Box<dyn FnMut(&dyn Any)>;

#[derive(Default)]
pub struct EventQueue {
    pending: Vec<Box<dyn Any>>,
    handlers: HashMap<TypeId, Vec<Handler>>,
}

impl EventQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `event` for the next [`EventQueue::dispatch`].
    pub fn enqueue<T: 'static>(&mut self, event: T) {
        self.pending.push(Box::new(event));
    }

    /// Register `handler` for every future dispatch of `T`.
    pub fn subscribe<T: 'static, F>(&mut self, mut handler: F)
    where
        F: FnMut(&T) + 'static,
    {
        self.handlers
            .entry(TypeId::of::<T>())
            .or_default()
            .push(Box::new(move |event: &dyn Any| {
                if let Some(event) = event.downcast_ref::<T>() {
                    handler(event);
                }
            }));
    }

    /// Broadcast all pending events and return how many were broadcast.
    ///
    /// Events without subscribers are dropped.
    pub fn dispatch(&mut self) -> usize {
        let pending = std::mem::take(&mut self.pending);
        let count = pending.len();
        for event in pending {
            let event: &dyn Any = event.as_ref();
            match self.handlers.get_mut(&event.type_id()) {
                Some(handlers) => {
                    for handler in handlers.iter_mut() {
                        handler(event);
                    }
                }
                None => trace!("dropping event with no subscribers"),
            }
        }
        count
    }

    /// Take every pending event of type `T`, leaving the rest queued.
    pub fn drain<T: 'static>(&mut self) -> Vec<T> {
        let (matching, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|event| event.is::<T>());
        self.pending = rest;
        matching
            .into_iter()
            .filter_map(|event| event.downcast::<T>().ok())
            .map(|event| *event)
            .collect()
    }

    /// Number of events waiting for dispatch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl EventSink for EventQueue {
    fn publish<T: 'static>(&mut self, event: T) {
        self.enqueue(event);
    }
}

impl std::fmt::Debug for EventQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventQueue")
            .field("pending", &self.pending.len())
            .field("subscribed_types", &self.handlers.len())
            .finish()
    }
}
