//! The creation-sink capability trait.
//!
//! The sink is the storage adapter that persists notification records.
//! The core prescribes nothing about the backend beyond this contract;
//! `herald-store` ships a `SQLite` implementation.

use thiserror::Error;

use crate::entity::EntityRef;
use crate::record::{Notification, ResolvedNotification};

/// Opaque persistence failure from a creation sink.
///
/// Propagated unchanged through the orchestrator — no retry, no local
/// recovery.
#[derive(Debug, Error)]
#[error("persistence error: {0}")]
pub struct SinkError(#[source] pub Box<dyn std::error::Error + Send + Sync>);

impl SinkError {
    /// Wrap a backend error.
    pub fn new(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self(Box::new(err))
    }
}

/// Storage adapter persisting notification records.
///
/// Implementations must create the recipient link (read = false) when the
/// resolved recipient is present, and uphold the invariant of exactly one
/// link per (notification, recipient) pair.
pub trait CreationSink: Send + Sync {
    /// Persist one notification for the given source entity.
    fn create(
        &self,
        notifiable: &EntityRef,
        resolved: &ResolvedNotification,
    ) -> Result<Notification, SinkError>;
}
