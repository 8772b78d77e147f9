//! # herald-store
//!
//! `SQLite`-backed persistence for notification records: a pooled
//! connection layer, embedded schema migrations, and the
//! [`NotificationStore`](store::NotificationStore) facade implementing
//! the core's [`CreationSink`](herald_core::CreationSink).
//!
//! Beyond creation, the store carries the query surface the read side
//! needs — notifications by source entity, by owner, by recipient — and
//! the per-recipient read/unread tracking on the `notifyings` join.

#![deny(unsafe_code)]

pub mod connection;
pub mod errors;
pub mod migrations;
pub mod repositories;
pub mod row_types;
pub mod store;

pub use errors::{Result, StoreError};
pub use store::NotificationStore;
