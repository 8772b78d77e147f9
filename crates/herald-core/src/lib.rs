//! # herald-core
//!
//! Foundation crate for herald: polymorphic entity references, the tagged
//! dynamic-value type ([`Setting`](setting::Setting)) and its resolver,
//! the ambient request context with a thread-local fallback registry,
//! notification record types, the [`CreationSink`](sink::CreationSink)
//! capability trait, and the shared error taxonomy.
//!
//! ## Value Resolution
//!
//! Configuration values for notification fields come in three shapes:
//! a plain literal, the name of an attribute to read off the tracked
//! model, or a closure computed from the ambient context and the model.
//! [`resolve_value`](setting::resolve_value) turns any of them into a
//! concrete [`serde_json::Value`] at creation time.
//!
//! ## Ambient Context
//!
//! The preferred flow passes [`RequestContext`](context::RequestContext)
//! explicitly down the call chain. For host boundaries that cannot thread
//! it, [`context::ambient`] offers a per-thread fallback store — writes
//! from one thread are never observable from another.

#![deny(unsafe_code)]

pub mod context;
pub mod entity;
pub mod errors;
pub mod record;
pub mod setting;
pub mod sink;
pub mod switch;
pub mod trackable;

pub use context::RequestContext;
pub use entity::EntityRef;
pub use errors::{Result, TrackError};
pub use record::{Notification, Notifying, ResolvedNotification};
pub use setting::{Setting, resolve_value};
pub use sink::{CreationSink, SinkError};
pub use trackable::Trackable;
