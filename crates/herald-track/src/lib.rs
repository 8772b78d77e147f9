//! # herald-track
//!
//! The creation path for notification records: per-type configuration,
//! per-instance pending overrides, the settings merger that layers them
//! with call-site options, the hook gate that approves or declines each
//! creation, and the [`Tracker`](tracker::Tracker) orchestrating the
//! persistence lifecycle events.
//!
//! ## Layered configuration
//!
//! Three layers feed every creation, lowest precedence first:
//! 1. class-level defaults ([`TrackedConfig`](config::TrackedConfig)),
//! 2. instance pending state ([`PendingOptions`](pending::PendingOptions)),
//! 3. call-site options ([`CreateOptions`](settings::CreateOptions)).
//!
//! Scalar fields take the highest-precedence present value (an explicit
//! null at the call site suppresses the lower layers); mappings merge
//! with later layers overwriting same-named keys. Every value may be a
//! dynamic [`Setting`](herald_core::Setting) resolved at creation time.
//!
//! ## Example
//!
//! ```rust
//! use herald_track::config::TrackedConfig;
//! use herald_track::tracker::Tracker;
//!
//! let config = TrackedConfig::builder()
//!     .owner(herald_core::Setting::attribute("author"))
//!     .build();
//! // let tracker = Tracker::new(config, sink);
//! // tracker.after_create(&article, &mut pending, None)?;
//! ```

#![deny(unsafe_code)]

pub mod config;
pub mod gate;
pub mod pending;
pub mod settings;
pub mod tracker;

pub use config::{EventKind, Hook, TrackedConfig, TrackedConfigBuilder};
pub use pending::PendingOptions;
pub use settings::{CreateOptions, prepare_settings};
pub use tracker::Tracker;
