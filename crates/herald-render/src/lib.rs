//! # herald-render
//!
//! Turns persisted notifications back into display text. Two mechanisms,
//! both keyed by the notification's dot-separated key:
//!
//! - a translation [`Catalog`](catalog::Catalog) mapping fully-qualified
//!   keys to templates with `%{name}` placeholders filled from the
//!   notification's parameters;
//! - [`template_path`](template::template_path) derivation, mapping a key
//!   to the partial-template path a view layer would look up.

#![deny(unsafe_code)]

pub mod catalog;
pub mod errors;
pub mod template;

pub use catalog::Catalog;
pub use errors::RenderError;
pub use template::template_path;
