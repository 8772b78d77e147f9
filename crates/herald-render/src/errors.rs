//! Rendering error types.

use thiserror::Error;

/// Errors that can occur while rendering a notification.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The catalog has no entry for the notification's key.
    #[error("no translation for key: {key}")]
    MissingTranslation {
        /// The fully-qualified key that was looked up.
        key: String,
    },
}
