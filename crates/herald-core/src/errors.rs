//! Error types shared across the herald crates.

use thiserror::Error;

use crate::sink::SinkError;

/// Errors that can occur while resolving and creating notifications.
#[derive(Debug, Error)]
pub enum TrackError {
    /// No key could be derived for a notification.
    ///
    /// Raised by the settings merger when neither a call-site key, an
    /// instance pending key, nor an action to derive one from is present.
    #[error("no key provided for {type_name}")]
    MissingKey {
        /// Type name of the model the creation was attempted for.
        type_name: String,
    },

    /// An attribute reference named an accessor the model does not have.
    #[error("unknown attribute '{attribute}' on {type_name}")]
    UnknownAttribute {
        /// Type name of the model.
        type_name: String,
        /// The attribute that failed to dispatch.
        attribute: String,
    },

    /// A resolved owner/recipient value was not null or an entity reference.
    #[error("invalid entity reference for '{field}': {value}")]
    InvalidReference {
        /// Field being resolved (`owner` or `recipient`).
        field: String,
        /// Display form of the offending value.
        value: String,
    },

    /// The creation sink failed to persist the record.
    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Convenience alias for results in the creation path.
pub type Result<T> = std::result::Result<T, TrackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_display() {
        let err = TrackError::MissingKey {
            type_name: "Article".into(),
        };
        assert_eq!(err.to_string(), "no key provided for Article");
    }

    #[test]
    fn test_unknown_attribute_display() {
        let err = TrackError::UnknownAttribute {
            type_name: "Article".into(),
            attribute: "author".into(),
        };
        assert_eq!(err.to_string(), "unknown attribute 'author' on Article");
    }

    #[test]
    fn test_sink_error_converts() {
        #[derive(Debug, Error)]
        #[error("boom")]
        struct Boom;

        let err: TrackError = SinkError::new(Boom).into();
        assert_eq!(err.to_string(), "persistence error: boom");
    }
}
