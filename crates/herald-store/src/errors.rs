//! Error types for the notification store.

use thiserror::Error;

/// Errors that can occur during notification store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// `SQLite` database error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection pool error.
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// JSON column serialization/deserialization error.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Stored timestamp failed to parse.
    #[error("timestamp parse error: {0}")]
    Timestamp(#[from] chrono::ParseError),

    /// Schema migration failed.
    #[error("migration error: {message}")]
    Migration {
        /// Describes which migration failed and why.
        message: String,
    },

    /// Requested notification was not found.
    #[error("notification not found: {0}")]
    NotificationNotFound(String),

    /// No recipient link exists for the (notification, recipient) pair.
    #[error("no recipient link for {recipient} on {notification_id}")]
    LinkNotFound {
        /// Notification the link was looked up on.
        notification_id: String,
        /// Recipient display form (`kind#id`).
        recipient: String,
    },

    /// A recipient link already exists for the (notification, recipient) pair.
    #[error("recipient {recipient} already linked to {notification_id}")]
    DuplicateRecipient {
        /// Notification the link was attempted on.
        notification_id: String,
        /// Recipient display form (`kind#id`).
        recipient: String,
    },
}

/// Convenience alias for store results.
pub type Result<T> = std::result::Result<T, StoreError>;
