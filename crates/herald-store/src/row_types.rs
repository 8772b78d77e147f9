//! Database row types mapping between `SQLite` rows and Rust structs.
//!
//! These are the raw row shapes, not the public API types — conversion
//! to [`Notification`](herald_core::Notification) and
//! [`Notifying`](herald_core::Notifying) happens in the repository layer.

use serde::{Deserialize, Serialize};

/// Raw row from the `notifications` table.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NotificationRow {
    /// Record id.
    pub id: String,
    /// Notifiable type discriminator.
    pub notifiable_kind: String,
    /// Notifiable primary key.
    pub notifiable_id: i64,
    /// Owner type discriminator, if any.
    pub owner_kind: Option<String>,
    /// Owner primary key, if any.
    pub owner_id: Option<i64>,
    /// Notification key.
    pub key: String,
    /// Parameters JSON.
    pub parameters: String,
    /// Custom fields JSON.
    pub custom_fields: String,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
}

/// Raw row from the `notifyings` table.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NotifyingRow {
    /// Link id.
    pub id: String,
    /// Notification this link belongs to.
    pub notification_id: String,
    /// Recipient type discriminator.
    pub recipient_kind: String,
    /// Recipient primary key.
    pub recipient_id: i64,
    /// Read flag.
    pub read: bool,
}
