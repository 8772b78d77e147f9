//! Notification record types.
//!
//! [`ResolvedNotification`] is the merger's output — the full field set
//! for one creation. [`Notification`] and [`Notifying`] are the persisted
//! shapes owned by the creation sink: the record itself and the
//! per-recipient delivery link carrying the read flag.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::entity::EntityRef;

/// Reserved core field names that custom fields may never occupy.
pub const RESERVED_FIELDS: &[&str] = &["key", "owner", "recipient", "parameters"];

/// The resolved field set for one notification creation.
///
/// Produced by the settings merger; every dynamic value has already been
/// resolved. The key is never empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolvedNotification {
    /// Dot-separated semantic key, e.g. `article.create`.
    pub key: String,
    /// Entity responsible for the event, if any.
    pub owner: Option<EntityRef>,
    /// Entity the notification is directed at, if any.
    pub recipient: Option<EntityRef>,
    /// Resolved parameter mapping.
    pub parameters: Map<String, Value>,
    /// Resolved custom fields. Never contains a [`RESERVED_FIELDS`] name.
    pub custom_fields: Map<String, Value>,
}

impl ResolvedNotification {
    /// Flatten into a single field mapping, custom fields first so the
    /// four core fields win on any name collision.
    pub fn into_fields(self) -> Map<String, Value> {
        let mut fields = self.custom_fields;
        let _ = fields.insert("key".to_string(), Value::String(self.key));
        let _ = fields.insert(
            "owner".to_string(),
            self.owner.map_or(Value::Null, |o| o.to_value()),
        );
        let _ = fields.insert(
            "recipient".to_string(),
            self.recipient.map_or(Value::Null, |r| r.to_value()),
        );
        let _ = fields.insert("parameters".to_string(), Value::Object(self.parameters));
        fields
    }
}

/// A persisted notification record.
///
/// Created by the sink, never mutated by the core. Recipients hang off
/// the record via [`Notifying`] links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Record id (`ntf_…`).
    pub id: String,
    /// Source entity the notification describes.
    pub notifiable: EntityRef,
    /// Entity responsible for the event, if any.
    pub owner: Option<EntityRef>,
    /// Dot-separated semantic key.
    pub key: String,
    /// Parameter blob for rendering.
    pub parameters: Map<String, Value>,
    /// Flat extra fields resolved at creation.
    pub custom_fields: Map<String, Value>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Join record associating one notification with one recipient.
///
/// Exactly one link exists per (notification, recipient) pair. The read
/// flag defaults to false and is flipped by explicit recipient action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notifying {
    /// Link id (`nfy_…`).
    pub id: String,
    /// Notification this link belongs to.
    pub notification_id: String,
    /// Recipient the notification is directed at.
    pub recipient: EntityRef,
    /// Whether the recipient has read the notification.
    pub read: bool,
}
