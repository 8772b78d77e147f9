//! Polymorphic entity references.
//!
//! Owners, recipients, and notifiable sources are all identified the same
//! way: a type discriminator plus a numeric id. References are opaque to
//! the core — nothing here ever loads the referenced entity.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::TrackError;

/// A polymorphic reference to a persisted entity (`kind` + `id`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    /// Type discriminator, e.g. `User` or `Blog::Post`.
    pub kind: String,
    /// Primary key of the referenced entity.
    pub id: i64,
}

impl EntityRef {
    /// Create a reference from a kind and id.
    pub fn new(kind: impl Into<String>, id: i64) -> Self {
        Self {
            kind: kind.into(),
            id,
        }
    }

    /// Convert a resolved dynamic value into an optional reference.
    ///
    /// `null` resolves to `None` (no entity). An object with `kind` and
    /// `id` fields resolves to `Some`. Anything else is
    /// [`TrackError::InvalidReference`], tagged with the field being
    /// resolved.
    pub fn from_value(field: &str, value: Value) -> Result<Option<Self>, TrackError> {
        match value {
            Value::Null => Ok(None),
            other => serde_json::from_value(other.clone()).map(Some).map_err(|_| {
                TrackError::InvalidReference {
                    field: field.to_string(),
                    value: other.to_string(),
                }
            }),
        }
    }

    /// Serialize the reference back into a dynamic value.
    pub fn to_value(&self) -> Value {
        serde_json::json!({ "kind": self.kind, "id": self.id })
    }
}

impl std::fmt::Display for EntityRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.kind, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_display() {
        let user = EntityRef::new("User", 7);
        assert_eq!(user.to_string(), "User#7");
    }

    #[test]
    fn test_from_value_null_is_none() {
        let resolved = EntityRef::from_value("owner", Value::Null).unwrap();
        assert!(resolved.is_none());
    }

    #[test]
    fn test_from_value_object() {
        let value = serde_json::json!({"kind": "User", "id": 3});
        let resolved = EntityRef::from_value("owner", value).unwrap();
        assert_eq!(resolved, Some(EntityRef::new("User", 3)));
    }

    #[test]
    fn test_from_value_rejects_scalar() {
        let err = EntityRef::from_value("recipient", serde_json::json!(42)).unwrap_err();
        assert_matches!(err, TrackError::InvalidReference { ref field, .. } if field == "recipient");
    }

    #[test]
    fn test_round_trip_through_value() {
        let user = EntityRef::new("User", 11);
        let back = EntityRef::from_value("owner", user.to_value()).unwrap();
        assert_eq!(back, Some(user));
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_value(EntityRef::new("Article", 1)).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "Article", "id": 1}));
    }
}
