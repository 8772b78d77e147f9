//! The tracked-model capability trait.

use serde_json::Value;

use crate::entity::EntityRef;

/// A domain model whose lifecycle events may produce notifications.
///
/// Host models implement this to expose the three things the core needs:
/// their (possibly namespaced) type name for key derivation, a reference
/// to themselves for the notifiable association, and named attribute
/// dispatch for [`Setting::Attribute`](crate::setting::Setting::Attribute)
/// resolution.
pub trait Trackable {
    /// Type name of the model, e.g. `Article` or `Blog::Post`.
    ///
    /// Namespace segments are separated by `::` and are flattened to
    /// underscores when deriving notification keys.
    fn type_name(&self) -> &str;

    /// Reference to this instance as the notifiable source.
    fn entity_ref(&self) -> EntityRef;

    /// Look up a named zero-argument attribute on the model.
    ///
    /// Returns `None` when the model exposes no such attribute, which
    /// surfaces as [`TrackError::UnknownAttribute`](crate::errors::TrackError::UnknownAttribute)
    /// during resolution.
    fn attribute(&self, name: &str) -> Option<Value>;
}
