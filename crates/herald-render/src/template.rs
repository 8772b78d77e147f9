//! Partial-template path derivation from notification keys.

/// Root segment every derived template path starts with.
pub const TEMPLATE_ROOT: &str = "notifications";

/// Derive the partial-template path for a notification key.
///
/// Splits the key on `.`, drops a leading `notification` segment if
/// present, prefixes the fixed root, and joins with `/`:
/// `notification.article.create` → `notifications/article/create`,
/// `article.comments.destroy` → `notifications/article/comments/destroy`.
pub fn template_path(key: &str) -> String {
    let mut segments: Vec<&str> = key.split('.').collect();
    if segments.first() == Some(&"notification") {
        segments = segments.split_off(1);
    }
    let mut path = vec![TEMPLATE_ROOT];
    path.extend(segments);
    path.join("/")
}
