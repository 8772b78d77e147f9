//! Translation catalog with `%{name}` interpolation.
//!
//! Catalog entries are keyed by fully-qualified notification keys — the
//! `notification` root segment plus the record key. Lookup normalizes a
//! record's key by prepending the root when absent, so both
//! `article.create` and `notification.article.create` resolve the same
//! entry.

use std::collections::HashMap;
use std::sync::LazyLock;

use herald_core::record::Notification;
use regex::Regex;
use serde_json::{Map, Value};

use crate::errors::RenderError;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%\{(\w+)\}").expect("placeholder pattern is valid"));

/// Fully qualify a notification key with the `notification` root segment.
pub fn qualified_key(key: &str) -> String {
    if key.split('.').next() == Some("notification") {
        key.to_string()
    } else {
        format!("notification.{key}")
    }
}

/// Key-to-template mapping for text rendering.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: HashMap<String, String>,
}

impl Catalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template under a fully-qualified key.
    pub fn insert(&mut self, key: impl Into<String>, template: impl Into<String>) {
        let _ = self.entries.insert(key.into(), template.into());
    }

    /// Number of registered templates.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no templates.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render display text for a notification.
    ///
    /// The notification's stored parameters are merged with `extra`
    /// (extras win), then interpolated into the template. Placeholders
    /// with no matching parameter render as empty.
    pub fn text(
        &self,
        notification: &Notification,
        extra: &Map<String, Value>,
    ) -> Result<String, RenderError> {
        let key = qualified_key(&notification.key);
        let template = self
            .entries
            .get(&key)
            .ok_or(RenderError::MissingTranslation { key })?;

        let mut params = notification.parameters.clone();
        for (name, value) in extra {
            let _ = params.insert(name.clone(), value.clone());
        }

        Ok(interpolate(template, &params))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Catalog {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for (key, template) in iter {
            catalog.insert(key, template);
        }
        catalog
    }
}

/// Substitute `%{name}` placeholders from a parameter mapping.
///
/// String values insert verbatim; other values insert in their JSON
/// display form. Unknown placeholders become empty.
fn interpolate(template: &str, params: &Map<String, Value>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &regex::Captures<'_>| {
            match params.get(&caps[1]) {
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => String::new(),
            }
        })
        .into_owned()
}
