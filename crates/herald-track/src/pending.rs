//! Per-instance pending overrides.
//!
//! Mutable scratch state carried alongside a tracked model instance:
//! values staged for the next notification creation. Reset to empty by
//! the tracker after every successful creation; left untouched when a
//! creation is declined or suppressed.

use std::collections::BTreeMap;

use herald_core::setting::Setting;

/// Pending per-instance notification options.
#[derive(Debug, Clone, Default)]
pub struct PendingOptions {
    /// Custom key overriding the action-derived one.
    pub key: Option<String>,
    /// Owner override for the next creation.
    pub owner: Option<Setting>,
    /// Recipient override for the next creation.
    pub recipient: Option<Setting>,
    /// Parameter overrides, merged over the class defaults.
    pub params: BTreeMap<String, Setting>,
    /// Custom-field overrides, merged over the class defaults.
    pub custom_fields: BTreeMap<String, Setting>,
}

impl PendingOptions {
    /// Empty pending state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a custom key.
    pub fn set_key(&mut self, key: impl Into<String>) -> &mut Self {
        self.key = Some(key.into());
        self
    }

    /// Stage an owner override.
    pub fn set_owner(&mut self, setting: Setting) -> &mut Self {
        self.owner = Some(setting);
        self
    }

    /// Stage a recipient override.
    pub fn set_recipient(&mut self, setting: Setting) -> &mut Self {
        self.recipient = Some(setting);
        self
    }

    /// Stage one parameter.
    pub fn set_param(&mut self, name: impl Into<String>, setting: Setting) -> &mut Self {
        let _ = self.params.insert(name.into(), setting);
        self
    }

    /// Stage one custom field.
    pub fn set_custom_field(&mut self, name: impl Into<String>, setting: Setting) -> &mut Self {
        let _ = self.custom_fields.insert(name.into(), setting);
        self
    }

    /// Whether nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.key.is_none()
            && self.owner.is_none()
            && self.recipient.is_none()
            && self.params.is_empty()
            && self.custom_fields.is_empty()
    }

    /// Return every field to its empty default.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
