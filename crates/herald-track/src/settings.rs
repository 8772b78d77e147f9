//! Settings merger — resolves the final field set for one creation.
//!
//! Three layers feed the merge, lowest precedence first: class-level
//! defaults, instance pending state, call-site options. Scalar fields
//! (key, owner, recipient) take the highest-precedence present value;
//! parameter and custom-field mappings merge with later layers
//! overwriting same-named keys. Every surviving value passes through the
//! value resolver with the model as context.

use std::collections::BTreeMap;

use convert_case::{Case, Casing};
use herald_core::context::RequestContext;
use herald_core::entity::EntityRef;
use herald_core::errors::{Result, TrackError};
use herald_core::record::{RESERVED_FIELDS, ResolvedNotification};
use herald_core::setting::{Setting, resolve_value};
use herald_core::trackable::Trackable;
use serde_json::Map;

/// Call-site options for one notification creation.
///
/// Highest-precedence layer. For owner and recipient, `Some(Setting::null())`
/// is an explicit null that suppresses the instance and class defaults;
/// `None` means the field was omitted and falls through to them.
#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    /// Action name; used for key derivation and hook lookup.
    pub action: Option<String>,
    /// Full key, overriding every other key source.
    pub key: Option<String>,
    /// Owner override.
    pub owner: Option<Setting>,
    /// Recipient override.
    pub recipient: Option<Setting>,
    /// Parameter overrides, merged last.
    pub params: BTreeMap<String, Setting>,
    /// Any additional fields, merged into the record's custom fields.
    pub custom_fields: BTreeMap<String, Setting>,
}

impl CreateOptions {
    /// Empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the action name.
    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Set the full key.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Set the owner override. Use [`Setting::null`] to suppress defaults.
    pub fn owner(mut self, setting: Setting) -> Self {
        self.owner = Some(setting);
        self
    }

    /// Set the recipient override. Use [`Setting::null`] to suppress defaults.
    pub fn recipient(mut self, setting: Setting) -> Self {
        self.recipient = Some(setting);
        self
    }

    /// Add one parameter override.
    pub fn param(mut self, name: impl Into<String>, setting: Setting) -> Self {
        let _ = self.params.insert(name.into(), setting);
        self
    }

    /// Add one custom field.
    pub fn custom_field(mut self, name: impl Into<String>, setting: Setting) -> Self {
        let _ = self.custom_fields.insert(name.into(), setting);
        self
    }
}

/// Derive the default key for a type and action.
///
/// Namespace separators in the type name flatten to underscores:
/// `Blog::Post` + `create` → `blog_post.create`.
fn derived_key(type_name: &str, action: &str) -> String {
    let prefix = type_name
        .split("::")
        .map(|segment| segment.to_case(Case::Snake))
        .collect::<Vec<_>>()
        .join("_");
    format!("{prefix}.{action}")
}

/// Last dot-segment of a key, used for hook lookup on direct creation.
pub(crate) fn last_segment(key: &str) -> Option<String> {
    key.rsplit('.').next().filter(|s| !s.is_empty()).map(String::from)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

fn resolve_reference(
    field: &'static str,
    chosen: Option<&Setting>,
    model: &dyn Trackable,
    ctx: Option<&RequestContext>,
) -> Result<Option<EntityRef>> {
    match chosen {
        None => Ok(None),
        Some(setting) => {
            let value = resolve_value(ctx, model, setting)?;
            EntityRef::from_value(field, value)
        }
    }
}

fn resolve_mapping(
    merged: &BTreeMap<String, Setting>,
    model: &dyn Trackable,
    ctx: Option<&RequestContext>,
    skip_reserved: bool,
) -> Result<Map<String, serde_json::Value>> {
    let mut out = Map::new();
    for (name, setting) in merged {
        if skip_reserved && RESERVED_FIELDS.contains(&name.as_str()) {
            continue;
        }
        let _ = out.insert(name.clone(), resolve_value(ctx, model, setting)?);
    }
    Ok(out)
}

/// Resolve the final field set for one notification creation.
///
/// Fails with [`TrackError::MissingKey`] exactly when no key can be
/// derived — no explicit key, no pending key, and no action. Every other
/// input is accepted as-is.
pub fn prepare_settings(
    model: &dyn Trackable,
    pending: &crate::pending::PendingOptions,
    config: &crate::config::TrackedConfig,
    action: Option<&str>,
    options: &CreateOptions,
    ctx: Option<&RequestContext>,
) -> Result<ResolvedNotification> {
    let action = non_empty(action.map(str::to_string)).or_else(|| non_empty(options.action.clone()));

    let key = non_empty(options.key.clone())
        .or_else(|| non_empty(pending.key.clone()))
        .or_else(|| {
            action
                .as_deref()
                .map(|a| derived_key(model.type_name(), a))
        })
        .ok_or_else(|| TrackError::MissingKey {
            type_name: model.type_name().to_string(),
        })?;

    let owner = resolve_reference(
        "owner",
        options
            .owner
            .as_ref()
            .or(pending.owner.as_ref())
            .or(config.owner.as_ref()),
        model,
        ctx,
    )?;

    let recipient = resolve_reference(
        "recipient",
        options
            .recipient
            .as_ref()
            .or(pending.recipient.as_ref())
            .or(config.recipient.as_ref()),
        model,
        ctx,
    )?;

    let mut params = config.params.clone();
    params.extend(pending.params.clone());
    params.extend(options.params.clone());
    let parameters = resolve_mapping(&params, model, ctx, false)?;

    let mut customs = config.custom_fields.clone();
    customs.extend(pending.custom_fields.clone());
    customs.extend(options.custom_fields.clone());
    let custom_fields = resolve_mapping(&customs, model, ctx, true)?;

    Ok(ResolvedNotification {
        key,
        owner,
        recipient,
        parameters,
        custom_fields,
    })
}
