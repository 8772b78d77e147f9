//! The tagged dynamic-value type and its resolver.
//!
//! Every configurable notification field — owner, recipient, any
//! parameter or custom field — is a [`Setting`]: a literal used as-is,
//! the name of an attribute read off the model, or a closure computed
//! from the ambient context and the model. Resolution happens once per
//! creation, at merge time.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::context::RequestContext;
use crate::entity::EntityRef;
use crate::errors::{Result, TrackError};
use crate::trackable::Trackable;

/// Closure form of a dynamic value.
///
/// Invoked with the ambient request context (if any) and the model the
/// notification is being created for.
pub type ComputeFn = dyn Fn(Option<&RequestContext>, &dyn Trackable) -> Value + Send + Sync;

/// A configuration value resolved at notification-creation time.
#[derive(Clone)]
pub enum Setting {
    /// A plain value, returned unchanged.
    Literal(Value),
    /// The name of a zero-argument attribute invoked on the model.
    Attribute(String),
    /// A closure invoked with `(ambient_context, model)`.
    Compute(Arc<ComputeFn>),
}

impl Setting {
    /// An explicit null literal.
    ///
    /// Passed at a call site, this suppresses instance and class-level
    /// defaults for the field — distinct from omitting the field, which
    /// falls through to them.
    pub fn null() -> Self {
        Self::Literal(Value::Null)
    }

    /// Attribute reference by name.
    pub fn attribute(name: impl Into<String>) -> Self {
        Self::Attribute(name.into())
    }

    /// Literal entity reference, e.g. a concrete owner.
    pub fn entity(entity: &EntityRef) -> Self {
        Self::Literal(entity.to_value())
    }

    /// Computed value from a closure.
    pub fn compute<F>(f: F) -> Self
    where
        F: Fn(Option<&RequestContext>, &dyn Trackable) -> Value + Send + Sync + 'static,
    {
        Self::Compute(Arc::new(f))
    }
}

impl<V: Into<Value>> From<V> for Setting {
    fn from(value: V) -> Self {
        Self::Literal(value.into())
    }
}

impl fmt::Debug for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Attribute(name) => f.debug_tuple("Attribute").field(name).finish(),
            Self::Compute(_) => f.write_str("Compute(..)"),
        }
    }
}

/// Resolve a [`Setting`] against a model and the ambient context.
///
/// Literals pass through unchanged and cannot fail. Attribute references
/// dispatch to [`Trackable::attribute`]; a model without the named
/// attribute is [`TrackError::UnknownAttribute`]. Closures are invoked
/// with `(ambient_context, model)`.
pub fn resolve_value(
    ctx: Option<&RequestContext>,
    model: &dyn Trackable,
    setting: &Setting,
) -> Result<Value> {
    match setting {
        Setting::Literal(value) => Ok(value.clone()),
        Setting::Attribute(name) => {
            model
                .attribute(name)
                .ok_or_else(|| TrackError::UnknownAttribute {
                    type_name: model.type_name().to_string(),
                    attribute: name.clone(),
                })
        }
        Setting::Compute(f) => Ok(f(ctx, model)),
    }
}
