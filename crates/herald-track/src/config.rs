//! Per-type tracking configuration.
//!
//! Built once when a tracked type is registered and immutable afterwards.
//! Holds the class-level field defaults, the approval hooks, and the
//! subset of lifecycle events wired into the persistence layer.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::sync::Arc;

use herald_core::context::RequestContext;
use herald_core::setting::Setting;
use herald_core::trackable::Trackable;

/// A persistence lifecycle event that can trigger notification creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// After a successful persistence create.
    Create,
    /// After a successful persistence update.
    Update,
    /// Before a persistence destroy completes.
    Destroy,
}

impl EventKind {
    /// Lowercase action name, used as the key suffix and hook lookup.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Destroy => "destroy",
        }
    }

    /// All lifecycle events.
    pub fn all() -> &'static [EventKind] {
        &[Self::Create, Self::Update, Self::Destroy]
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Approval predicate deciding whether a notification gets created.
///
/// Invoked with the model and the ambient context; returning false
/// declines the creation without error.
pub type Hook = Arc<dyn Fn(&dyn Trackable, Option<&RequestContext>) -> bool + Send + Sync>;

/// Class-level configuration shared by every instance of a tracked type.
#[derive(Clone, Default)]
pub struct TrackedConfig {
    /// Global owner default.
    pub owner: Option<Setting>,
    /// Global recipient default.
    pub recipient: Option<Setting>,
    /// Global parameter defaults.
    pub params: BTreeMap<String, Setting>,
    /// Global custom-field defaults.
    pub custom_fields: BTreeMap<String, Setting>,
    hooks: HashMap<String, Hook>,
    events: Vec<EventKind>,
}

impl TrackedConfig {
    /// Start building a configuration.
    pub fn builder() -> TrackedConfigBuilder {
        TrackedConfigBuilder::default()
    }

    /// Look up the approval hook for an action, if one is registered.
    pub fn hook(&self, action: &str) -> Option<&Hook> {
        self.hooks.get(action)
    }

    /// Whether a lifecycle event is wired for this type.
    pub fn wired(&self, event: EventKind) -> bool {
        self.events.contains(&event)
    }

    /// The wired lifecycle events.
    pub fn events(&self) -> &[EventKind] {
        &self.events
    }
}

impl std::fmt::Debug for TrackedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackedConfig")
            .field("owner", &self.owner)
            .field("recipient", &self.recipient)
            .field("params", &self.params)
            .field("custom_fields", &self.custom_fields)
            .field("hooks", &self.hooks.keys().collect::<Vec<_>>())
            .field("events", &self.events)
            .finish()
    }
}

/// Builder mirroring the declarative `tracked` registration call.
///
/// With no event selection, all three lifecycle events are wired.
/// `only` selects an explicit subset, `except` subtracts from the full
/// set, and `skip_defaults` wires nothing — leaving creation entirely to
/// direct calls.
#[derive(Default)]
pub struct TrackedConfigBuilder {
    owner: Option<Setting>,
    recipient: Option<Setting>,
    params: BTreeMap<String, Setting>,
    custom_fields: BTreeMap<String, Setting>,
    hooks: HashMap<String, Hook>,
    only: Option<Vec<EventKind>>,
    except: Option<Vec<EventKind>>,
    skip_defaults: bool,
}

impl TrackedConfigBuilder {
    /// Set the global owner default.
    pub fn owner(mut self, setting: Setting) -> Self {
        self.owner = Some(setting);
        self
    }

    /// Set the global recipient default.
    pub fn recipient(mut self, setting: Setting) -> Self {
        self.recipient = Some(setting);
        self
    }

    /// Add one global parameter default.
    pub fn param(mut self, name: impl Into<String>, setting: Setting) -> Self {
        let _ = self.params.insert(name.into(), setting);
        self
    }

    /// Add one global custom-field default.
    pub fn custom_field(mut self, name: impl Into<String>, setting: Setting) -> Self {
        let _ = self.custom_fields.insert(name.into(), setting);
        self
    }

    /// Register an approval hook for an action.
    pub fn on<F>(mut self, action: impl Into<String>, hook: F) -> Self
    where
        F: Fn(&dyn Trackable, Option<&RequestContext>) -> bool + Send + Sync + 'static,
    {
        let _ = self.hooks.insert(action.into(), Arc::new(hook));
        self
    }

    /// Wire only the given lifecycle events.
    pub fn only(mut self, events: &[EventKind]) -> Self {
        self.only = Some(events.to_vec());
        self
    }

    /// Wire all lifecycle events except the given ones.
    pub fn except(mut self, events: &[EventKind]) -> Self {
        self.except = Some(events.to_vec());
        self
    }

    /// Wire no lifecycle events at all.
    pub fn skip_defaults(mut self) -> Self {
        self.skip_defaults = true;
        self
    }

    /// Finish the configuration.
    pub fn build(self) -> TrackedConfig {
        let events = if let Some(except) = self.except {
            EventKind::all()
                .iter()
                .copied()
                .filter(|e| !except.contains(e))
                .collect()
        } else if let Some(only) = self.only {
            let mut seen = Vec::new();
            for event in only {
                if !seen.contains(&event) {
                    seen.push(event);
                }
            }
            seen
        } else if self.skip_defaults {
            Vec::new()
        } else {
            EventKind::all().to_vec()
        };

        TrackedConfig {
            owner: self.owner,
            recipient: self.recipient,
            params: self.params,
            custom_fields: self.custom_fields,
            hooks: self.hooks,
            events,
        }
    }
}
