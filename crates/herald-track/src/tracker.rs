//! Lifecycle orchestrator.
//!
//! One [`Tracker`] exists per tracked type, built from its immutable
//! [`TrackedConfig`] and a creation sink. The host persistence layer
//! invokes the three lifecycle entry points; application code invokes
//! [`create_notification`](Tracker::create_notification) directly for
//! custom actions. Every path runs the same sequence: enable check, hook
//! gate, settings merge, sink, pending reset.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use herald_core::context::RequestContext;
use herald_core::errors::Result;
use herald_core::record::Notification;
use herald_core::sink::CreationSink;
use herald_core::switch;
use herald_core::trackable::Trackable;
use tracing::debug;

use crate::config::{EventKind, TrackedConfig};
use crate::gate;
use crate::pending::PendingOptions;
use crate::settings::{CreateOptions, last_segment, prepare_settings};

/// Orchestrates notification creation for one tracked type.
pub struct Tracker {
    config: Arc<TrackedConfig>,
    sink: Arc<dyn CreationSink>,
    enabled: AtomicBool,
}

impl Tracker {
    /// Build a tracker from a type's configuration and a sink.
    pub fn new(config: TrackedConfig, sink: Arc<dyn CreationSink>) -> Self {
        Self {
            config: Arc::new(config),
            sink,
            enabled: AtomicBool::new(true),
        }
    }

    /// The type's configuration.
    pub fn config(&self) -> &TrackedConfig {
        &self.config
    }

    /// Whether this type's creation is enabled (the per-type switch only).
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Turn creation on for this type.
    pub fn enable(&self) {
        self.enabled.store(true, Ordering::Relaxed);
    }

    /// Turn creation off for this type.
    pub fn disable(&self) {
        self.enabled.store(false, Ordering::Relaxed);
    }

    /// Lifecycle entry point: after a successful persistence create.
    pub fn after_create(
        &self,
        model: &dyn Trackable,
        pending: &mut PendingOptions,
        ctx: Option<&RequestContext>,
    ) -> Result<Option<Notification>> {
        self.lifecycle(EventKind::Create, model, pending, ctx)
    }

    /// Lifecycle entry point: after a successful persistence update.
    pub fn after_update(
        &self,
        model: &dyn Trackable,
        pending: &mut PendingOptions,
        ctx: Option<&RequestContext>,
    ) -> Result<Option<Notification>> {
        self.lifecycle(EventKind::Update, model, pending, ctx)
    }

    /// Lifecycle entry point: before a persistence destroy completes.
    ///
    /// Fires while the entity's identity and attributes are still
    /// available to value resolution.
    pub fn before_destroy(
        &self,
        model: &dyn Trackable,
        pending: &mut PendingOptions,
        ctx: Option<&RequestContext>,
    ) -> Result<Option<Notification>> {
        self.lifecycle(EventKind::Destroy, model, pending, ctx)
    }

    /// Direct creation for a custom action, preserving all configuration.
    ///
    /// Returns `Ok(None)` when creation is disabled or a hook declined;
    /// in both cases the pending state is left untouched. On success the
    /// pending state resets to empty and the persisted record is returned.
    pub fn create_notification(
        &self,
        model: &dyn Trackable,
        pending: &mut PendingOptions,
        action: Option<&str>,
        options: CreateOptions,
        ctx: Option<&RequestContext>,
    ) -> Result<Option<Notification>> {
        if !self.creation_allowed() {
            debug!(type_name = model.type_name(), "notification creation disabled, skipping");
            return Ok(None);
        }

        if let Some(gate_action) = Self::gate_action(action, &options, pending) {
            if !gate::approve(&self.config, &gate_action, model, ctx) {
                return Ok(None);
            }
        }

        let resolved = prepare_settings(model, pending, &self.config, action, &options, ctx)?;
        let record = self.sink.create(&model.entity_ref(), &resolved)?;

        debug!(key = %record.key, id = %record.id, "notification created");
        pending.reset();
        Ok(Some(record))
    }

    fn lifecycle(
        &self,
        event: EventKind,
        model: &dyn Trackable,
        pending: &mut PendingOptions,
        ctx: Option<&RequestContext>,
    ) -> Result<Option<Notification>> {
        if !self.config.wired(event) {
            return Ok(None);
        }
        self.create_notification(model, pending, Some(event.as_str()), CreateOptions::new(), ctx)
    }

    fn creation_allowed(&self) -> bool {
        switch::enabled() && self.is_enabled()
    }

    /// Action used for hook lookup: the explicit action when given, else
    /// the last dot-segment of the call-site or pending key.
    fn gate_action(
        action: Option<&str>,
        options: &CreateOptions,
        pending: &PendingOptions,
    ) -> Option<String> {
        action
            .map(String::from)
            .or_else(|| options.action.clone())
            .or_else(|| options.key.as_deref().and_then(last_segment))
            .or_else(|| pending.key.as_deref().and_then(last_segment))
    }
}

impl std::fmt::Debug for Tracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tracker")
            .field("config", &self.config)
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use herald_core::entity::EntityRef;
    use herald_core::errors::TrackError;
    use herald_core::record::ResolvedNotification;
    use herald_core::setting::Setting;
    use herald_core::sink::SinkError;
    use serde_json::{Map, Value};
    use serial_test::serial;
    use std::sync::Mutex;

    struct Article {
        id: i64,
        author: EntityRef,
    }

    impl Trackable for Article {
        fn type_name(&self) -> &str {
            "Article"
        }
        fn entity_ref(&self) -> EntityRef {
            EntityRef::new("Article", self.id)
        }
        fn attribute(&self, name: &str) -> Option<Value> {
            match name {
                "author" => Some(self.author.to_value()),
                "title" => Some(Value::String("A title".to_string())),
                _ => None,
            }
        }
    }

    fn article() -> Article {
        Article {
            id: 1,
            author: EntityRef::new("User", 9),
        }
    }

    /// In-memory sink recording every resolved field set it receives.
    #[derive(Default)]
    struct RecordingSink {
        created: Mutex<Vec<ResolvedNotification>>,
        fail: bool,
    }

    impl RecordingSink {
        fn failing() -> Self {
            Self {
                created: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        fn count(&self) -> usize {
            self.created.lock().unwrap().len()
        }

        fn last(&self) -> ResolvedNotification {
            self.created.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("sink unavailable")]
    struct SinkUnavailable;

    impl CreationSink for RecordingSink {
        fn create(
            &self,
            notifiable: &EntityRef,
            resolved: &ResolvedNotification,
        ) -> std::result::Result<Notification, SinkError> {
            if self.fail {
                return Err(SinkError::new(SinkUnavailable));
            }
            self.created.lock().unwrap().push(resolved.clone());
            Ok(Notification {
                id: format!("ntf_{}", self.count()),
                notifiable: notifiable.clone(),
                owner: resolved.owner.clone(),
                key: resolved.key.clone(),
                parameters: resolved.parameters.clone(),
                custom_fields: resolved.custom_fields.clone(),
                created_at: chrono::Utc::now(),
            })
        }
    }

    fn tracker_with(config: TrackedConfig) -> (Tracker, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::default());
        (Tracker::new(config, sink.clone()), sink)
    }

    #[test]
    #[serial]
    fn test_after_create_defaults() {
        let (tracker, sink) = tracker_with(TrackedConfig::builder().build());
        let mut pending = PendingOptions::new();

        let record = tracker
            .after_create(&article(), &mut pending, None)
            .unwrap()
            .unwrap();

        assert_eq!(record.key, "article.create");
        assert_eq!(record.owner, None);
        let resolved = sink.last();
        assert_eq!(resolved.recipient, None);
        assert!(resolved.parameters.is_empty());
    }

    #[test]
    #[serial]
    fn test_owner_resolved_from_class_attribute() {
        let config = TrackedConfig::builder()
            .owner(Setting::attribute("author"))
            .build();
        let (tracker, _) = tracker_with(config);
        let mut pending = PendingOptions::new();

        let record = tracker
            .after_create(&article(), &mut pending, None)
            .unwrap()
            .unwrap();
        assert_eq!(record.owner, Some(EntityRef::new("User", 9)));
    }

    #[test]
    #[serial]
    fn test_successful_creation_resets_pending() {
        let (tracker, _) = tracker_with(TrackedConfig::builder().build());
        let mut pending = PendingOptions::new();
        let _ = pending
            .set_key("my.staged.key")
            .set_param("title", Setting::attribute("title"));

        let record = tracker
            .after_update(&article(), &mut pending, None)
            .unwrap()
            .unwrap();

        assert_eq!(record.key, "my.staged.key");
        assert_eq!(record.parameters["title"], "A title");
        assert!(pending.is_empty());
    }

    #[test]
    #[serial]
    fn test_declined_hook_leaves_pending_untouched() {
        let config = TrackedConfig::builder().on("update", |_, _| false).build();
        let (tracker, sink) = tracker_with(config);
        let mut pending = PendingOptions::new();
        let _ = pending.set_param("title", Setting::from("staged"));

        let outcome = tracker.after_update(&article(), &mut pending, None).unwrap();

        assert!(outcome.is_none());
        assert_eq!(sink.count(), 0);
        assert!(!pending.is_empty());
    }

    #[test]
    #[serial]
    fn test_approved_hook_creates() {
        let config = TrackedConfig::builder().on("update", |_, _| true).build();
        let (tracker, sink) = tracker_with(config);
        let mut pending = PendingOptions::new();

        let outcome = tracker.after_update(&article(), &mut pending, None).unwrap();
        assert!(outcome.is_some());
        assert_eq!(sink.count(), 1);
    }

    #[test]
    #[serial]
    fn test_unwired_event_does_nothing() {
        let config = TrackedConfig::builder()
            .only(&[EventKind::Create])
            .on("update", |_, _| panic!("gate must not run for unwired events"))
            .build();
        let (tracker, sink) = tracker_with(config);
        let mut pending = PendingOptions::new();
        let _ = pending.set_key("staged.key");

        let outcome = tracker.after_update(&article(), &mut pending, None).unwrap();

        assert!(outcome.is_none());
        assert_eq!(sink.count(), 0);
        assert!(!pending.is_empty());
    }

    #[test]
    #[serial]
    fn test_per_type_disable_suppresses() {
        let (tracker, sink) = tracker_with(TrackedConfig::builder().build());
        let mut pending = PendingOptions::new();
        let _ = pending.set_key("staged.key");

        tracker.disable();
        let outcome = tracker.after_create(&article(), &mut pending, None).unwrap();
        assert!(outcome.is_none());
        assert_eq!(sink.count(), 0);
        assert!(!pending.is_empty());

        tracker.enable();
        let outcome = tracker.after_create(&article(), &mut pending, None).unwrap();
        assert!(outcome.is_some());
    }

    #[test]
    #[serial]
    fn test_global_disable_suppresses_even_direct_calls() {
        let (tracker, sink) = tracker_with(TrackedConfig::builder().build());
        let mut pending = PendingOptions::new();

        switch::set_enabled(false);
        let outcome = tracker
            .create_notification(&article(), &mut pending, Some("pinned"), CreateOptions::new(), None)
            .unwrap();
        switch::set_enabled(true);

        assert!(outcome.is_none());
        assert_eq!(sink.count(), 0);
    }

    #[test]
    #[serial]
    fn test_per_type_disable_is_independent_of_global() {
        let (tracker, _) = tracker_with(TrackedConfig::builder().build());
        tracker.disable();
        assert!(switch::enabled());
        assert!(!tracker.is_enabled());
        tracker.enable();
    }

    #[test]
    #[serial]
    fn test_direct_creation_with_action() {
        let (tracker, _) = tracker_with(TrackedConfig::builder().build());
        let mut pending = PendingOptions::new();

        let record = tracker
            .create_notification(
                &article(),
                &mut pending,
                Some("commented_on"),
                CreateOptions::new().owner(Setting::entity(&EntityRef::new("User", 2))),
                None,
            )
            .unwrap()
            .unwrap();

        assert_eq!(record.key, "article.commented_on");
        assert_eq!(record.owner, Some(EntityRef::new("User", 2)));
    }

    #[test]
    #[serial]
    fn test_direct_creation_gates_on_key_last_segment() {
        let config = TrackedConfig::builder().on("celebrate", |_, _| false).build();
        let (tracker, sink) = tracker_with(config);
        let mut pending = PendingOptions::new();

        let outcome = tracker
            .create_notification(
                &article(),
                &mut pending,
                None,
                CreateOptions::new().key("party.celebrate"),
                None,
            )
            .unwrap();

        assert!(outcome.is_none());
        assert_eq!(sink.count(), 0);
    }

    #[test]
    #[serial]
    fn test_missing_key_propagates() {
        let (tracker, _) = tracker_with(TrackedConfig::builder().build());
        let mut pending = PendingOptions::new();

        let err = tracker
            .create_notification(&article(), &mut pending, None, CreateOptions::new(), None)
            .unwrap_err();
        assert_matches!(err, TrackError::MissingKey { .. });
    }

    #[test]
    #[serial]
    fn test_sink_failure_propagates_and_keeps_pending() {
        let sink = Arc::new(RecordingSink::failing());
        let tracker = Tracker::new(TrackedConfig::builder().build(), sink);
        let mut pending = PendingOptions::new();
        let _ = pending.set_key("staged.key");

        let err = tracker.after_create(&article(), &mut pending, None).unwrap_err();
        assert_matches!(err, TrackError::Sink(_));
        assert!(!pending.is_empty());
    }

    #[test]
    #[serial]
    fn test_compute_settings_see_ambient_context() {
        let config = TrackedConfig::builder()
            .owner(Setting::compute(|ctx, _| {
                ctx.and_then(|c| c.get("current_user").cloned())
                    .unwrap_or(Value::Null)
            }))
            .build();
        let (tracker, _) = tracker_with(config);
        let mut pending = PendingOptions::new();

        let mut ctx = RequestContext::new();
        ctx.insert("current_user", serde_json::json!({"kind": "User", "id": 42}));

        let record = tracker
            .after_create(&article(), &mut pending, Some(&ctx))
            .unwrap()
            .unwrap();
        assert_eq!(record.owner, Some(EntityRef::new("User", 42)));
    }

    #[test]
    #[serial]
    fn test_custom_fields_reach_sink() {
        let (tracker, sink) = tracker_with(TrackedConfig::builder().build());
        let mut pending = PendingOptions::new();

        let _ = tracker
            .create_notification(
                &article(),
                &mut pending,
                Some("flagged"),
                CreateOptions::new().custom_field("severity", Setting::from("high")),
                None,
            )
            .unwrap();

        let mut expected = Map::new();
        let _ = expected.insert("severity".to_string(), Value::String("high".to_string()));
        assert_eq!(sink.last().custom_fields, expected);
    }
}
