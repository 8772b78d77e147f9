//! Hook gate — per-action approval of notification creation.

use herald_core::context::RequestContext;
use herald_core::trackable::Trackable;
use tracing::debug;

use crate::config::TrackedConfig;

/// Decide whether a creation for the given action should proceed.
///
/// With no hook registered for the action the answer is always true.
/// A registered hook is invoked with `(model, ambient_context)` and its
/// boolean verdict is returned as-is.
pub fn approve(
    config: &TrackedConfig,
    action: &str,
    model: &dyn Trackable,
    ctx: Option<&RequestContext>,
) -> bool {
    let Some(hook) = config.hook(action) else {
        return true;
    };
    let verdict = hook(model, ctx);
    if !verdict {
        debug!(action, type_name = model.type_name(), "hook declined notification");
    }
    verdict
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald_core::entity::EntityRef;
    use serde_json::Value;

    struct Article {
        published: bool,
    }

    impl Trackable for Article {
        fn type_name(&self) -> &str {
            "Article"
        }
        fn entity_ref(&self) -> EntityRef {
            EntityRef::new("Article", 1)
        }
        fn attribute(&self, name: &str) -> Option<Value> {
            (name == "published").then(|| Value::Bool(self.published))
        }
    }

    #[test]
    fn test_no_hook_approves() {
        let config = TrackedConfig::builder().build();
        assert!(approve(&config, "create", &Article { published: false }, None));
    }

    #[test]
    fn test_hook_verdict_from_model() {
        let config = TrackedConfig::builder()
            .on("update", |model, _| {
                model.attribute("published") == Some(Value::Bool(true))
            })
            .build();

        assert!(approve(&config, "update", &Article { published: true }, None));
        assert!(!approve(&config, "update", &Article { published: false }, None));
    }

    #[test]
    fn test_hook_only_gates_its_action() {
        let config = TrackedConfig::builder().on("update", |_, _| false).build();
        assert!(approve(&config, "create", &Article { published: true }, None));
    }

    #[test]
    fn test_hook_sees_ambient_context() {
        let config = TrackedConfig::builder()
            .on("create", |_, ctx| {
                ctx.is_some_and(|c| c.get("current_user").is_some())
            })
            .build();

        let article = Article { published: true };
        assert!(!approve(&config, "create", &article, None));

        let mut ctx = RequestContext::new();
        ctx.insert("current_user", serde_json::json!({"kind": "User", "id": 1}));
        assert!(approve(&config, "create", &article, Some(&ctx)));
    }
}
