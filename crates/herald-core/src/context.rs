//! Ambient request context.
//!
//! The context stands in for "the current request's controller": a
//! string-keyed bag of values (typically the current user) that dynamic
//! value closures and hooks may consult. Prefer passing it explicitly
//! down the call chain; the [`ambient`] registry is a per-thread fallback
//! for host boundaries that cannot thread it through.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// String-keyed value bag scoped to one request or task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestContext {
    values: Map<String, Value>,
}

impl RequestContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value under a key, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        let _ = self.values.insert(key.into(), value);
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Whether the context holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Per-thread fallback registry for the ambient context.
///
/// Each thread sees only its own entry — a write from one thread is never
/// observable from another. Entry cleanup is best-effort: hosts should
/// call [`clear`](ambient::clear) when the request ends, but a stale
/// entry only affects later work on the same thread.
pub mod ambient {
    use std::cell::RefCell;

    use super::RequestContext;

    thread_local! {
        static CURRENT: RefCell<Option<RequestContext>> = const { RefCell::new(None) };
    }

    /// Store the context for the calling thread.
    pub fn store(ctx: RequestContext) {
        CURRENT.with(|cell| {
            *cell.borrow_mut() = Some(ctx);
        });
    }

    /// Clone out the calling thread's context, if any.
    pub fn current() -> Option<RequestContext> {
        CURRENT.with(|cell| cell.borrow().clone())
    }

    /// Remove the calling thread's context.
    pub fn clear() {
        CURRENT.with(|cell| {
            *cell.borrow_mut() = None;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx_with_user(id: i64) -> RequestContext {
        let mut ctx = RequestContext::new();
        ctx.insert("current_user", serde_json::json!({"kind": "User", "id": id}));
        ctx
    }

    #[test]
    fn test_insert_and_get() {
        let ctx = ctx_with_user(5);
        assert_eq!(ctx.get("current_user").unwrap()["id"], 5);
        assert!(ctx.get("missing").is_none());
    }

    #[test]
    fn test_empty() {
        assert!(RequestContext::new().is_empty());
        assert!(!ctx_with_user(1).is_empty());
    }

    #[test]
    fn test_ambient_store_and_clear() {
        ambient::store(ctx_with_user(3));
        assert_eq!(ambient::current().unwrap().get("current_user").unwrap()["id"], 3);

        ambient::clear();
        assert!(ambient::current().is_none());
    }

    #[test]
    fn test_ambient_is_thread_scoped() {
        ambient::store(ctx_with_user(1));

        let seen_elsewhere = std::thread::spawn(ambient::current).join().unwrap();
        assert!(seen_elsewhere.is_none());

        ambient::clear();
    }

    #[test]
    fn test_ambient_store_replaces() {
        ambient::store(ctx_with_user(1));
        ambient::store(ctx_with_user(2));
        assert_eq!(ambient::current().unwrap().get("current_user").unwrap()["id"], 2);
        ambient::clear();
    }
}
