//! Process-wide enable switch.
//!
//! Disabling suppresses every notification creation — lifecycle-triggered
//! and direct alike — as a silent no-op, never an error. Per-type
//! switches live on the tracker and gate independently of this one.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

static ENABLED: AtomicBool = AtomicBool::new(true);

/// Whether notification creation is enabled process-wide. Defaults to true.
pub fn enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

/// Turn notification creation on or off process-wide.
pub fn set_enabled(value: bool) {
    debug!(enabled = value, "process-wide notification switch changed");
    ENABLED.store(value, Ordering::Relaxed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_enabled_by_default() {
        assert!(enabled());
    }

    #[test]
    #[serial]
    fn test_toggle() {
        set_enabled(false);
        assert!(!enabled());
        set_enabled(true);
        assert!(enabled());
    }
}
