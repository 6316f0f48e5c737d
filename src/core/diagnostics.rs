//! Internal diagnostic channel
//!
//! The logger cannot report its own failures through itself, so problems
//! such as a failing provider or an unreachable endpoint are written to
//! stderr. Output is on by default in debug builds only.

use std::sync::atomic::{AtomicBool, Ordering};

static ENABLED: AtomicBool = AtomicBool::new(cfg!(debug_assertions));

/// Turn diagnostic output on or off for the whole process
pub fn set_diagnostics_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
}

#[inline]
pub fn diagnostics_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

pub(crate) fn warn(message: impl AsRef<str>) {
    if diagnostics_enabled() {
        eprintln!("[LOGGER WARNING] {}", message.as_ref());
    }
}

pub(crate) fn error(message: impl AsRef<str>) {
    if diagnostics_enabled() {
        eprintln!("[LOGGER ERROR] {}", message.as_ref());
    }
}

/// Extract a readable message from a caught panic payload
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_message_extraction() {
        let payload = std::panic::catch_unwind(|| panic!("static message")).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "static message");

        let payload = std::panic::catch_unwind(|| panic!("formatted {}", 42)).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "formatted 42");
    }
}
