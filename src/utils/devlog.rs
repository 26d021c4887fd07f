//! Bench lines for provider operations.
//!
//! `dev6!` formats one line and sends it to the `log` facade under
//! [`DEV_TARGET`] at trace level. A test can also collect the lines emitted on
//! its own thread with [`enable_thread_sink`] and [`drain`], so assertions do
//! not depend on which logger is installed.

use std::cell::RefCell;

/// Log target of bench lines; the log4rs setup keeps it off disk.
pub const DEV_TARGET: &str = "entity_memstore::dev6";

thread_local! {
    static CAPTURED: RefCell<Option<Vec<String>>> = const { RefCell::new(None) };
}

/// Stops capture on the current thread when dropped.
pub struct CaptureGuard;

impl Drop for CaptureGuard {
    fn drop(&mut self) {
        CAPTURED.with(|c| *c.borrow_mut() = None);
    }
}

/// Start capturing bench lines emitted on the current thread.
pub fn enable_thread_sink() -> CaptureGuard {
    CAPTURED.with(|c| *c.borrow_mut() = Some(Vec::new()));
    CaptureGuard
}

/// Record `line` if capture is on for this thread.
pub fn write_str(line: &str) {
    CAPTURED.with(|c| {
        if let Some(lines) = c.borrow_mut().as_mut() {
            lines.push(line.to_owned());
        }
    });
}

/// Take the lines captured so far; empty when capture is off.
pub fn drain() -> Vec<String> {
    CAPTURED.with(|c| c.borrow_mut().as_mut().map(std::mem::take).unwrap_or_default())
}

/// Emit one bench line.
#[macro_export]
macro_rules! dev6 {
    ($($arg:tt)*) => {{
        let line = format!($($arg)*);
        $crate::utils::devlog::write_str(&line);
        log::trace!(target: $crate::utils::devlog::DEV_TARGET, "{}", line);
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_lines_in_order_until_drained() {
        let _guard = enable_thread_sink();
        crate::dev6!("{{\"op\":\"browse\",\"n\":{}}}", 1);
        crate::dev6!("{{\"op\":\"batch_remove\"}}");
        assert_eq!(drain(), vec![r#"{"op":"browse","n":1}"#.to_string(), r#"{"op":"batch_remove"}"#.to_string()]);
        assert!(drain().is_empty());
    }

    #[test]
    fn capture_is_per_thread_and_scoped() {
        {
            let _guard = enable_thread_sink();
            let other = std::thread::spawn(|| {
                crate::dev6!("elsewhere");
                drain()
            });
            assert!(other.join().unwrap().is_empty());
        }
        crate::dev6!("after guard");
        assert!(drain().is_empty());
    }
}
