//! Panic capture for the recovery bridge
//!
//! Panics raised by `Logger::panic` (and `dpanic` in development mode) carry
//! a [`LoggedPanic`] payload. The bridge checks for it by value to tell a
//! panic the logger already reported from one raised anywhere else.

use std::any::Any;
use std::backtrace::Backtrace;
use std::cell::RefCell;
use std::fmt;
use std::sync::Once;

/// Panic payload raised by the logger's own panic-level calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggedPanic {
    pub message: String,
}

impl fmt::Display for LoggedPanic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

thread_local! {
    static LAST_PANIC_TRACE: RefCell<Option<String>> = const { RefCell::new(None) };
}

static HOOK: Once = Once::new();

/// Chain a hook that records the backtrace of each panic on its own thread.
///
/// The trace has to be taken while the panicking frames still exist; by the
/// time `catch_unwind` returns they are gone.
pub(crate) fn install_panic_hook() {
    HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let mut trace = String::new();
            if let Some(location) = info.location() {
                trace.push_str(&format!(
                    "panicked at {}:{}:{}\n",
                    location.file(),
                    location.line(),
                    location.column()
                ));
            }
            trace.push_str(&Backtrace::force_capture().to_string());
            LAST_PANIC_TRACE.with(|slot| *slot.borrow_mut() = Some(trace));
            previous(info);
        }));
    });
}

/// Backtrace recorded for the most recent panic on this thread, if any
pub(crate) fn take_panic_trace() -> Option<String> {
    LAST_PANIC_TRACE.with(|slot| slot.borrow_mut().take())
}

/// Human-readable text for a panic payload
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(p) = payload.downcast_ref::<LoggedPanic>() {
        p.message.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
