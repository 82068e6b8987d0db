//! Scoped switch controlling whether function invocations record graph edges.
//!
//! The flag is thread-local: graph handles are `Rc`-based and never leave the
//! thread that built them, so every thread gets its own independent switch.
//! Scopes are expressed as RAII guards that snapshot the previous value on
//! creation and put it back on drop, which keeps nesting correct and also
//! restores the flag while unwinding from a panic.

use std::cell::Cell;
use std::marker::PhantomData;

thread_local! {
    static ENABLE_BACKPROP: Cell<bool> = const { Cell::new(true) };
}

/// Returns `true` when function invocations currently record graph edges.
pub fn is_recording_enabled() -> bool {
    ENABLE_BACKPROP.with(|flag| flag.get())
}

/// Restores the recording flag it replaced when dropped.
#[must_use = "recording is restored as soon as the guard is dropped"]
#[derive(Debug)]
pub struct ConfigGuard {
    previous: bool,
    // Tied to the thread whose flag it saved.
    _not_send: PhantomData<*const ()>,
}

impl ConfigGuard {
    /// Value that will be restored when this guard goes away.
    pub fn previous(&self) -> bool {
        self.previous
    }
}

impl Drop for ConfigGuard {
    fn drop(&mut self) {
        let previous = self.previous;
        ENABLE_BACKPROP.with(|flag| flag.set(previous));
        log::trace!("Graph recording restored to {}", previous);
    }
}

/// Sets graph recording to `enable_backprop` until the returned guard is dropped.
///
/// ```
/// use gradflow_core::autograd::config::{is_recording_enabled, using_config};
///
/// {
///     let _guard = using_config(false);
///     assert!(!is_recording_enabled());
/// }
/// assert!(is_recording_enabled());
/// ```
pub fn using_config(enable_backprop: bool) -> ConfigGuard {
    let previous = ENABLE_BACKPROP.with(|flag| flag.replace(enable_backprop));
    log::trace!(
        "Graph recording set to {} (was {})",
        enable_backprop,
        previous
    );
    ConfigGuard {
        previous,
        _not_send: PhantomData,
    }
}

/// Disables graph recording until the returned guard is dropped.
pub fn with_recording_disabled() -> ConfigGuard {
    using_config(false)
}

/// Inference mode: same as [`with_recording_disabled`].
pub fn no_grad() -> ConfigGuard {
    with_recording_disabled()
}

/// Runs `f` with recording disabled and returns whatever it returns.
pub fn no_grad_scope<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = no_grad();
    f()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
