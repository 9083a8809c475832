//! Fatal-failure hook.
//!
//! Allocation failure is not recoverable in this design, but *how* the
//! process dies is pluggable so tests can observe fatal paths without
//! exhausting memory. Resolution order when [`raise`] is called:
//!
//! 1. a hook installed for the current thread with [`with_hook`];
//! 2. the process-wide hook installed with [`set_hook`];
//! 3. [`default_hook`], which prints the diagnostic and exits with status 1.

use std::cell::Cell;
use std::sync::{PoisonError, RwLock};

use crate::error::AllocError;

/// A fatal hook must not return.
pub type FatalHook = fn(&AllocError) -> !;

static HOOK: RwLock<Option<FatalHook>> = RwLock::new(None);

thread_local! {
    static SCOPED: Cell<Option<FatalHook>> = const { Cell::new(None) };
}

/// Install the process-wide hook, returning the previous one.
pub fn set_hook(hook: FatalHook) -> Option<FatalHook> {
    HOOK.write()
        .unwrap_or_else(PoisonError::into_inner)
        .replace(hook)
}

/// Remove the process-wide hook so [`default_hook`] applies again.
pub fn take_hook() -> Option<FatalHook> {
    HOOK.write().unwrap_or_else(PoisonError::into_inner).take()
}

/// Run `f` with `hook` installed for the current thread only.
///
/// The previous thread hook is restored when `f` returns or unwinds, so this
/// composes with `catch_unwind` and [`panic_hook`].
pub fn with_hook<R>(hook: FatalHook, f: impl FnOnce() -> R) -> R {
    struct Restore(Option<FatalHook>);

    impl Drop for Restore {
        fn drop(&mut self) {
            SCOPED.with(|slot| slot.set(self.0));
        }
    }

    let _restore = Restore(SCOPED.with(|slot| slot.replace(Some(hook))));
    f()
}

/// Hand `err` to the effective hook. Never returns.
#[cold]
#[inline(never)]
pub fn raise(err: AllocError) -> ! {
    let hook = SCOPED
        .with(Cell::get)
        .or_else(|| *HOOK.read().unwrap_or_else(PoisonError::into_inner))
        .unwrap_or(default_hook);
    hook(&err)
}

/// Print the diagnostic to stderr and exit the process with status 1.
pub fn default_hook(err: &AllocError) -> ! {
    #[cfg(feature = "tracing")]
    tracing::error!(error = %err, "fatal allocation failure");
    eprintln!("{err}");
    std::process::exit(1)
}

/// Panic with the diagnostic instead of exiting.
pub fn panic_hook(err: &AllocError) -> ! {
    panic!("{err}")
}
