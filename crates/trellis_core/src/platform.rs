//! Capabilities injected by the platform layer
//!
//! The runtime never calls into the OS directly. Anything with a platform
//! side effect (software keyboard, wall clock, tray icons) comes in through
//! one of these small traits so the dispatcher and tree can be driven from
//! tests without a window.

use std::time::Instant;

/// Software keyboard control (mobile platforms)
pub trait SoftKeyboard: Send + Sync {
    /// Show the on-screen keyboard
    fn show(&self);
    /// Hide the on-screen keyboard
    fn hide(&self);
}

/// Keyboard that does nothing (desktop builds)
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopKeyboard;

impl SoftKeyboard for NoopKeyboard {
    fn show(&self) {}
    fn hide(&self) {}
}

/// Monotonic time source for gesture timing
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Clock backed by [`Instant::now`]
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// An OS-owned resource held by a widget (for example a tray icon)
///
/// `release` is called exactly once, when the owning widget is detached or
/// its tree is closed.
pub trait NativeResource: Send + Sync {
    fn release(&self);
}
