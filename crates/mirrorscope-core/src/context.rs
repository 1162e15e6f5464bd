//! Shared render context holding the re-entrancy guard.
//!
//! A reflective surface can be visible from inside another surface's mirror
//! render. Every reflection render on a context holds its guard, so a nested
//! invocation on the same context is skipped instead of recursing. Hosts that
//! want one process-wide guard use [`RenderContext::global`]; tests build
//! independent contexts with [`RenderContext::new`].

use std::sync::atomic::{AtomicBool, Ordering};

/// Process-wide context.
static GLOBAL: RenderContext = RenderContext::new();

/// Re-entrancy state shared by every reflective surface rendering through it.
#[derive(Debug, Default)]
pub struct RenderContext {
    rendering: AtomicBool,
}

impl RenderContext {
    /// Creates an idle context.
    pub const fn new() -> Self {
        Self {
            rendering: AtomicBool::new(false),
        }
    }

    /// Returns the process-wide context.
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Returns whether a reflection render currently holds the guard.
    pub fn is_rendering(&self) -> bool {
        self.rendering.load(Ordering::Acquire)
    }

    /// Takes the guard, or returns `None` if a render already holds it.
    ///
    /// The guard is released when the returned scope drops, on every exit path.
    pub fn try_enter(&self) -> Option<ReflectionScope<'_>> {
        self.rendering
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ReflectionScope { context: self })
    }
}

/// Holds the render guard of a [`RenderContext`] while alive.
#[derive(Debug)]
#[must_use = "the guard is released as soon as the scope is dropped"]
pub struct ReflectionScope<'a> {
    context: &'a RenderContext,
}

impl Drop for ReflectionScope<'_> {
    fn drop(&mut self) {
        self.context.rendering.store(false, Ordering::Release);
    }
}
