//! Token-gated content state
//!
//! The gate starts `Loading` and moves to `Unlocked` exactly once, on a
//! successful token check. There is no reverse transition and no timeout
//! transition: if the check never resolves, the gate stays `Loading`
//! indefinitely (fail-closed).

use std::sync::atomic::{AtomicBool, Ordering};

/// Gate state for the access overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// Initial state; content hidden behind the loading overlay
    Loading,
    /// Token check succeeded; content visible
    Unlocked,
}

/// One-way latch from `Loading` to `Unlocked`
#[derive(Debug, Default)]
pub struct Gate {
    unlocked: AtomicBool,
}

impl Gate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    pub fn state(&self) -> GateState {
        if self.unlocked.load(Ordering::Acquire) {
            GateState::Unlocked
        } else {
            GateState::Loading
        }
    }

    /// Transition to `Unlocked`. Idempotent.
    pub fn unlock(&self) {
        self.unlocked.store(true, Ordering::Release);
    }
}
