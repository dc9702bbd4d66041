use std::sync::atomic::{AtomicU8, Ordering};

use crate::error::{ControlError, Result};

const FREE: u8 = 0;
const HELD: u8 = 1;

/// Observable state of an [`ExclusivityGate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Free,
    Held,
}

/// Single-slot, non-blocking admission gate.
///
/// `Free -> Held` is a single compare-and-set. A caller that loses the race
/// gets [`ControlError::Busy`] straight away; nobody waits or queues. The only
/// way back to `Free` is dropping the [`GateGuard`], so every exit path of the
/// holder releases the gate exactly once.
#[derive(Debug, Default)]
pub struct ExclusivityGate {
    state: AtomicU8,
}

impl ExclusivityGate {
    /// A gate in the `Free` state.
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(FREE),
        }
    }

    /// Try to take the gate without blocking.
    pub fn try_acquire(&self) -> Result<GateGuard<'_>> {
        self.state
            .compare_exchange(FREE, HELD, Ordering::Acquire, Ordering::Relaxed)
            .map(|_| GateGuard { gate: self })
            .map_err(|_| ControlError::Busy)
    }

    /// Current state. Racy by nature; useful for diagnostics and tests.
    pub fn state(&self) -> GateState {
        match self.state.load(Ordering::Acquire) {
            FREE => GateState::Free,
            _ => GateState::Held,
        }
    }

    fn release(&self) {
        self.state.store(FREE, Ordering::Release);
    }
}

/// Proof of holding an [`ExclusivityGate`]. Releases the gate on drop.
#[must_use = "the gate is released as soon as the guard is dropped"]
#[derive(Debug)]
pub struct GateGuard<'a> {
    gate: &'a ExclusivityGate,
}

impl Drop for GateGuard<'_> {
    fn drop(&mut self) {
        self.gate.release();
    }
}
