//! Per-run animation context
//!
//! Every running animation owns one [`AnimationContext`]. Drivers stash their
//! frame-to-frame state in it and raise `is_logically_complete` once dependent
//! work no longer needs to wait for the animation to finish visually.

use tension_core::{AnimationState, VectorArithmetic};

/// Mutable state handed to a driver on every frame
#[derive(Debug)]
pub struct AnimationContext<V: VectorArithmetic> {
    /// Type-keyed driver state
    pub state: AnimationState<V>,
    /// Set by a driver once the animation counts as done for dependents,
    /// which may happen well before it stops producing samples
    pub is_logically_complete: bool,
}

impl<V: VectorArithmetic> AnimationContext<V> {
    pub fn new() -> Self {
        Self {
            state: AnimationState::new(),
            is_logically_complete: false,
        }
    }
}

impl<V: VectorArithmetic> Default for AnimationContext<V> {
    fn default() -> Self {
        Self::new()
    }
}
