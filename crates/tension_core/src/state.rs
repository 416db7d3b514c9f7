//! Typed per-animation state storage
//!
//! An [`AnimationState`] is owned by whoever drives a single animated
//! property. Drivers keep whatever they need between frames under their own
//! key type, so two drivers never see each other's state:
//!
//! ```rust
//! use tension_core::state::{AnimationState, AnimationStateKey};
//!
//! struct FrameCount;
//!
//! impl AnimationStateKey for FrameCount {
//!     type Value = u32;
//!
//!     fn default_value() -> u32 {
//!         0
//!     }
//! }
//!
//! let mut state = AnimationState::<f64>::new();
//! assert_eq!(state.get::<FrameCount>(), 0);
//!
//! *state.get_mut::<FrameCount>() += 1;
//! assert_eq!(state.get::<FrameCount>(), 1);
//! ```

use rustc_hash::FxHashMap;
use std::any::{Any, TypeId};
use std::fmt;
use std::marker::PhantomData;

use crate::vector::VectorArithmetic;

/// Key for a slot in [`AnimationState`]
///
/// The key type itself is the identity; its `Value` is what gets stored.
pub trait AnimationStateKey: 'static {
    type Value: 'static;

    /// Value returned for a slot that was never written
    fn default_value() -> Self::Value;
}

/// Type-keyed storage for the state of one animated property
pub struct AnimationState<V: VectorArithmetic> {
    storage: FxHashMap<TypeId, Box<dyn Any>>,
    _value: PhantomData<fn() -> V>,
}

impl<V: VectorArithmetic> AnimationState<V> {
    pub fn new() -> Self {
        Self {
            storage: FxHashMap::default(),
            _value: PhantomData,
        }
    }

    /// Read a slot, falling back to the key's default
    pub fn get<K>(&self) -> K::Value
    where
        K: AnimationStateKey,
        K::Value: Clone,
    {
        self.storage
            .get(&TypeId::of::<K>())
            .and_then(|slot| slot.downcast_ref::<K::Value>())
            .cloned()
            .unwrap_or_else(K::default_value)
    }

    /// Mutable access to a slot, inserting the key's default first if needed
    pub fn get_mut<K: AnimationStateKey>(&mut self) -> &mut K::Value {
        let slot = self
            .storage
            .entry(TypeId::of::<K>())
            .or_insert_with(|| Box::new(K::default_value()));
        if !slot.is::<K::Value>() {
            *slot = Box::new(K::default_value());
        }
        match slot.downcast_mut::<K::Value>() {
            Some(value) => value,
            None => unreachable!("slot type checked above"),
        }
    }

    /// Overwrite a slot
    pub fn set<K: AnimationStateKey>(&mut self, value: K::Value) {
        self.storage.insert(TypeId::of::<K>(), Box::new(value));
    }

    /// Remove a slot, returning its previous value if it was written
    pub fn remove<K: AnimationStateKey>(&mut self) -> Option<K::Value> {
        self.storage
            .remove(&TypeId::of::<K>())
            .and_then(|slot| slot.downcast::<K::Value>().ok())
            .map(|value| *value)
    }

    /// Whether a slot has been written
    pub fn contains<K: AnimationStateKey>(&self) -> bool {
        self.storage.contains_key(&TypeId::of::<K>())
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

impl<V: VectorArithmetic> Default for AnimationState<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: VectorArithmetic> fmt::Debug for AnimationState<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationState")
            .field("slots", &self.storage.len())
            .finish()
    }
}
