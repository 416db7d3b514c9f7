//! Tension Core
//!
//! Foundational pieces shared by the Tension animation crates:
//!
//! - **Vector arithmetic**: the [`VectorArithmetic`] trait every animatable value implements
//! - **Animation state**: type-keyed per-property storage that drivers keep between frames
//! - **Wire codec**: the length-delimited field encoding used to ship animation parameters
//!
//! # Example
//!
//! ```rust
//! use tension_core::{AnimatablePair, VectorArithmetic};
//!
//! let origin = AnimatablePair::new(10.0f64, 20.0f64);
//! let half = origin.scaled(0.5);
//! assert_eq!(half, AnimatablePair::new(5.0, 10.0));
//! ```

pub mod error;
pub mod state;
pub mod vector;
pub mod wire;

pub use error::WireError;
pub use state::{AnimationState, AnimationStateKey};
pub use vector::{AnimatablePair, RectData, Vector2, VectorArithmetic};
pub use wire::{Field, WireDecoder, WireEncoder, WireMessage, WireType};
