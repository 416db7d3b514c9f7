//! Tension Animation System
//!
//! Damped-spring animation with exact closed-form trajectories.
//!
//! # Features
//!
//! - **Springs**: one [`Spring`] model reachable from duration/bounce,
//!   mass/stiffness/damping, response/damping ratio, or settling duration
//! - **Trajectories**: value, velocity, force and settling time for
//!   under-, critically and over-damped springs
//! - **Drivers**: analytic [`SpringAnimation`], retargetable
//!   [`FluidSpringAnimation`], and [`TimingCurveAnimation`] easing curves
//! - **Modifiers**: speed up, slow down or repeat any animation
//! - **Scheduling**: [`AnimationScheduler`] layers and merges animations per
//!   property so retargeting never jumps
//! - **Config**: named animations loaded from TOML
//!
//! # Example
//!
//! ```rust
//! use tension_animation::{Animation, AnimationScheduler, Spring};
//!
//! let spring = Spring::new(0.5, 0.2);
//! assert!((spring.bounce() - 0.2).abs() < 1e-9);
//! assert_eq!(spring.value(1.0, 0.0, 0.0), 0.0);
//!
//! let mut scheduler = AnimationScheduler::new();
//! let opacity = scheduler.add_property(0.0f64);
//! scheduler.animate_to(opacity, 1.0, Animation::snappy());
//!
//! let mut time = 0.0;
//! while scheduler.tick(time) {
//!     time += 1.0 / 60.0;
//! }
//! assert_eq!(scheduler.value(opacity), Some(1.0));
//! ```

pub mod animation;
pub mod config;
pub mod context;
pub mod easing;
pub mod fluid;
pub mod interpolating;
pub mod modifier;
pub mod scheduler;
mod solver;
pub mod spring;
mod trajectory;

pub use animation::{Animation, TimingCurveAnimation};
pub use config::{AnimationConfig, AnimationSpec, ConfigError};
pub use context::AnimationContext;
pub use easing::Easing;
pub use fluid::{
    spring_damping, spring_damping_fraction, spring_stiffness, FluidSpringAnimation, SpringState,
};
pub use interpolating::SpringAnimation;
pub use modifier::{AnimationModifier, RepeatState};
pub use scheduler::{AnimatedProperty, AnimationScheduler, PropertyId};
pub use spring::{DampingRegime, Spring};
