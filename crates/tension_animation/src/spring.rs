//! Canonical spring model
//!
//! A [`Spring`] is a damped harmonic oscillator stored as the triple
//! `(angular_frequency, decay_constant, mass)`. The sign of the angular
//! frequency encodes the damping regime:
//!
//! - positive: under-damped, oscillates with overshoot
//! - zero: critically damped
//! - negative: over-damped, two real exponential modes
//!
//! Four parameterizations convert to and from the triple:
//!
//! | inputs | constructor |
//! |---|---|
//! | perceptual duration, bounce | [`Spring::new`] |
//! | mass, stiffness, damping | [`Spring::with_physics`] |
//! | response, damping ratio | [`Spring::with_response`] |
//! | settling duration, damping ratio | [`Spring::with_settling_duration`] |
//!
//! Degenerate inputs never panic. A non-positive duration or response, or an
//! infinite stiffness, produces an instant spring that jumps to its target.

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Damping regime of a spring
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DampingRegime {
    UnderDamped,
    CriticallyDamped,
    OverDamped,
}

/// An immutable damped harmonic oscillator
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Spring {
    pub(crate) angular_frequency: f64,
    pub(crate) decay_constant: f64,
    pub(crate) mass: f64,
}

impl Spring {
    /// Create a spring from a perceptual duration and a bounce
    ///
    /// `bounce` is 0 for a critically damped spring, up to 1 for undamped
    /// oscillation, and down towards -1 for increasingly over-damped springs.
    pub fn new(duration: f64, bounce: f64) -> Self {
        if !(duration > 0.0) {
            return Self::instant();
        }
        let bounce = bounce.clamp(-1.0 + f64::EPSILON, 1.0);
        let damping_ratio = if bounce < 0.0 {
            1.0 / (bounce + 1.0)
        } else {
            1.0 - bounce
        };
        let angular_velocity_factor = if damping_ratio <= 1.0 { TAU } else { -TAU };

        Self {
            angular_frequency: (1.0 - damping_ratio * damping_ratio).abs().sqrt()
                * angular_velocity_factor
                / duration,
            decay_constant: damping_ratio * TAU / duration,
            mass: 1.0,
        }
    }

    /// Create a spring from physical mass, stiffness and damping
    ///
    /// Unless `allow_over_damping` is set, a spring whose damping exceeds the
    /// critical value is clamped to critical damping.
    pub fn with_physics(mass: f64, stiffness: f64, damping: f64, allow_over_damping: bool) -> Self {
        let mass = sanitize_mass(mass);
        let stiffness = stiffness.max(0.0);
        let damping = damping.max(0.0);
        if stiffness.is_infinite() {
            return Self {
                mass,
                ..Self::instant()
            };
        }

        let natural_frequency = (stiffness / mass).sqrt();
        let decay = damping / (2.0 * mass);

        if decay > natural_frequency && !allow_over_damping {
            return Self {
                angular_frequency: 0.0,
                decay_constant: natural_frequency,
                mass,
            };
        }

        let oscillation = (natural_frequency * natural_frequency - decay * decay)
            .abs()
            .sqrt();
        Self {
            angular_frequency: if decay > natural_frequency {
                -oscillation
            } else {
                oscillation
            },
            decay_constant: decay,
            mass,
        }
    }

    /// Create a spring from a response (approximate duration) and damping ratio
    pub fn with_response(response: f64, damping_ratio: f64) -> Self {
        if !(response > 0.0) {
            return Self::instant();
        }
        let damping_ratio = damping_ratio.max(0.0);
        let tau_factor = if damping_ratio > 1.0 { -TAU } else { TAU };

        Self {
            angular_frequency: tau_factor * (1.0 - damping_ratio * damping_ratio).abs().sqrt()
                / response,
            decay_constant: TAU * damping_ratio / response,
            mass: 1.0,
        }
    }

    /// Build a spring straight from its canonical triple
    pub fn from_parts(angular_frequency: f64, decay_constant: f64, mass: f64) -> Self {
        Self {
            angular_frequency,
            decay_constant: decay_constant.max(0.0),
            mass: sanitize_mass(mass),
        }
    }

    /// A spring that reaches its target immediately
    pub fn instant() -> Self {
        Self {
            angular_frequency: 0.0,
            decay_constant: f64::INFINITY,
            mass: 1.0,
        }
    }

    // ========================================================================
    // Presets
    // ========================================================================

    /// No bounce, with `extra_bounce` added on top
    pub fn smooth(duration: f64, extra_bounce: f64) -> Self {
        Self::new(duration, extra_bounce)
    }

    /// A small amount of bounce (0.15), with `extra_bounce` added on top
    pub fn snappy(duration: f64, extra_bounce: f64) -> Self {
        Self::new(duration, 0.15 + extra_bounce)
    }

    /// A noticeable bounce (0.3), with `extra_bounce` added on top
    pub fn bouncy(duration: f64, extra_bounce: f64) -> Self {
        Self::new(duration, 0.3 + extra_bounce)
    }

    // ========================================================================
    // Canonical accessors
    // ========================================================================

    pub fn angular_frequency(&self) -> f64 {
        self.angular_frequency
    }

    pub fn decay_constant(&self) -> f64 {
        self.decay_constant
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn regime(&self) -> DampingRegime {
        if self.angular_frequency > 0.0 {
            DampingRegime::UnderDamped
        } else if self.angular_frequency < 0.0 {
            DampingRegime::OverDamped
        } else {
            DampingRegime::CriticallyDamped
        }
    }

    /// Whether this spring jumps straight to its target
    pub fn is_instant(&self) -> bool {
        self.decay_constant.is_infinite()
    }

    // ========================================================================
    // Derived parameterizations
    // ========================================================================

    /// Perceptual duration, the period of the undamped natural frequency
    pub fn duration(&self) -> f64 {
        if self.is_instant() {
            return 0.0;
        }
        let natural_squared = self.decay_constant * self.decay_constant
            + self.angular_frequency * self.angular_frequency.abs();
        if natural_squared <= 0.0 {
            return f64::INFINITY;
        }
        TAU / natural_squared.sqrt()
    }

    /// Same as [`Spring::duration`], under its response-based name
    pub fn response(&self) -> f64 {
        self.duration()
    }

    /// Damping as a fraction of critical damping
    pub fn damping_ratio(&self) -> f64 {
        if self.is_instant() {
            return 1.0;
        }
        let response = self.response();
        if response.is_infinite() {
            return 0.0;
        }
        self.decay_constant * response / TAU
    }

    /// Bounce in `(-1, 1]`, the inverse of [`Spring::new`]
    pub fn bounce(&self) -> f64 {
        let damping_ratio = self.damping_ratio();
        match self.regime() {
            DampingRegime::UnderDamped => 1.0 - damping_ratio,
            DampingRegime::OverDamped => 1.0 / damping_ratio - 1.0,
            DampingRegime::CriticallyDamped => 0.0,
        }
    }

    /// Spring constant `k`
    pub fn stiffness(&self) -> f64 {
        self.mass
            * (self.angular_frequency * self.angular_frequency.abs()
                + self.decay_constant * self.decay_constant)
    }

    /// Damping coefficient `c`
    pub fn damping(&self) -> f64 {
        self.decay_constant * 2.0 * self.mass
    }
}

impl Default for Spring {
    fn default() -> Self {
        Self::new(0.5, 0.0)
    }
}

fn sanitize_mass(mass: f64) -> f64 {
    if mass > 0.0 && mass.is_finite() {
        mass
    } else {
        tracing::trace!(mass, "non-positive spring mass replaced with 1.0");
        1.0
    }
}
