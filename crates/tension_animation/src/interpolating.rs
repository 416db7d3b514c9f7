//! Analytic spring driver
//!
//! [`SpringAnimation`] samples the closed-form spring from rest at 0 towards 1
//! and scales the animated value by that progress. It keeps no state between
//! frames, so overlapping runs simply add up. Damping above critical is
//! sampled as a critically damped spring at the same natural frequency.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};
use tension_core::{VectorArithmetic, WireDecoder, WireEncoder, WireMessage};

use crate::context::AnimationContext;
use crate::spring::Spring;
use crate::trajectory::scan_settling;

/// Epsilon used to decide when a sampled spring has finished
const DURATION_EPSILON: f64 = 0.001;

/// A spring animation described by its physical parameters
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringAnimation {
    pub mass: f64,
    pub stiffness: f64,
    pub damping: f64,
    /// Initial velocity as a fraction of the animated distance per second
    pub initial_velocity: f64,
}

impl Default for SpringAnimation {
    fn default() -> Self {
        Self {
            mass: 1.0,
            stiffness: 100.0,
            damping: 20.0,
            initial_velocity: 0.0,
        }
    }
}

impl SpringAnimation {
    pub fn new(mass: f64, stiffness: f64, damping: f64, initial_velocity: f64) -> Self {
        Self {
            mass,
            stiffness,
            damping,
            initial_velocity,
        }
    }

    /// The spring this animation samples, never over-damped
    pub fn model(&self) -> Spring {
        Spring::with_physics(self.mass, self.stiffness, self.damping, false)
    }

    /// Progress from 0 towards 1 at `time`
    pub fn sample(&self, time: f64) -> f64 {
        self.model().value(1.0, self.initial_velocity, time)
    }

    /// Time after which the progress stays within `epsilon` of 1
    ///
    /// `epsilon` is floored at `1e-6`. Oscillating springs never report less
    /// than one second. A spring too slow to settle within the scan reports
    /// the time of its closest approach.
    pub fn duration(&self, epsilon: f64) -> f64 {
        let epsilon = epsilon.max(1e-6);
        let model = self.model();
        if model.decay_constant() == 0.0 {
            return f64::INFINITY;
        }
        if model.is_instant() {
            return 0.0;
        }

        let omega = model.angular_frequency();
        if omega > 0.0 {
            let adjusted = (model.decay_constant() - self.initial_velocity) / omega;
            let amplitude = epsilon / (1.0 + adjusted.abs());
            return (-amplitude.ln() / model.decay_constant()).max(1.0);
        }
        scan_settling(epsilon, |time| {
            (1.0 - model.value(1.0, self.initial_velocity, time)).abs()
        })
        .settled_or_closest()
    }

    /// Time after which dependents may treat the animation as done
    pub fn logical_end_time(&self) -> f64 {
        if self.stiffness.is_finite() {
            TAU / self.stiffness.sqrt()
        } else {
            0.0
        }
    }

    /// Sample towards `value` at `time`, or `None` once the spring has settled
    pub fn animate<V: VectorArithmetic>(
        &self,
        value: V,
        time: f64,
        context: &mut AnimationContext<V>,
    ) -> Option<V> {
        let duration = self.duration(DURATION_EPSILON);
        if !(duration > time) {
            return None;
        }
        let sample = self.sample(time);
        if !sample.is_finite() {
            return None;
        }
        if time >= self.logical_end_time() {
            context.is_logically_complete = true;
        }
        Some(value.scaled(sample))
    }

    /// Runs are summed rather than merged, so no velocity is tracked
    pub fn velocity<V: VectorArithmetic>(&self, _value: &V, _time: f64) -> Option<V> {
        None
    }
}

impl WireMessage for SpringAnimation {
    fn encode(&self, encoder: &mut WireEncoder) {
        encoder.double_field(1, self.mass, 1.0);
        encoder.double_field(2, self.stiffness, 100.0);
        encoder.double_field(3, self.damping, 20.0);
        encoder.double_field(4, self.initial_velocity, 0.0);
    }

    fn decode(decoder: &mut WireDecoder<'_>) -> tension_core::error::Result<Self> {
        let mut animation = SpringAnimation::default();
        while let Some(field) = decoder.next_field()? {
            match field.tag {
                1 => animation.mass = decoder.double_field(field)?,
                2 => animation.stiffness = decoder.double_field(field)?,
                3 => animation.damping = decoder.double_field(field)?,
                4 => animation.initial_velocity = decoder.double_field(field)?,
                _ => decoder.skip_field(field)?,
            }
        }
        Ok(animation)
    }
}
