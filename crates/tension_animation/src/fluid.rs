//! Force-integrated spring driver
//!
//! [`FluidSpringAnimation`] steps a spring numerically in fixed sub-steps and
//! keeps its offset, velocity and force in the animation context between
//! frames. That state is what lets a replacement spring pick up an in-flight
//! one without a visible jump, and optionally blend from the old response to
//! the new one.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};
use tension_core::{AnimationStateKey, VectorArithmetic, WireDecoder, WireEncoder, WireMessage};
use tracing::{debug, trace};

use crate::animation::Animation;
use crate::context::AnimationContext;

/// Integration sub-step, in seconds
const STEP: f64 = 1.0 / 300.0;

/// Half a sub-step, used for the velocity half-kicks
const HALF_STEP: f64 = 1.0 / 600.0;

/// Frames further apart than this are not caught up step by step
const MAX_CATCH_UP: f64 = 1.0;

/// Where the clock resumes after a skipped gap
const RESUME_INTERVAL: f64 = 1.0 / 60.0;

const MAX_STIFFNESS: f64 = 45_000.0;

/// Squared velocity and force below which the spring may be at rest
const REST_THRESHOLD: f64 = 0.0036;

/// Fraction of the target treated as "arrived"
const ARRIVAL_TOLERANCE: f64 = 0.01;

/// Stiffness of a spring with the given response, infinite for `response <= 0`
pub fn spring_stiffness(response: f64) -> f64 {
    if response <= 0.0 {
        f64::INFINITY
    } else {
        let frequency = TAU / response;
        frequency * frequency
    }
}

/// Damping coefficient for `fraction` of critical damping at `stiffness`
pub fn spring_damping(fraction: f64, stiffness: f64) -> f64 {
    2.0 * stiffness.sqrt() * fraction
}

/// Damping fraction that corresponds to a bounce in `(-1, 1]`
pub fn spring_damping_fraction(bounce: f64) -> f64 {
    if bounce < 0.0 {
        1.0 / (bounce + 1.0)
    } else {
        1.0 - bounce
    }
}

/// Integrator state of a fluid spring, kept in the animation context
///
/// `offset` runs from zero towards the animated value. Times are measured on
/// the same clock as the `time` passed to the driver.
#[derive(Clone, Debug, PartialEq)]
pub struct SpringState<V: VectorArithmetic> {
    pub offset: V,
    pub velocity: V,
    pub force: V,
    /// Clock position the integrator has advanced to
    pub time: f64,
    /// When the current spring took over
    pub start_time: f64,
    pub blend_start: f64,
    /// Response still to blend away, previous minus current
    pub blend_interval: f64,
}

impl<V: VectorArithmetic> Default for SpringState<V> {
    fn default() -> Self {
        Self {
            offset: V::zero(),
            velocity: V::zero(),
            force: V::zero(),
            time: 0.0,
            start_time: 0.0,
            blend_start: 0.0,
            blend_interval: 0.0,
        }
    }
}

impl<V: VectorArithmetic> AnimationStateKey for SpringState<V> {
    type Value = SpringState<V>;

    fn default_value() -> Self::Value {
        SpringState::default()
    }
}

impl<V: VectorArithmetic> AnimationContext<V> {
    /// Fluid spring state of this run, default if never written
    pub fn spring_state(&self) -> SpringState<V> {
        self.state.get::<SpringState<V>>()
    }

    pub fn set_spring_state(&mut self, spring_state: SpringState<V>) {
        self.state.set::<SpringState<V>>(spring_state);
    }
}

/// A spring that retargets smoothly, stepped by force integration
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FluidSpringAnimation {
    /// Approximate duration in seconds; zero or less asks for the stiffest spring
    pub response: f64,
    /// Fraction of critical damping
    pub damping_fraction: f64,
    /// Seconds over which a change of response is blended in
    pub blend_duration: f64,
}

impl FluidSpringAnimation {
    pub fn new(response: f64, damping_fraction: f64, blend_duration: f64) -> Self {
        Self {
            response,
            damping_fraction,
            blend_duration,
        }
    }

    /// Response in effect at `time`, accounting for an active blend
    pub fn effective_response<V: VectorArithmetic>(
        &self,
        state: &SpringState<V>,
        time: f64,
    ) -> f64 {
        if self.blend_duration > 0.0 && state.blend_interval != 0.0 {
            let progress = ((time - state.blend_start) / self.blend_duration).clamp(0.0, 1.0);
            let remaining = 1.0 - progress * progress * (3.0 - progress * 2.0);
            self.response + state.blend_interval * remaining
        } else {
            self.response
        }
    }

    /// Stiffness used for integration at `time`
    pub fn effective_stiffness<V: VectorArithmetic>(
        &self,
        state: &SpringState<V>,
        time: f64,
    ) -> f64 {
        let response = self.effective_response(state, time);
        let stiffness = if response > 0.0 {
            (TAU / response).powi(2)
        } else {
            1.0
        };
        stiffness.min(MAX_STIFFNESS)
    }

    /// Advance the spring to `time` and return its offset towards `value`
    ///
    /// Returns `None` once the spring has come to rest on `value`.
    pub fn animate<V: VectorArithmetic>(
        &self,
        value: V,
        time: f64,
        context: &mut AnimationContext<V>,
    ) -> Option<V> {
        let mut state = context.spring_state();
        let response = self.effective_response(&state, time);
        let stiffness = self.effective_stiffness(&state, time);

        if time - state.start_time >= response {
            context.is_logically_complete = true;
        }
        if time - state.time > MAX_CATCH_UP {
            trace!(from = state.time, to = time, "fluid spring skipping frame gap");
            state.time = time - RESUME_INTERVAL;
        }

        let damping = -spring_damping(self.damping_fraction, stiffness);
        let mut t = state.time;
        while t < time {
            let mut force = state.force.scaled(HALF_STEP);
            force += state.velocity.clone();
            state.offset += force.scaled(STEP);

            let mut displacement = value.clone();
            displacement -= state.offset.clone();
            displacement.scale(stiffness);
            state.force = force.scaled(damping) + displacement;

            state.velocity = state.force.scaled(HALF_STEP) + force;
            t += STEP;
        }
        state.time = t;

        let offset = state.offset.clone();
        let motion = state
            .velocity
            .magnitude_squared()
            .max(state.force.magnitude_squared());
        let remaining = (value.clone() - state.offset.clone()).magnitude_squared();
        context.set_spring_state(state);

        if motion > REST_THRESHOLD {
            return Some(offset);
        }
        let tolerance = value.scaled(ARRIVAL_TOLERANCE).magnitude_squared();
        if tolerance > 0.0 && tolerance < remaining {
            Some(offset)
        } else {
            None
        }
    }

    /// Current velocity of the integrator
    pub fn velocity<V: VectorArithmetic>(
        &self,
        _value: &V,
        _time: f64,
        context: &AnimationContext<V>,
    ) -> Option<V> {
        Some(context.spring_state().velocity)
    }

    /// Take over from `previous`, which was animating towards `value`
    ///
    /// The previous animation is advanced to `time` and its offset and
    /// velocity carried over, so the motion continues without a jump. A
    /// previous fluid spring with a different response starts a blend.
    pub fn should_merge<V: VectorArithmetic>(
        &self,
        previous: &Animation,
        value: V,
        time: f64,
        context: &mut AnimationContext<V>,
    ) -> bool {
        let offset = previous.animate(value.clone(), time, context);
        let velocity = previous.velocity(&value, time, context);

        let mut state = context.spring_state();
        if let Some(velocity) = velocity {
            state.velocity = velocity;
        }
        if let Some(offset) = offset {
            state.offset = offset;
        }
        state.time = time;
        state.start_time = time;

        if let Animation::FluidSpring(previous) = previous {
            if previous.response != self.response {
                state.blend_interval = previous.response - self.response;
                state.blend_start = time;
                debug!(
                    from = previous.response,
                    to = self.response,
                    time,
                    "fluid spring blending response"
                );
            }
        }
        context.set_spring_state(state);
        true
    }
}

impl WireMessage for FluidSpringAnimation {
    fn encode(&self, encoder: &mut WireEncoder) {
        encoder.double_field(1, self.response, 0.0);
        encoder.double_field(2, self.damping_fraction, 0.0);
        encoder.double_field(3, self.blend_duration, 0.0);
    }

    fn decode(decoder: &mut WireDecoder<'_>) -> tension_core::error::Result<Self> {
        let mut animation = FluidSpringAnimation::default();
        while let Some(field) = decoder.next_field()? {
            match field.tag {
                1 => animation.response = decoder.double_field(field)?,
                2 => animation.damping_fraction = decoder.double_field(field)?,
                3 => animation.blend_duration = decoder.double_field(field)?,
                _ => decoder.skip_field(field)?,
            }
        }
        Ok(animation)
    }
}
