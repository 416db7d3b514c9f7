//! The closed set of animation kinds and the factories that build them

use serde::{Deserialize, Serialize};
use tension_core::VectorArithmetic;

use crate::context::AnimationContext;
use crate::easing::Easing;
use crate::fluid::{
    spring_damping, spring_damping_fraction, spring_stiffness, FluidSpringAnimation,
};
use crate::interpolating::SpringAnimation;
use crate::modifier::AnimationModifier;

/// Default duration of the timing-curve factories
const DEFAULT_TIMING_DURATION: f64 = 0.35;

/// Plays an easing curve over a fixed duration
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimingCurveAnimation {
    pub duration: f64,
    pub curve: Easing,
}

impl TimingCurveAnimation {
    pub fn new(duration: f64, curve: Easing) -> Self {
        Self { duration, curve }
    }

    fn progress(&self, time: f64) -> f64 {
        if self.duration > 0.0 {
            (time / self.duration).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    /// Eased fraction of `value` at `time`, `None` once the duration has passed
    pub fn animate<V: VectorArithmetic>(
        &self,
        value: V,
        time: f64,
        context: &mut AnimationContext<V>,
    ) -> Option<V> {
        if time >= self.duration {
            context.is_logically_complete = true;
            return None;
        }
        Some(value.scaled(self.curve.apply(self.progress(time))))
    }

    pub fn velocity<V: VectorArithmetic>(&self, value: &V, time: f64) -> Option<V> {
        if !(self.duration > 0.0) || time >= self.duration {
            return None;
        }
        Some(value.scaled(self.curve.velocity(self.progress(time)) / self.duration))
    }
}

/// An animation that can drive any [`VectorArithmetic`] value
///
/// Every driver receives the full distance being animated and returns how
/// much of it has been covered so far, or `None` when it is done and the
/// exact end value should be shown.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Animation {
    /// Analytic spring, runs overlap additively
    Spring(SpringAnimation),
    /// Force-integrated spring that merges into its predecessor
    FluidSpring(FluidSpringAnimation),
    Timing(TimingCurveAnimation),
    /// Another animation played back through a modifier
    Modified {
        base: Box<Animation>,
        modifier: AnimationModifier,
    },
}

impl Animation {
    /// Sample the animation towards `value` at `time` since it began
    pub fn animate<V: VectorArithmetic>(
        &self,
        value: V,
        time: f64,
        context: &mut AnimationContext<V>,
    ) -> Option<V> {
        match self {
            Animation::Spring(spring) => spring.animate(value, time, context),
            Animation::FluidSpring(fluid) => fluid.animate(value, time, context),
            Animation::Timing(timing) => timing.animate(value, time, context),
            Animation::Modified { base, modifier } => modifier.animate(base, value, time, context),
        }
    }

    /// Current velocity, if the animation tracks one
    pub fn velocity<V: VectorArithmetic>(
        &self,
        value: &V,
        time: f64,
        context: &AnimationContext<V>,
    ) -> Option<V> {
        match self {
            Animation::Spring(spring) => spring.velocity(value, time),
            Animation::FluidSpring(fluid) => fluid.velocity(value, time, context),
            Animation::Timing(timing) => timing.velocity(value, time),
            Animation::Modified { base, modifier } => {
                modifier.velocity(base, value, time, context)
            }
        }
    }

    /// Whether this animation takes over the running `previous` one instead
    /// of being layered on top of it
    ///
    /// `context` belongs to the previous run and is updated in place when the
    /// animations merge. A modified animation only merges into one carrying
    /// the same modifier, and then only if their bases merge.
    pub fn should_merge<V: VectorArithmetic>(
        &self,
        previous: &Animation,
        value: V,
        time: f64,
        context: &mut AnimationContext<V>,
    ) -> bool {
        match self {
            Animation::FluidSpring(fluid) => fluid.should_merge(previous, value, time, context),
            Animation::Spring(_) | Animation::Timing(_) => false,
            Animation::Modified { base, modifier } => match previous {
                Animation::Modified {
                    base: previous_base,
                    modifier: previous_modifier,
                } if previous_modifier == modifier => {
                    base.should_merge(previous_base, value, modifier.base_time(time), context)
                }
                _ => false,
            },
        }
    }

    // ========================================================================
    // Modifiers
    // ========================================================================

    /// Play this animation `speed` times faster
    pub fn speed(self, speed: f64) -> Self {
        self.modified(AnimationModifier::Speed(speed))
    }

    /// Play this animation `count` times in total
    ///
    /// With `autoreverses` every second pass runs from the target back to
    /// where the animation started.
    pub fn repeat_count(self, count: u32, autoreverses: bool) -> Self {
        self.modified(AnimationModifier::Repeat {
            count: Some(count),
            autoreverses,
        })
    }

    pub fn repeat_forever(self, autoreverses: bool) -> Self {
        self.modified(AnimationModifier::Repeat {
            count: None,
            autoreverses,
        })
    }

    pub fn modified(self, modifier: AnimationModifier) -> Self {
        Animation::Modified {
            base: Box::new(self),
            modifier,
        }
    }

    // ========================================================================
    // Springs
    // ========================================================================

    /// Retargetable spring with duration 0.5 and no bounce
    pub fn spring() -> Self {
        Self::spring_with(0.5, 0.0, 0.0)
    }

    /// Retargetable spring from a perceptual duration and bounce
    pub fn spring_with(duration: f64, bounce: f64, blend_duration: f64) -> Self {
        Self::spring_response(duration, spring_damping_fraction(bounce), blend_duration)
    }

    /// Retargetable spring from a response and damping fraction
    ///
    /// A response of zero asks for an infinitely stiff spring.
    pub fn spring_response(response: f64, damping_fraction: f64, blend_duration: f64) -> Self {
        Animation::FluidSpring(FluidSpringAnimation::new(
            response,
            damping_fraction,
            blend_duration,
        ))
    }

    /// Quick, lightly damped spring for tracking direct manipulation
    pub fn interactive_spring() -> Self {
        Self::interactive_spring_response(0.15, 0.86, 0.25)
    }

    pub fn interactive_spring_response(
        response: f64,
        damping_fraction: f64,
        blend_duration: f64,
    ) -> Self {
        Self::spring_response(response, damping_fraction, blend_duration)
    }

    /// Interactive spring with a base bounce of 0.15
    pub fn interactive_spring_duration(
        duration: f64,
        extra_bounce: f64,
        blend_duration: f64,
    ) -> Self {
        Self::spring_with(duration, 0.15 + extra_bounce, blend_duration)
    }

    pub fn smooth() -> Self {
        Self::smooth_with(0.5, 0.0)
    }

    /// No bounce, plus `extra_bounce`
    pub fn smooth_with(duration: f64, extra_bounce: f64) -> Self {
        Self::spring_with(duration, extra_bounce, 0.0)
    }

    pub fn snappy() -> Self {
        Self::snappy_with(0.5, 0.0)
    }

    /// Base bounce of 0.15, plus `extra_bounce`
    pub fn snappy_with(duration: f64, extra_bounce: f64) -> Self {
        Self::spring_with(duration, 0.15 + extra_bounce, 0.0)
    }

    pub fn bouncy() -> Self {
        Self::bouncy_with(0.5, 0.0)
    }

    /// Base bounce of 0.3, plus `extra_bounce`
    pub fn bouncy_with(duration: f64, extra_bounce: f64) -> Self {
        Self::spring_with(duration, 0.3 + extra_bounce, 0.0)
    }

    /// Analytic spring with duration 0.5 and no bounce
    pub fn interpolating() -> Self {
        Self::interpolating_spring_duration(0.5, 0.0, 0.0)
    }

    /// Analytic spring from physical parameters
    ///
    /// `initial_velocity` is a fraction of the animated distance per second.
    pub fn interpolating_spring(
        mass: f64,
        stiffness: f64,
        damping: f64,
        initial_velocity: f64,
    ) -> Self {
        Animation::Spring(SpringAnimation::new(
            mass,
            stiffness,
            damping,
            initial_velocity,
        ))
    }

    /// Analytic spring from a perceptual duration and bounce
    pub fn interpolating_spring_duration(
        duration: f64,
        bounce: f64,
        initial_velocity: f64,
    ) -> Self {
        let stiffness = spring_stiffness(duration);
        let fraction = spring_damping_fraction(bounce);
        let damping = spring_damping(fraction, stiffness);
        Self::interpolating_spring(1.0, stiffness, damping, initial_velocity)
    }

    // ========================================================================
    // Timing curves
    // ========================================================================

    pub fn linear(duration: f64) -> Self {
        Self::timing(duration, Easing::Linear)
    }

    pub fn ease_in(duration: f64) -> Self {
        Self::timing(duration, Easing::EaseIn)
    }

    pub fn ease_out(duration: f64) -> Self {
        Self::timing(duration, Easing::EaseOut)
    }

    pub fn ease_in_out(duration: f64) -> Self {
        Self::timing(duration, Easing::EaseInOut)
    }

    /// Ease in and out over the default 0.35 seconds
    pub fn default_timing() -> Self {
        Self::ease_in_out(DEFAULT_TIMING_DURATION)
    }

    /// Cubic bezier timing curve with control points `(x1, y1)` and `(x2, y2)`
    pub fn timing_curve(x1: f64, y1: f64, x2: f64, y2: f64, duration: f64) -> Self {
        Self::timing(duration, Easing::CubicBezier(x1, y1, x2, y2))
    }

    pub fn timing(duration: f64, curve: Easing) -> Self {
        Animation::Timing(TimingCurveAnimation::new(duration, curve))
    }
}

impl Default for Animation {
    fn default() -> Self {
        Self::spring()
    }
}

impl From<SpringAnimation> for Animation {
    fn from(animation: SpringAnimation) -> Self {
        Animation::Spring(animation)
    }
}

impl From<FluidSpringAnimation> for Animation {
    fn from(animation: FluidSpringAnimation) -> Self {
        Animation::FluidSpring(animation)
    }
}

impl From<TimingCurveAnimation> for Animation {
    fn from(animation: TimingCurveAnimation) -> Self {
        Animation::Timing(animation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fluid(animation: Animation) -> FluidSpringAnimation {
        match animation {
            Animation::FluidSpring(fluid) => fluid,
            other => panic!("expected a fluid spring, got {other:?}"),
        }
    }

    #[test]
    fn test_default_spring_parameters() {
        let spring = fluid(Animation::default());
        assert_eq!(spring, FluidSpringAnimation::new(0.5, 1.0, 0.0));

        let interactive = fluid(Animation::interactive_spring());
        assert_eq!(interactive, FluidSpringAnimation::new(0.15, 0.86, 0.25));
    }

    #[test]
    fn test_presets_add_base_bounce() {
        assert_eq!(fluid(Animation::smooth()).damping_fraction, 1.0);
        assert!((fluid(Animation::snappy()).damping_fraction - 0.85).abs() < 1e-12);
        assert!((fluid(Animation::bouncy()).damping_fraction - 0.7).abs() < 1e-12);
        assert!((fluid(Animation::bouncy_with(0.4, 0.1)).damping_fraction - 0.6).abs() < 1e-12);
        assert_eq!(fluid(Animation::bouncy_with(0.4, 0.1)).response, 0.4);

        let interactive = fluid(Animation::interactive_spring_duration(0.2, 0.0, 0.1));
        assert!((interactive.damping_fraction - 0.85).abs() < 1e-12);
        assert_eq!(interactive.blend_duration, 0.1);
    }

    #[test]
    fn test_interpolating_spring_from_duration() {
        let Animation::Spring(spring) = Animation::interpolating_spring_duration(1.0, 0.0, 0.0)
        else {
            panic!("expected an analytic spring");
        };
        assert_eq!(spring.mass, 1.0);
        assert!((spring.stiffness - spring_stiffness(1.0)).abs() < 1e-9);
        assert!((spring.damping - 2.0 * spring.stiffness.sqrt()).abs() < 1e-9);
        assert_eq!(spring.model().angular_frequency(), 0.0);
    }

    #[test]
    fn test_only_fluid_springs_merge() {
        let previous = Animation::spring();
        let mut context = AnimationContext::<f64>::new();

        let retarget = Animation::spring_with(0.3, 0.0, 0.0);
        assert!(retarget.should_merge(&previous, 1.0, 0.1, &mut context));
        assert!(!Animation::interpolating().should_merge(&previous, 1.0, 0.1, &mut context));
        assert!(!Animation::linear(1.0).should_merge(&previous, 1.0, 0.1, &mut context));
    }

    #[test]
    fn test_timing_curve_samples_and_finishes() {
        let animation = Animation::linear(2.0);
        let mut context = AnimationContext::new();
        assert_eq!(animation.animate(10.0, 0.5, &mut context), Some(2.5));
        assert_eq!(animation.velocity(&10.0, 0.5, &context), Some(5.0));
        assert!(!context.is_logically_complete);

        assert_eq!(animation.animate(10.0, 2.0, &mut context), None);
        assert!(context.is_logically_complete);
    }

    #[test]
    fn test_zero_duration_timing_is_done_immediately() {
        let animation = Animation::ease_in_out(0.0);
        let mut context = AnimationContext::<f64>::new();
        assert_eq!(animation.animate(1.0, 0.0, &mut context), None);
        assert_eq!(animation.velocity(&1.0, 0.0, &context), None);
    }

    #[test]
    fn test_analytic_spring_has_no_velocity() {
        let context = AnimationContext::<f64>::new();
        assert_eq!(Animation::interpolating().velocity(&1.0, 0.1, &context), None);
    }

    #[test]
    fn test_serde_round_trip_keeps_kind() {
        let animation = Animation::timing_curve(0.2, 0.0, 0.0, 1.0, 0.4);
        let json = serde_json::to_string(&animation).unwrap();
        assert!(json.starts_with("{\"timing\""), "{json}");
        let back: Animation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, animation);
    }
}
