//! Modifiers that wrap another animation
//!
//! A modifier changes how its base animation is played back without knowing
//! what kind of animation the base is. [`AnimationModifier::Speed`] rescales
//! time, [`AnimationModifier::Repeat`] plays the base again each time it
//! finishes, optionally running every other pass backwards.

use serde::{Deserialize, Serialize};
use tension_core::{AnimationState, AnimationStateKey, VectorArithmetic};
use tracing::trace;

use crate::animation::Animation;
use crate::context::AnimationContext;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationModifier {
    /// Play the base `speed` times faster
    Speed(f64),
    /// Replay the base, `count` passes in total or forever when `None`
    Repeat {
        count: Option<u32>,
        autoreverses: bool,
    },
}

/// Progress of a repeating animation, kept in the run's context
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RepeatState {
    /// Passes completed so far
    pub index: u32,
    /// Time at which the current pass began
    pub time_offset: f64,
}

impl AnimationStateKey for RepeatState {
    type Value = RepeatState;

    fn default_value() -> Self::Value {
        RepeatState::default()
    }
}

impl<V: VectorArithmetic> AnimationContext<V> {
    pub fn repeat_state(&self) -> RepeatState {
        self.state.get::<RepeatState>()
    }

    pub fn set_repeat_state(&mut self, repeat_state: RepeatState) {
        self.state.set::<RepeatState>(repeat_state);
    }
}

impl AnimationModifier {
    pub(crate) fn animate<V: VectorArithmetic>(
        &self,
        base: &Animation,
        value: V,
        time: f64,
        context: &mut AnimationContext<V>,
    ) -> Option<V> {
        match *self {
            AnimationModifier::Speed(speed) => base.animate(value, time * speed, context),
            AnimationModifier::Repeat {
                count,
                autoreverses,
            } => repeat(base, count, autoreverses, value, time, context),
        }
    }

    pub(crate) fn velocity<V: VectorArithmetic>(
        &self,
        base: &Animation,
        value: &V,
        time: f64,
        context: &AnimationContext<V>,
    ) -> Option<V> {
        match *self {
            AnimationModifier::Speed(speed) => base
                .velocity(value, time * speed, context)
                .map(|velocity| velocity.scaled(speed)),
            AnimationModifier::Repeat { .. } => None,
        }
    }

    /// Base time that corresponds to `time` on the modified timeline
    pub(crate) fn base_time(&self, time: f64) -> f64 {
        match *self {
            AnimationModifier::Speed(speed) => time * speed,
            AnimationModifier::Repeat { .. } => time,
        }
    }
}

fn repeat<V: VectorArithmetic>(
    base: &Animation,
    count: Option<u32>,
    autoreverses: bool,
    value: V,
    time: f64,
    context: &mut AnimationContext<V>,
) -> Option<V> {
    let pass = context.repeat_state();
    let reversed = autoreverses && pass.index % 2 == 1;

    match base.animate(value.clone(), time - pass.time_offset, context) {
        Some(sample) if reversed => Some(value - sample),
        Some(sample) => Some(sample),
        None => {
            let index = pass.index + 1;
            // the next pass starts from a clean slate
            context.state = AnimationState::new();
            context.set_repeat_state(RepeatState {
                index,
                time_offset: time,
            });
            if count.is_some_and(|count| index >= count) {
                trace!(index, "repeat finished");
                return None;
            }
            trace!(index, time, reversed = !reversed, "repeat pass");
            context.is_logically_complete = false;
            Some(if reversed { V::zero() } else { value })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_shortens_timing_curve() {
        let animation = Animation::linear(1.0).speed(2.0);
        let mut context = AnimationContext::new();
        assert_eq!(animation.animate(4.0, 0.25, &mut context), Some(2.0));
        assert_eq!(animation.velocity(&4.0, 0.25, &context), Some(8.0));
        assert_eq!(animation.animate(4.0, 0.5, &mut context), None);
        assert!(context.is_logically_complete);
    }

    #[test]
    fn test_repeat_reverses_every_other_pass() {
        let animation = Animation::linear(1.0).repeat_count(3, true);
        let mut context = AnimationContext::new();

        assert_eq!(animation.animate(10.0, 0.25, &mut context), Some(2.5));
        // end of the first pass holds the full value and flips direction
        assert_eq!(animation.animate(10.0, 1.0, &mut context), Some(10.0));
        assert_eq!(
            context.repeat_state(),
            RepeatState {
                index: 1,
                time_offset: 1.0
            }
        );
        assert!(!context.is_logically_complete);

        // second pass runs back towards zero
        assert_eq!(animation.animate(10.0, 1.25, &mut context), Some(7.5));
        assert_eq!(animation.animate(10.0, 1.75, &mut context), Some(2.5));
        assert_eq!(animation.animate(10.0, 2.0, &mut context), Some(0.0));

        // third pass runs forwards again and is the last one
        assert_eq!(animation.animate(10.0, 2.5, &mut context), Some(5.0));
        assert_eq!(animation.animate(10.0, 3.0, &mut context), None);
        assert_eq!(context.repeat_state().index, 3);
    }

    #[test]
    fn test_repeat_without_autoreverse_restarts() {
        let animation = Animation::linear(1.0).repeat_count(2, false);
        let mut context = AnimationContext::new();
        assert_eq!(animation.animate(10.0, 1.0, &mut context), Some(10.0));
        assert_eq!(animation.animate(10.0, 1.5, &mut context), Some(5.0));
        assert_eq!(animation.animate(10.0, 2.0, &mut context), None);
    }

    #[test]
    fn test_repeat_count_of_one_plays_once() {
        let animation = Animation::linear(0.5).repeat_count(1, true);
        let mut context = AnimationContext::<f64>::new();
        assert_eq!(animation.animate(1.0, 0.25, &mut context), Some(0.5));
        assert_eq!(animation.animate(1.0, 0.5, &mut context), None);
    }

    #[test]
    fn test_repeat_forever_never_finishes() {
        let animation = Animation::ease_in_out(0.2).repeat_forever(true);
        let mut context = AnimationContext::new();
        let mut time = 0.0;
        for _ in 0..600 {
            time += 1.0 / 60.0;
            let sample = animation.animate(1.0, time, &mut context);
            let sample = sample.expect("repeating forever");
            assert!(sample > -1e-9 && sample < 1.0 + 1e-9, "{sample} at {time}");
        }
        assert!(context.repeat_state().index >= 40);
    }

    #[test]
    fn test_repeat_resets_base_state_between_passes() {
        let animation = Animation::spring_with(0.2, 0.0, 0.0).repeat_count(2, false);
        let mut context = AnimationContext::new();
        let mut time = 0.0;
        let mut restarted = false;
        let mut previous = 0.0;
        while let Some(sample) = animation.animate(1.0, time, &mut context) {
            if sample < previous - 0.5 {
                restarted = true;
            }
            previous = sample;
            time += 1.0 / 60.0;
            assert!(time < 10.0, "repeat never finished");
        }
        assert!(restarted);
        assert_eq!(context.repeat_state().index, 2);
    }

    #[test]
    fn test_modified_merges_only_with_same_modifier() {
        let previous = Animation::spring().speed(2.0);
        let mut context = AnimationContext::<f64>::new();

        let same = Animation::spring_with(0.3, 0.0, 0.0).speed(2.0);
        assert!(same.should_merge(&previous, 1.0, 0.1, &mut context));

        let faster = Animation::spring().speed(3.0);
        assert!(!faster.should_merge(&previous, 1.0, 0.1, &mut context));
        assert!(!Animation::spring().speed(2.0).should_merge(
            &Animation::spring(),
            1.0,
            0.1,
            &mut context
        ));
        assert!(!Animation::linear(1.0).speed(2.0).should_merge(
            &Animation::linear(1.0).speed(2.0),
            1.0,
            0.1,
            &mut context
        ));
    }

    #[test]
    fn test_serde_round_trip_keeps_modifier() {
        let animation = Animation::bouncy().speed(0.5).repeat_forever(false);
        let json = serde_json::to_string(&animation).unwrap();
        assert!(json.contains("\"repeat\""), "{json}");
        let back: Animation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, animation);
    }
}
