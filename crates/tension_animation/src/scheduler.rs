//! Animation scheduler
//!
//! Owns every animated property and advances them all on each tick. A
//! property keeps its model value (where it is going) and the presentation
//! value (what is on screen). Retargeting with an animation either merges
//! into the running animation or layers a new run on top, and the
//! presentation is the model minus whatever distance the runs still have to
//! cover.

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use tension_core::VectorArithmetic;
use tracing::{debug, trace};

use crate::animation::Animation;
use crate::context::AnimationContext;

new_key_type! {
    pub struct PropertyId;
}

/// One animation contributing to a property
#[derive(Debug)]
struct AnimationRun<V: VectorArithmetic> {
    animation: Animation,
    /// Distance this run animates across
    interval: V,
    begin_time: f64,
    context: AnimationContext<V>,
}

/// A value animated by the scheduler
#[derive(Debug)]
pub struct AnimatedProperty<V: VectorArithmetic> {
    model: V,
    presentation: V,
    runs: SmallVec<[AnimationRun<V>; 2]>,
    is_logically_complete: bool,
}

impl<V: VectorArithmetic> AnimatedProperty<V> {
    fn new(value: V) -> Self {
        Self {
            model: value.clone(),
            presentation: value,
            runs: SmallVec::new(),
            is_logically_complete: true,
        }
    }

    pub fn model(&self) -> &V {
        &self.model
    }

    pub fn presentation(&self) -> &V {
        &self.presentation
    }

    pub fn is_animating(&self) -> bool {
        !self.runs.is_empty()
    }

    pub fn is_logically_complete(&self) -> bool {
        self.is_logically_complete
    }

    fn jump(&mut self, value: V) {
        self.runs.clear();
        self.model = value.clone();
        self.presentation = value;
        self.is_logically_complete = true;
    }

    fn retarget(&mut self, value: V, animation: Animation, time: f64) {
        let interval = value.clone() - self.model.clone();
        self.model = value;
        self.is_logically_complete = false;

        if let Some(top) = self.runs.last_mut() {
            let elapsed = time - top.begin_time;
            let merged = animation.should_merge(
                &top.animation,
                top.interval.clone(),
                elapsed,
                &mut top.context,
            );
            if merged {
                debug!(elapsed, "merged animation into running one");
                top.animation = animation;
                top.interval += interval;
                top.context.is_logically_complete = false;
                return;
            }
        }

        self.runs.push(AnimationRun {
            animation,
            interval,
            begin_time: time,
            context: AnimationContext::new(),
        });
        debug!(runs = self.runs.len(), time, "layered animation run");
    }

    fn tick(&mut self, time: f64) {
        if self.runs.is_empty() {
            return;
        }

        let mut presentation = self.model.clone();
        let mut logically_complete = true;
        self.runs.retain(|run| {
            let elapsed = time - run.begin_time;
            match run.animation.animate(run.interval.clone(), elapsed, &mut run.context) {
                Some(sample) => {
                    presentation -= run.interval.clone() - sample;
                    logically_complete &= run.context.is_logically_complete;
                    true
                }
                None => false,
            }
        });

        if self.runs.is_empty() {
            debug!("property finished animating");
            self.presentation = self.model.clone();
        } else {
            self.presentation = presentation;
        }
        self.is_logically_complete = logically_complete;
    }

    fn velocity(&self, time: f64) -> V {
        let mut velocity = V::zero();
        for run in &self.runs {
            let elapsed = time - run.begin_time;
            let run_velocity = run.animation.velocity(&run.interval, elapsed, &run.context);
            if let Some(run_velocity) = run_velocity {
                velocity += run_velocity;
            }
        }
        velocity
    }
}

/// Drives every animated property of one value type
pub struct AnimationScheduler<V: VectorArithmetic> {
    properties: SlotMap<PropertyId, AnimatedProperty<V>>,
    current_time: f64,
}

impl<V: VectorArithmetic> AnimationScheduler<V> {
    pub fn new() -> Self {
        Self {
            properties: SlotMap::with_key(),
            current_time: 0.0,
        }
    }

    /// Time of the latest tick
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn add_property(&mut self, value: V) -> PropertyId {
        self.properties.insert(AnimatedProperty::new(value))
    }

    /// Remove a property, returning its model value
    pub fn remove_property(&mut self, id: PropertyId) -> Option<V> {
        self.properties.remove(id).map(|property| property.model)
    }

    pub fn get_property(&self, id: PropertyId) -> Option<&AnimatedProperty<V>> {
        self.properties.get(id)
    }

    /// Jump straight to `value`, cancelling any running animations
    pub fn set_value(&mut self, id: PropertyId, value: V) -> bool {
        match self.properties.get_mut(id) {
            Some(property) => {
                property.jump(value);
                true
            }
            None => false,
        }
    }

    /// Animate towards `value`, starting at the current time
    pub fn animate_to(&mut self, id: PropertyId, value: V, animation: Animation) -> bool {
        let time = self.current_time;
        match self.properties.get_mut(id) {
            Some(property) => {
                property.retarget(value, animation, time);
                true
            }
            None => false,
        }
    }

    /// Advance every property to `time`
    ///
    /// Time never runs backwards; an earlier `time` is treated as the last
    /// one seen. Returns whether anything is still animating.
    pub fn tick(&mut self, time: f64) -> bool {
        let time = if time < self.current_time {
            trace!(
                requested = time,
                current = self.current_time,
                "ignoring backwards tick"
            );
            self.current_time
        } else {
            time
        };
        self.current_time = time;

        for (_, property) in self.properties.iter_mut() {
            property.tick(time);
        }
        self.has_active_animations()
    }

    /// Value currently presented
    pub fn value(&self, id: PropertyId) -> Option<V> {
        self.properties
            .get(id)
            .map(|property| property.presentation.clone())
    }

    /// Value the property is animating towards
    pub fn model_value(&self, id: PropertyId) -> Option<V> {
        self.properties.get(id).map(|property| property.model.clone())
    }

    /// Sum of the velocities reported by the running animations
    pub fn velocity(&self, id: PropertyId) -> Option<V> {
        self.properties
            .get(id)
            .map(|property| property.velocity(self.current_time))
    }

    pub fn is_animating(&self, id: PropertyId) -> bool {
        self.properties
            .get(id)
            .is_some_and(AnimatedProperty::is_animating)
    }

    pub fn is_logically_complete(&self, id: PropertyId) -> bool {
        self.properties
            .get(id)
            .map_or(true, AnimatedProperty::is_logically_complete)
    }

    pub fn has_active_animations(&self) -> bool {
        self.properties.values().any(AnimatedProperty::is_animating)
    }

    pub fn properties_iter(&self) -> impl Iterator<Item = (PropertyId, &AnimatedProperty<V>)> {
        self.properties.iter()
    }

    pub fn property_count(&self) -> usize {
        self.properties.len()
    }
}

impl<V: VectorArithmetic> Default for AnimationScheduler<V> {
    fn default() -> Self {
        Self::new()
    }
}
