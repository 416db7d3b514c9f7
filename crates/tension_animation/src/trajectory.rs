//! Closed-form spring trajectories and settling estimates
//!
//! Every evaluation describes a spring released at the origin with some
//! initial velocity and pulled towards `target`. Callers that need to move
//! from an arbitrary position use [`Spring::update`], which re-bases the
//! problem on the remaining distance each step.

use std::f64::consts::TAU;

use tension_core::VectorArithmetic;

use crate::spring::Spring;

/// Step between samples of the settling scan, in seconds
const SETTLING_SCAN_STEP: f64 = 0.1;

/// Upper bound on settling scan samples
const SETTLING_SCAN_SAMPLES: usize = 1024;

/// How long a sample must stay within epsilon before the scan accepts it
const SETTLING_HOLD: f64 = 1.0;

impl Spring {
    /// Position at `time` of a spring driven from rest at the origin towards `target`
    pub fn value<V: VectorArithmetic>(&self, target: V, initial_velocity: V, time: f64) -> V {
        if self.is_instant() {
            return if time > 0.0 { target } else { V::zero() };
        }
        let omega = self.angular_frequency;
        let decay = self.decay_constant;

        if omega > 0.0 {
            let sin = (omega * time).sin();
            let cos = (omega * time).cos();
            let displacement = (target.scaled(decay) - initial_velocity).scaled(sin / omega)
                + target.scaled(cos);
            target - displacement.scaled((-decay * time).exp())
        } else if omega < 0.0 {
            let first_rate = -omega - decay;
            let second_rate = omega - decay;
            let first_mode = (first_rate * time).exp();
            let second_mode = (second_rate * time).exp();

            let position_factor =
                ((decay - omega) * first_mode + first_rate * second_mode) / (omega * 2.0) + 1.0;
            let velocity_factor = (first_mode - second_mode) / (omega * 2.0);
            target.scaled(position_factor) - initial_velocity.scaled(velocity_factor)
        } else {
            let displacement =
                target.clone() + (target.scaled(decay) - initial_velocity).scaled(time);
            target - displacement.scaled((-decay * time).exp())
        }
    }

    /// Velocity at `time`, the exact derivative of [`Spring::value`]
    pub fn velocity<V: VectorArithmetic>(&self, target: V, initial_velocity: V, time: f64) -> V {
        if self.is_instant() {
            return V::zero();
        }
        let omega = self.angular_frequency;
        let decay = self.decay_constant;

        if omega > 0.0 {
            let envelope = (-decay * time).exp();
            let sin = (omega * time).sin();
            let cos = (omega * time).cos();

            let target_term = target.scaled((omega * sin + decay * cos) * envelope);
            let displacement_factor = (decay * sin - omega * cos) * envelope / omega;
            (target.scaled(decay) - initial_velocity).scaled(displacement_factor) + target_term
        } else if omega < 0.0 {
            let first_rate = -omega - decay;
            let second_rate = omega - decay;
            let first_mode = first_rate * (first_rate * time).exp();
            let second_mode = second_rate * (second_rate * time).exp();

            let position_factor =
                ((decay - omega) * first_mode + first_rate * second_mode) / (omega * 2.0);
            let velocity_factor = (first_mode - second_mode) / (omega * 2.0);
            target.scaled(position_factor) - initial_velocity.scaled(velocity_factor)
        } else {
            let envelope = (-decay * time).exp();
            let time_factor = (decay * time - 1.0) * envelope;
            let velocity_delta = target.scaled(decay) - initial_velocity;
            velocity_delta.scaled(time_factor) + target.scaled(decay * envelope)
        }
    }

    /// Advance `value` and `velocity` towards `target` by `delta_time`
    pub fn update<V: VectorArithmetic>(
        &self,
        value: &mut V,
        velocity: &mut V,
        target: V,
        delta_time: f64,
    ) {
        let delta = target - value.clone();
        let next_velocity = self.velocity(delta.clone(), velocity.clone(), delta_time);
        let moved = self.value(delta, velocity.clone(), delta_time);
        *velocity = next_velocity;
        *value += moved;
    }

    /// Net force on a body at `position` moving with `velocity`
    ///
    /// In units of the vector type per second squared.
    pub fn force<V: VectorArithmetic>(&self, target: V, position: V, velocity: V) -> V {
        let damping_force = velocity.scaled(-self.decay_constant * 2.0 * self.mass);
        let spring_force = (target - position).scaled(self.stiffness());
        spring_force + damping_force
    }

    /// Settling duration for a unit target from rest, with epsilon 0.001
    pub fn settling_duration(&self) -> f64 {
        self.settling_duration_for(1.0f64, 0.0, 0.001)
    }

    /// Estimated time after which the trajectory stays within `epsilon` of `target`
    pub fn settling_duration_for<V: VectorArithmetic>(
        &self,
        target: V,
        initial_velocity: V,
        epsilon: f64,
    ) -> f64 {
        if self.decay_constant == 0.0 {
            return f64::INFINITY;
        }
        if self.is_instant() {
            return 0.0;
        }

        if self.angular_frequency <= 0.0 {
            return scan_settling_time(epsilon, |time| {
                let diff = self.value(target.clone(), initial_velocity.clone(), time) - target.clone();
                diff.magnitude_squared().sqrt()
            });
        }

        let magnitude = (target.scaled(self.decay_constant) - initial_velocity)
            .magnitude_squared()
            .sqrt()
            + target.magnitude_squared().sqrt();
        let settling_time = -(epsilon / magnitude).ln() / self.decay_constant;
        settling_time.max(0.0)
    }

    /// Period of one oscillation, or `None` when the spring does not oscillate
    pub fn oscillation_period(&self) -> Option<f64> {
        (self.angular_frequency > 0.0).then(|| TAU / self.angular_frequency)
    }
}

/// Outcome of a settling scan
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum SettlingScan {
    /// Within epsilon from this time on, for at least the hold period
    Settled(f64),
    /// Samples ran out; carries the time of the smallest distance seen
    Exhausted(f64),
    NonFinite,
}

impl SettlingScan {
    /// Settling time, or 0 when the scan did not settle
    pub(crate) fn settled_or_zero(self) -> f64 {
        match self {
            SettlingScan::Settled(time) => time,
            SettlingScan::Exhausted(_) | SettlingScan::NonFinite => 0.0,
        }
    }

    /// Settling time, falling back to the closest approach when samples ran out
    pub(crate) fn settled_or_closest(self) -> f64 {
        match self {
            SettlingScan::Settled(time) | SettlingScan::Exhausted(time) => time.max(0.0),
            SettlingScan::NonFinite => 0.0,
        }
    }
}

/// Scan forward in fixed steps for the first time `distance` drops below
/// `epsilon` and stays there for [`SETTLING_HOLD`] seconds
pub(crate) fn scan_settling(epsilon: f64, distance: impl Fn(f64) -> f64) -> SettlingScan {
    let mut best_time = -1.0;
    let mut best_distance = f64::INFINITY;
    let mut time = 0.0;

    for _ in 0..SETTLING_SCAN_SAMPLES {
        let current = distance(time);
        if !current.is_finite() {
            return SettlingScan::NonFinite;
        }

        if best_distance >= epsilon {
            if current < best_distance {
                best_time = time;
                best_distance = current;
            }
        } else if current >= epsilon {
            best_distance = f64::INFINITY;
        } else if time - best_time > SETTLING_HOLD {
            return SettlingScan::Settled(best_time);
        }

        time += SETTLING_SCAN_STEP;
    }
    SettlingScan::Exhausted(best_time)
}

/// [`scan_settling`], reporting 0 for a scan that never settles
pub(crate) fn scan_settling_time(epsilon: f64, distance: impl Fn(f64) -> f64) -> f64 {
    scan_settling(epsilon, distance).settled_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tension_core::Vector2;

    fn springs() -> Vec<Spring> {
        vec![
            Spring::new(0.5, 0.3),
            Spring::new(0.5, 0.0),
            Spring::new(0.5, -0.4),
            Spring::with_physics(1.0, 200.0, 10.0, false),
            Spring::with_physics(2.0, 50.0, 60.0, true),
            Spring::with_response(0.35, 0.7),
        ]
    }

    #[test]
    fn test_starts_at_origin() {
        for spring in springs() {
            assert!(spring.value::<f64>(1.0, 0.0, 0.0).abs() < 1e-12, "{spring:?}");
            assert!(spring.value::<f64>(3.0, 2.0, 0.0).abs() < 1e-12, "{spring:?}");
        }
    }

    #[test]
    fn test_initial_velocity_is_preserved() {
        for spring in springs() {
            let v = spring.velocity::<f64>(1.0, 4.0, 0.0);
            assert!((v - 4.0).abs() < 1e-9, "{spring:?} gave {v}");
        }
    }

    #[test]
    fn test_velocity_matches_finite_difference() {
        let h = 1e-5;
        for spring in springs() {
            for &t in &[0.05, 0.2, 0.4, 0.9] {
                let numeric = (spring.value(1.0, 0.5, t + h) - spring.value(1.0, 0.5, t - h)) / (2.0 * h);
                let analytic = spring.velocity(1.0, 0.5, t);
                assert!(
                    (numeric - analytic).abs() < 1e-3,
                    "{spring:?} at {t}: {numeric} vs {analytic}"
                );
            }
        }
    }

    #[test]
    fn test_value_satisfies_equation_of_motion() {
        // x'' = force / m for a body released at the origin
        let h = 1e-4;
        for spring in springs() {
            let t = 0.3;
            let x = spring.value(1.0, 0.0, t);
            let v = spring.velocity(1.0, 0.0, t);
            let a = (spring.velocity(1.0, 0.0, t + h) - spring.velocity(1.0, 0.0, t - h)) / (2.0 * h);
            let expected = spring.force(1.0, x, v) / spring.mass();
            assert!((a - expected).abs() < 1e-2 * expected.abs().max(1.0), "{spring:?}");
        }
    }

    #[test]
    fn test_update_matches_closed_form() {
        let spring = Spring::new(0.4, 0.2);
        let mut value = 0.0f64;
        let mut velocity = 0.0f64;
        for _ in 0..30 {
            spring.update(&mut value, &mut velocity, 10.0, 1.0 / 60.0);
        }
        let expected = spring.value(10.0, 0.0, 0.5);
        let expected_velocity = spring.velocity(10.0, 0.0, 0.5);
        assert!((value - expected).abs() < 1e-9);
        assert!((velocity - expected_velocity).abs() < 1e-9);
    }

    #[test]
    fn test_force_at_rest_on_target_is_zero() {
        let spring = Spring::default();
        assert_eq!(spring.force(5.0, 5.0, 0.0), 0.0);

        let pushed = spring.force(Vector2::new(1.0, 0.0), Vector2::zero(), Vector2::new(0.0, 1.0));
        assert!((pushed.first - spring.stiffness()).abs() < 1e-9);
        assert!((pushed.second + spring.damping()).abs() < 1e-9);
    }

    #[test]
    fn test_settles_within_epsilon() {
        for spring in springs() {
            let settle = spring.settling_duration_for(1.0, 0.0, 0.001);
            assert!(settle.is_finite() && settle > 0.0, "{spring:?}");
            let value = spring.value::<f64>(1.0, 0.0, settle);
            assert!((value - 1.0).abs() <= 0.001, "{spring:?} at {settle}: {value}");
        }
    }

    #[test]
    fn test_settling_edge_cases() {
        assert_eq!(
            Spring::with_physics(1.0, 0.0, 0.0, false).settling_duration(),
            f64::INFINITY
        );
        assert_eq!(Spring::instant().settling_duration(), 0.0);
        assert_eq!(Spring::new(0.5, 0.3).settling_duration_for(0.0, 0.0, 0.001), 0.0);
    }

    #[test]
    fn test_instant_spring_jumps() {
        let spring = Spring::instant();
        assert_eq!(spring.value(7.0, 0.0, 0.0), 0.0);
        assert_eq!(spring.value(7.0, 0.0, 0.001), 7.0);
        assert_eq!(spring.velocity(7.0, 3.0, 0.5), 0.0);
    }

    #[test]
    fn test_vector_values_move_component_wise() {
        let spring = Spring::new(0.5, 0.15);
        let target = Vector2::new(10.0, -4.0);
        let value = spring.value(target, Vector2::zero(), 0.2);
        assert!((value.first - spring.value(10.0, 0.0, 0.2)).abs() < 1e-12);
        assert!((value.second - spring.value(-4.0, 0.0, 0.2)).abs() < 1e-12);
    }

    #[test]
    fn test_scan_gives_up_on_non_finite_samples() {
        assert_eq!(scan_settling_time(0.001, |_| f64::NAN), 0.0);
        assert_eq!(scan_settling_time(0.001, |_| 1.0), 0.0);
    }

    #[test]
    fn test_exhausted_scan_keeps_closest_approach() {
        let slow = |time: f64| (-time * 0.01).exp();
        let scan = scan_settling(0.001, slow);
        let SettlingScan::Exhausted(closest) = scan else {
            panic!("expected the scan to run out, got {scan:?}");
        };
        assert!(closest > 100.0, "closest {closest}");
        assert_eq!(scan.settled_or_zero(), 0.0);
        assert_eq!(scan.settled_or_closest(), closest);

        assert_eq!(scan_settling(0.001, |_| f64::NAN).settled_or_closest(), 0.0);
    }
}
