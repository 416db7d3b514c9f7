//! Settling-duration parameterization
//!
//! Converting a settling duration into a spring has no closed form. The
//! natural frequency is found as the root of a regime-specific residual with
//! Newton-Raphson, first with a short aggressive pass and then, if that one
//! diverges, a longer pass from a gentler starting point.

use tracing::{debug, warn};

use crate::spring::Spring;

const MIN_SETTLING_DURATION: f64 = 0.01;
const MAX_SETTLING_DURATION: f64 = 10.0;

const FAST_PASS_GUESS: f64 = 5.0;
const FAST_PASS_ITERATIONS: usize = 12;
const SLOW_PASS_GUESS: f64 = 1.0;
const SLOW_PASS_ITERATIONS: usize = 20;

/// Outcome of a Newton-Raphson search
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct RootSearch {
    /// Last finite iterate
    pub root: f64,
    pub converged: bool,
}

/// Newton-Raphson iteration on `response`
///
/// Stops once a step after the second is within `tolerance`. A search whose
/// iterate becomes non-finite reports failure and keeps the last finite
/// iterate. Running out of iterations counts as success.
pub(crate) fn newton_raphson(
    response: impl Fn(f64) -> f64,
    derivative: impl Fn(f64) -> f64,
    initial: f64,
    max_iterations: usize,
    tolerance: f64,
) -> RootSearch {
    let mut x = initial;
    let mut previous_step = f64::INFINITY;

    for iteration in 0..max_iterations {
        let next = x - response(x) / derivative(x);
        if !next.is_finite() {
            return RootSearch {
                root: x,
                converged: false,
            };
        }

        let step = (next - x).abs();
        if iteration >= 2 && step <= tolerance {
            return RootSearch {
                root: next,
                converged: previous_step <= tolerance * 1e5,
            };
        }
        previous_step = step;
        x = next;
    }

    RootSearch {
        root: x,
        converged: true,
    }
}

impl Spring {
    /// Create a spring that settles within `epsilon` of its target after
    /// roughly `settling_duration` seconds
    ///
    /// `damping_ratio` is clamped to `[f64::EPSILON, 1]` and the duration to
    /// `[0.01, 10]` seconds. Over-damped settling springs are not supported.
    pub fn with_settling_duration(settling_duration: f64, damping_ratio: f64, epsilon: f64) -> Self {
        let damping_ratio = damping_ratio.clamp(f64::EPSILON, 1.0);
        let duration = if settling_duration.is_nan() {
            MIN_SETTLING_DURATION
        } else {
            settling_duration.clamp(MIN_SETTLING_DURATION, MAX_SETTLING_DURATION)
        };

        let root = if damping_ratio >= 1.0 {
            let response = |x: f64| {
                let threshold = if x < 0.0 { -epsilon } else { epsilon };
                let scaled = duration * x;
                (-scaled).exp() * (scaled + 1.0) - threshold
            };
            let derivative = |x: f64| -duration * duration * x / (duration * x).exp();
            find_natural_frequency(response, derivative, duration, epsilon)
        } else {
            let frequency_ratio = damping_ratio / (1.0 - damping_ratio * damping_ratio).sqrt();
            let damped_time = duration * damping_ratio;
            let response =
                |x: f64| epsilon - (frequency_ratio * (-damped_time * x).exp()).abs();
            let derivative =
                |x: f64| damped_time * frequency_ratio * (-damped_time * x).exp();
            find_natural_frequency(response, derivative, duration, epsilon)
        };

        let half = root * damping_ratio;
        let oscillation = (root * root - half * half).abs().sqrt();
        if root >= half {
            Self::from_parts(oscillation, half, 1.0)
        } else {
            Self::from_parts(0.0, root, 1.0)
        }
    }
}

/// Natural frequency at which the residual crosses zero, never negative
fn find_natural_frequency(
    response: impl Fn(f64) -> f64 + Copy,
    derivative: impl Fn(f64) -> f64 + Copy,
    duration: f64,
    epsilon: f64,
) -> f64 {
    let fast = newton_raphson(
        response,
        derivative,
        FAST_PASS_GUESS / duration,
        FAST_PASS_ITERATIONS,
        epsilon,
    );
    let search = if fast.converged {
        fast
    } else {
        debug!(
            duration,
            root = fast.root,
            "settling-duration fast pass diverged, retrying"
        );
        let slow = newton_raphson(
            response,
            derivative,
            SLOW_PASS_GUESS / duration,
            SLOW_PASS_ITERATIONS,
            epsilon,
        );
        if !slow.converged {
            warn!(
                duration,
                root = slow.root,
                "settling-duration root search did not converge; using last iterate"
            );
        }
        slow
    };

    if search.root.is_finite() {
        search.root.max(0.0)
    } else {
        0.0
    }
}
