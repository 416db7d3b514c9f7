//! Easing curves for timing-curve animations

use serde::{Deserialize, Serialize};

/// Maps linear progress in `[0, 1]` to eased progress
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,
    /// CSS `ease-in`, `cubic-bezier(0.42, 0, 1, 1)`
    EaseIn,
    /// CSS `ease-out`, `cubic-bezier(0, 0, 0.58, 1)`
    EaseOut,
    /// CSS `ease-in-out`, `cubic-bezier(0.42, 0, 0.58, 1)`
    EaseInOut,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    /// Control points `(x1, y1, x2, y2)` of a unit cubic bezier
    CubicBezier(f64, f64, f64, f64),
}

impl Easing {
    /// Eased progress at linear progress `t`, clamped to `[0, 1]`
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => cubic_bezier_ease(t, 0.42, 0.0, 1.0, 1.0),
            Easing::EaseOut => cubic_bezier_ease(t, 0.0, 0.0, 0.58, 1.0),
            Easing::EaseInOut => cubic_bezier_ease(t, 0.42, 0.0, 0.58, 1.0),
            Easing::EaseInQuad => t * t,
            Easing::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::EaseInCubic => t * t * t,
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier_ease(t, *x1, *y1, *x2, *y2),
        }
    }

    /// Derivative of [`Easing::apply`] with respect to `t`
    pub fn velocity(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => 1.0,
            Easing::EaseIn => cubic_bezier_slope(t, 0.42, 0.0, 1.0, 1.0),
            Easing::EaseOut => cubic_bezier_slope(t, 0.0, 0.0, 0.58, 1.0),
            Easing::EaseInOut => cubic_bezier_slope(t, 0.42, 0.0, 0.58, 1.0),
            Easing::EaseInQuad => 2.0 * t,
            Easing::EaseOutQuad => 2.0 * (1.0 - t),
            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    4.0 * t
                } else {
                    2.0 * (-2.0 * t + 2.0)
                }
            }
            Easing::EaseInCubic => 3.0 * t * t,
            Easing::EaseOutCubic => 3.0 * (1.0 - t).powi(2),
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    12.0 * t * t
                } else {
                    3.0 * (-2.0 * t + 2.0).powi(2)
                }
            }
            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier_slope(t, *x1, *y1, *x2, *y2),
        }
    }
}

/// Cubic bezier easing, matching browser implementations
fn cubic_bezier_ease(x: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    // Endpoints are always exact
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    bezier_sample(solve_parameter(x, x1, x2), y1, y2)
}

/// dy/dx of a cubic bezier easing at `x`
fn cubic_bezier_slope(x: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let p = solve_parameter(x, x1, x2);
    let dx = bezier_slope(p, x1, x2);
    let dy = bezier_slope(p, y1, y2);
    if dx.abs() < 1e-12 {
        return if dy == 0.0 { 0.0 } else { dy.signum() * f64::MAX };
    }
    dy / dx
}

/// Parameter `p` where the curve's x coordinate equals `x`
///
/// Newton-Raphson first, then bisection if the slope flattens out.
fn solve_parameter(x: f64, x1: f64, x2: f64) -> f64 {
    let mut p = x;
    for _ in 0..8 {
        let err = bezier_sample(p, x1, x2) - x;
        if err.abs() < 1e-12 {
            return p;
        }
        let slope = bezier_slope(p, x1, x2);
        if slope.abs() < 1e-12 {
            break;
        }
        p -= err / slope;
    }

    let mut lo = 0.0_f64;
    let mut hi = 1.0_f64;
    p = x;
    for _ in 0..48 {
        let val = bezier_sample(p, x1, x2);
        if (val - x).abs() < 1e-12 {
            break;
        }
        if val < x {
            lo = p;
        } else {
            hi = p;
        }
        p = (lo + hi) * 0.5;
    }
    p
}

/// B(t) = 3(1-t)²t·p1 + 3(1-t)t²·p2 + t³
#[inline]
fn bezier_sample(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    ((a * t + b) * t + c) * t
}

/// B'(t)
#[inline]
fn bezier_slope(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    (3.0 * a * t + 2.0 * b) * t + c
}
