//! Vector-space arithmetic for animatable values
//!
//! Every spring operation is generic over [`VectorArithmetic`], so the same
//! evaluator drives scalars, points, sizes and rects.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// A type that can be animated by scaling and summing
pub trait VectorArithmetic:
    Clone
    + PartialEq
    + Debug
    + Add<Output = Self>
    + Sub<Output = Self>
    + AddAssign
    + SubAssign
    + 'static
{
    /// The additive identity
    fn zero() -> Self;

    /// Multiply every component by `rhs` in place
    fn scale(&mut self, rhs: f64);

    /// Return a copy with every component multiplied by `rhs`
    fn scaled(&self, rhs: f64) -> Self {
        let mut copy = self.clone();
        copy.scale(rhs);
        copy
    }

    /// Sum of the squared components
    fn magnitude_squared(&self) -> f64;
}

impl VectorArithmetic for f64 {
    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn scale(&mut self, rhs: f64) {
        *self *= rhs;
    }

    #[inline]
    fn magnitude_squared(&self) -> f64 {
        self * self
    }
}

impl VectorArithmetic for f32 {
    #[inline]
    fn zero() -> Self {
        0.0
    }

    // Scaling happens in f64 so that tiny sub-step factors keep precision.
    #[inline]
    fn scale(&mut self, rhs: f64) {
        *self = (*self as f64 * rhs) as f32;
    }

    #[inline]
    fn magnitude_squared(&self) -> f64 {
        let v = *self as f64;
        v * v
    }
}

/// A pair of animatable values, animated component-wise
///
/// Nest pairs to animate more than two components, e.g. a rect as
/// `AnimatablePair<AnimatablePair<f64, f64>, AnimatablePair<f64, f64>>`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimatablePair<A, B> {
    pub first: A,
    pub second: B,
}

impl<A, B> AnimatablePair<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A: VectorArithmetic, B: VectorArithmetic> Add for AnimatablePair<A, B> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            first: self.first + rhs.first,
            second: self.second + rhs.second,
        }
    }
}

impl<A: VectorArithmetic, B: VectorArithmetic> Sub for AnimatablePair<A, B> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            first: self.first - rhs.first,
            second: self.second - rhs.second,
        }
    }
}

impl<A: VectorArithmetic, B: VectorArithmetic> AddAssign for AnimatablePair<A, B> {
    fn add_assign(&mut self, rhs: Self) {
        self.first += rhs.first;
        self.second += rhs.second;
    }
}

impl<A: VectorArithmetic, B: VectorArithmetic> SubAssign for AnimatablePair<A, B> {
    fn sub_assign(&mut self, rhs: Self) {
        self.first -= rhs.first;
        self.second -= rhs.second;
    }
}

impl<A: VectorArithmetic, B: VectorArithmetic> VectorArithmetic for AnimatablePair<A, B> {
    fn zero() -> Self {
        Self {
            first: A::zero(),
            second: B::zero(),
        }
    }

    fn scale(&mut self, rhs: f64) {
        self.first.scale(rhs);
        self.second.scale(rhs);
    }

    fn magnitude_squared(&self) -> f64 {
        self.first.magnitude_squared() + self.second.magnitude_squared()
    }
}

/// A 2D point or size
pub type Vector2 = AnimatablePair<f64, f64>;

/// A rect as `(origin, size)`
pub type RectData = AnimatablePair<Vector2, Vector2>;
