//! Single-step exponential smoothing.
//!
//! Each [`Smoothed`] channel moves a fraction `alpha` of the remaining gap
//! toward its target per tick:
//!
//! ```text
//! value += (target - value) * alpha
//! ```
//!
//! After `n` ticks at a constant target `T` starting from `V0` the value is
//! `T - (T - V0) * (1 - alpha)^n`.  For `0 < alpha < 1` the approach is
//! monotone and never overshoots; `alpha == 1` jumps straight to the target.

use std::fmt;
use std::ops::{Add, Mul, Sub};

use glam::Vec3;

/// Alpha must lie in (0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SmoothingError {
    AlphaOutOfRange(f32),
}

impl fmt::Display for SmoothingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SmoothingError::AlphaOutOfRange(a) => {
                write!(f, "smoothing alpha {} is outside (0, 1]", a)
            }
        }
    }
}

impl std::error::Error for SmoothingError {}

pub fn check_alpha(alpha: f32) -> Result<f32, SmoothingError> {
    if alpha > 0.0 && alpha <= 1.0 {
        Ok(alpha)
    } else {
        Err(SmoothingError::AlphaOutOfRange(alpha))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Smoothed<T>
// ════════════════════════════════════════════════════════════════════════════

/// A target/value pair advanced once per tick.
///
/// `T` is any linear quantity: `f32` for orbit angles and distance, `Vec3`
/// for the cursor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Smoothed<T> {
    value:  T,
    target: T,
    alpha:  f32,
}

impl<T> Smoothed<T>
where
    T: Copy + Add<Output = T> + Sub<Output = T> + Mul<f32, Output = T>,
{
    /// Start at rest on `initial`.
    pub fn new(initial: T, alpha: f32) -> Result<Self, SmoothingError> {
        Ok(Smoothed { value: initial, target: initial, alpha: check_alpha(alpha)? })
    }

    pub fn value(&self)  -> T   { self.value }
    pub fn target(&self) -> T   { self.target }
    pub fn alpha(&self)  -> f32 { self.alpha }

    pub fn set_target(&mut self, target: T) {
        self.target = target;
    }

    /// Advance one tick and return the new value.
    pub fn step(&mut self) -> T {
        self.value = self.value + (self.target - self.value) * self.alpha;
        self.value
    }

    /// Overwrite both value and target.
    pub fn reset(&mut self, at: T) {
        self.value = at;
        self.target = at;
    }

    /// Mutate the current value in place, e.g. to clamp it.
    pub fn map_value(&mut self, f: impl FnOnce(T) -> T) {
        self.value = f(self.value);
    }
}

impl Smoothed<f32> {
    pub fn is_settled(&self, epsilon: f32) -> bool {
        (self.target - self.value).abs() < epsilon
    }
}

impl Smoothed<Vec3> {
    pub fn is_settled(&self, epsilon: f32) -> bool {
        self.target.distance(self.value) < epsilon
    }
}

/// Value after `n` ticks at constant `target` from `initial`.
pub fn value_after(initial: f32, target: f32, alpha: f32, n: u32) -> f32 {
    target - (target - initial) * (1.0 - alpha).powi(n as i32)
}

/// Ticks needed for a gap of `gap` to shrink below `epsilon`.
///
/// Returns 0 when the gap is already inside `epsilon`.
pub fn ticks_to_settle(gap: f32, alpha: f32, epsilon: f32) -> u32 {
    let gap = gap.abs();
    if gap < epsilon {
        return 0;
    }
    if alpha >= 1.0 {
        return 1;
    }
    // gap * (1 - alpha)^n < epsilon  ⇔  n > ln(epsilon / gap) / ln(1 - alpha)
    let n = ((epsilon / gap).ln() / (1.0 - alpha).ln()).floor() as u32 + 1;
    n.max(1)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
