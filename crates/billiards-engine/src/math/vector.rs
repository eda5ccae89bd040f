use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// 2D vector value type. Every operation returns a new value.
///
/// Kept separate from `glam::Vec2` so normalization can be fallible;
/// converts both ways for anything glam does better.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vector2D {
    pub x: f32,
    pub y: f32,
}

impl Vector2D {
    pub const ZERO: Vector2D = Vector2D::new(0.0, 0.0);
    pub const ONE: Vector2D = Vector2D::new(1.0, 1.0);

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn scale(self, scalar: f32) -> Self {
        Self::new(self.x * scalar, self.y * scalar)
    }

    pub fn magnitude(self) -> f32 {
        self.x.hypot(self.y)
    }

    pub fn magnitude_squared(self) -> f32 {
        self.dot(self)
    }

    /// Unit vector in the same direction.
    /// Fails with [`SimError::ZeroVector`] when the magnitude is exactly zero.
    pub fn normalize(self) -> Result<Self> {
        let mag = self.magnitude();
        if mag == 0.0 {
            return Err(SimError::ZeroVector);
        }
        Ok(self.scale(1.0 / mag))
    }

    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    pub fn distance(self, other: Self) -> f32 {
        (self - other).magnitude()
    }

    /// Component-wise product, used to apply wall reflection vectors.
    pub fn mul_components(self, other: Self) -> Self {
        Self::new(self.x * other.x, self.y * other.y)
    }

    /// Same direction, magnitude capped at `max`.
    pub fn clamp_length(self, max: f32) -> Self {
        Vec2::from(self).clamp_length_max(max).into()
    }
}

impl From<Vec2> for Vector2D {
    fn from(v: Vec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Vector2D> for Vec2 {
    fn from(v: Vector2D) -> Self {
        Vec2::new(v.x, v.y)
    }
}

impl Add for Vector2D {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Vector2D {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f32> for Vector2D {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        self.scale(scalar)
    }
}

impl Neg for Vector2D {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl AddAssign for Vector2D {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl SubAssign for Vector2D {
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl fmt::Display for Vector2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-6;

    #[test]
    fn arithmetic() {
        let a = Vector2D::new(3.0, 4.0);
        let b = Vector2D::new(1.0, 2.0);
        assert_eq!(a + b, Vector2D::new(4.0, 6.0));
        assert_eq!(a - b, Vector2D::new(2.0, 2.0));
        assert_eq!(a * 2.0, Vector2D::new(6.0, 8.0));
        assert_eq!(-b, Vector2D::new(-1.0, -2.0));
        assert_eq!(a.dot(b), 11.0);
    }

    #[test]
    fn magnitude_and_normalize() {
        let a = Vector2D::new(3.0, 4.0);
        assert_eq!(a.magnitude(), 5.0);
        let n = a.normalize().unwrap();
        assert!((n.x - 0.6).abs() < EPS);
        assert!((n.y - 0.8).abs() < EPS);
    }

    #[test]
    fn normalize_zero_is_error() {
        assert!(matches!(Vector2D::ZERO.normalize(), Err(SimError::ZeroVector)));
    }

    #[test]
    fn clamp_length_keeps_direction() {
        let v = Vector2D::new(30.0, 40.0).clamp_length(5.0);
        assert!((v.magnitude() - 5.0).abs() < 1e-4);
        assert!((v.x - 3.0).abs() < 1e-4);

        let short = Vector2D::new(1.0, 1.0);
        assert_eq!(short.clamp_length(5.0), short);
    }

    #[test]
    fn reflection_by_components() {
        let v = Vector2D::new(2.0, -3.0);
        assert_eq!(v.mul_components(Vector2D::new(-1.0, 1.0)), Vector2D::new(-2.0, -3.0));
    }

    #[test]
    fn glam_round_trip() {
        let v = Vector2D::new(1.5, -2.5);
        let g: Vec2 = v.into();
        assert_eq!(Vector2D::from(g), v);
    }
}
