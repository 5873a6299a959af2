use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// A simple 2D vector value type. All angles are in radians.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    /// Creates a new Vec2.
    #[inline(always)]
    pub const fn new(x: f64, y: f64) -> Self {
        Vec2 { x, y }
    }

    /// Creates a zero vector.
    #[inline(always)]
    pub const fn zero() -> Self {
        Vec2 { x: 0.0, y: 0.0 }
    }

    /// Calculates the dot product with another vector.
    #[inline(always)]
    pub fn dot(self, other: Vec2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    #[inline(always)]
    pub fn magnitude_squared(self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// Length of the vector, `sqrt(x² + y²)`.
    #[inline(always)]
    pub fn magnitude(self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    /// Angle the vector makes with the +x axis.
    /// Uses atan2 for quadrant correctness.
    #[inline(always)]
    pub fn angle(self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Returns the unit vector pointing the same way.
    /// A zero-length vector has no direction and normalizes to the zero vector.
    pub fn normalize(self) -> Self {
        let len = self.magnitude();
        if len > 0.0 {
            self / len
        } else {
            Vec2::zero()
        }
    }

    /// The vector rotated 90° counter-clockwise: `(-y, x)`.
    #[inline(always)]
    pub fn normal(self) -> Self {
        Vec2::new(-self.y, self.x)
    }

    /// `(y, -x)`
    #[inline(always)]
    pub fn tangent(self) -> Self {
        Vec2::new(self.y, -self.x)
    }

    /// Applies the standard 2D rotation matrix for `angle`.
    pub fn rotate(self, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Vec2::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    /// Calculates the distance to another vector (point).
    #[inline(always)]
    pub fn distance_to(self, other: Vec2) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Calculates the squared distance to another vector (point).
    #[inline(always)]
    pub fn distance_squared(self, other: Vec2) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Linear interpolation, `self·(1-t) + other·t`.
    pub fn lerp(self, other: Vec2, t: f64) -> Self {
        self * (1.0 - t) + other * t
    }

    /// Computes `rotate(angle) + pivot - self`.
    pub fn rotate_around(self, pivot: Vec2, angle: f64) -> Self {
        self.rotate(angle) + pivot - self
    }

    /// Unsigned angle between two vectors in `[0, π]`.
    ///
    /// The cosine is clamped to `[-1, 1]` so rounding on (anti)parallel inputs
    /// cannot push `acos` out of its domain. Returns 0.0 when either vector has
    /// zero length.
    pub fn angle_between(self, other: Vec2) -> f64 {
        let denom = self.magnitude() * other.magnitude();
        if denom == 0.0 {
            return 0.0;
        }
        (self.dot(other) / denom).clamp(-1.0, 1.0).acos()
    }
}

// Implement standard operators for convenience
impl Add for Vec2 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self { x: self.x + other.x, y: self.y + other.y }
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self { x: self.x - other.x, y: self.y - other.y }
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
    }
}

impl Neg for Vec2 {
    type Output = Self;
    fn neg(self) -> Self {
        Self { x: -self.x, y: -self.y }
    }
}

impl Mul<f64> for Vec2 {
    type Output = Self;
    fn mul(self, scalar: f64) -> Self {
        Self { x: self.x * scalar, y: self.y * scalar }
    }
}

impl Mul<Vec2> for f64 {
    type Output = Vec2;
    fn mul(self, v: Vec2) -> Vec2 {
        v * self
    }
}

// Element-wise
impl Mul for Vec2 {
    type Output = Self;
    fn mul(self, other: Self) -> Self {
        Self { x: self.x * other.x, y: self.y * other.y }
    }
}

impl Div<f64> for Vec2 {
    type Output = Self;
    fn div(self, scalar: f64) -> Self {
        Self { x: self.x / scalar, y: self.y / scalar }
    }
}

// Element-wise
impl Div for Vec2 {
    type Output = Self;
    fn div(self, other: Self) -> Self {
        Self { x: self.x / other.x, y: self.y / other.y }
    }
}

impl From<(f64, f64)> for Vec2 {
    fn from((x, y): (f64, f64)) -> Self {
        Vec2::new(x, y)
    }
}

impl From<[f64; 2]> for Vec2 {
    fn from([x, y]: [f64; 2]) -> Self {
        Vec2::new(x, y)
    }
}

impl From<Vec2> for (f64, f64) {
    fn from(v: Vec2) -> Self {
        (v.x, v.y)
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    const EPS: f64 = 1e-9;

    fn assert_vec_close(a: Vec2, b: Vec2) {
        assert!(
            (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS,
            "expected {} ~= {}",
            a,
            b
        );
    }

    #[test]
    fn rotate_round_trip_restores_vector() {
        let samples = [
            Vec2::new(3.0, 4.0),
            Vec2::new(-12.5, 0.25),
            Vec2::new(0.0, -7.0),
            Vec2::new(1e3, -1e3),
        ];
        for v in samples {
            for theta in [0.0, 0.3, FRAC_PI_2, PI, -2.1, 5.0] {
                assert_vec_close(v.rotate(theta).rotate(-theta), v);
            }
        }
    }

    #[test]
    fn rotate_quarter_turn_matches_normal() {
        let v = Vec2::new(2.0, 1.0);
        assert_vec_close(v.rotate(FRAC_PI_2), v.normal());
        assert_vec_close(v.rotate(-FRAC_PI_2), v.tangent());
    }

    #[test]
    fn normalize_has_unit_length() {
        for v in [Vec2::new(3.0, 4.0), Vec2::new(-0.001, 0.002), Vec2::new(0.0, 9.8)] {
            assert!((v.normalize().magnitude() - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn normalize_zero_vector_is_zero() {
        let n = Vec2::zero().normalize();
        assert_eq!(n, Vec2::zero());
        assert!(!n.x.is_nan() && !n.y.is_nan());
    }

    #[test]
    fn dot_is_symmetric() {
        let a = Vec2::new(1.5, -2.0);
        let b = Vec2::new(-4.0, 0.75);
        assert_eq!(a.dot(b), b.dot(a));
        assert_eq!(a.dot(b), -6.0 - 1.5);
    }

    #[test]
    fn magnitude_and_angle() {
        let v = Vec2::new(3.0, 4.0);
        assert_eq!(v.magnitude(), 5.0);
        assert!((Vec2::new(0.0, 1.0).angle() - FRAC_PI_2).abs() < EPS);
        assert_eq!(Vec2::zero().angle(), 0.0);
    }

    #[test]
    fn distances() {
        let a = Vec2::new(1.0, 1.0);
        let b = Vec2::new(4.0, 5.0);
        assert_eq!(a.distance_to(b), 5.0);
        assert_eq!(a.distance_squared(b), 25.0);
    }

    #[test]
    fn lerp_endpoints_and_midpoint() {
        let a = Vec2::new(0.0, 10.0);
        let b = Vec2::new(10.0, 0.0);
        assert_vec_close(a.lerp(b, 0.0), a);
        assert_vec_close(a.lerp(b, 1.0), b);
        assert_vec_close(a.lerp(b, 0.5), Vec2::new(5.0, 5.0));
    }

    #[test]
    fn rotate_around_uses_pivot_offset() {
        let v = Vec2::new(1.0, 0.0);
        let pivot = Vec2::new(2.0, 3.0);
        // rotate(π/2) = (0, 1); (0, 1) + (2, 3) - (1, 0) = (1, 4)
        assert_vec_close(v.rotate_around(pivot, FRAC_PI_2), Vec2::new(1.0, 4.0));
    }

    #[test]
    fn angle_between_handles_parallel_and_zero() {
        let a = Vec2::new(0.1, 0.7);
        let parallel = a.angle_between(a * 3.0);
        assert!(!parallel.is_nan());
        assert!(parallel.abs() < 1e-7);
        assert!((a.angle_between(-a) - PI).abs() < 1e-7);
        assert!((Vec2::new(1.0, 0.0).angle_between(Vec2::new(0.0, 2.0)) - FRAC_PI_2).abs() < EPS);
        assert_eq!(a.angle_between(Vec2::zero()), 0.0);
    }

    #[test]
    fn elementwise_operators() {
        let a = Vec2::new(2.0, 6.0);
        let b = Vec2::new(4.0, 3.0);
        assert_eq!(a * b, Vec2::new(8.0, 18.0));
        assert_eq!(a / b, Vec2::new(0.5, 2.0));
        assert_eq!(2.0 * a, a * 2.0);
        assert_eq!(a / 2.0, Vec2::new(1.0, 3.0));
        assert_eq!(-a, Vec2::new(-2.0, -6.0));
    }

    #[test]
    fn display_formats_as_pair() {
        assert_eq!(Vec2::new(1.5, -2.0).to_string(), "(1.5, -2)");
    }
}
