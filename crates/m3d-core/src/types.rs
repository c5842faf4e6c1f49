//! Common math types used across m3d
//!
//! All values are `f64` so printed output matches the precision of the
//! host application's scripting layer.

use serde::{Deserialize, Serialize};

/// 3D vector (position, normal, scale)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };
    pub const ONE: Self = Self { x: 1.0, y: 1.0, z: 1.0 };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Multiply every component by `factor`
    pub fn scale(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor, self.z * factor)
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

impl Default for Vec3 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

/// Component-wise division
impl std::ops::Div for Vec3 {
    type Output = Self;

    fn div(self, other: Self) -> Self {
        Self::new(self.x / other.x, self.y / other.y, self.z / other.z)
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl From<Vec3> for [f64; 3] {
    fn from(v: Vec3) -> Self {
        v.to_array()
    }
}

/// Euler angles in radians, one per axis
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Euler {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Euler {
    pub const IDENTITY: Self = Self { x: 0.0, y: 0.0, z: 0.0 };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl std::ops::Sub for Euler {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl From<[f64; 3]> for Euler {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl From<Euler> for [f64; 3] {
    fn from(e: Euler) -> Self {
        [e.x, e.y, e.z]
    }
}

/// Rotation quaternion, stored in (w, x, y, z) output order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quat {
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Quat {
    pub const IDENTITY: Self = Self { w: 1.0, x: 0.0, y: 0.0, z: 0.0 };

    pub const fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self { w, x, y, z }
    }

    pub fn norm(&self) -> f64 {
        (self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Linear RGB colour, 0.0-1.0 per channel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const WHITE: Self = Self { r: 1.0, g: 1.0, b: 1.0 };
    pub const BLACK: Self = Self { r: 0.0, g: 0.0, b: 0.0 };

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Multiply every channel by `factor`
    pub fn scale(self, factor: f64) -> Self {
        Self::new(self.r * factor, self.g * factor, self.b * factor)
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<[f64; 3]> for Rgb {
    fn from(c: [f64; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

impl From<Rgb> for [f64; 3] {
    fn from(c: Rgb) -> Self {
        [c.r, c.g, c.b]
    }
}

/// Texture coordinate pair
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Uv {
    pub u: f64,
    pub v: f64,
}

impl Uv {
    pub const fn new(u: f64, v: f64) -> Self {
        Self { u, v }
    }

    /// Flip the vertical axis (image rows run top-down in the target format)
    pub fn flip_v(self) -> Self {
        Self::new(self.u, 1.0 - self.v)
    }
}

impl From<[f64; 2]> for Uv {
    fn from(uv: [f64; 2]) -> Self {
        Self::new(uv[0], uv[1])
    }
}

impl From<Uv> for [f64; 2] {
    fn from(uv: Uv) -> Self {
        [uv.u, uv.v]
    }
}

/// Location / rotation / scale triple of a scene object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    #[serde(default)]
    pub location: Vec3,
    #[serde(default)]
    pub rotation: Euler,
    #[serde(default = "unit_scale")]
    pub scale: Vec3,
}

fn unit_scale() -> Vec3 {
    Vec3::ONE
}

impl Transform {
    pub const IDENTITY: Self = Self {
        location: Vec3::ZERO,
        rotation: Euler::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn new(location: Vec3, rotation: Euler, scale: Vec3) -> Self {
        Self { location, rotation, scale }
    }

    pub fn from_location(location: Vec3) -> Self {
        Self { location, ..Self::IDENTITY }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_vec3_componentwise() {
        let a = Vec3::new(4.0, 6.0, 8.0);
        let b = Vec3::new(1.0, 2.0, 4.0);

        assert_eq!(a - b, Vec3::new(3.0, 4.0, 4.0));
        assert_eq!(a / b, Vec3::new(4.0, 3.0, 2.0));
        assert_relative_eq!(Vec3::new(3.0, 4.0, 0.0).length(), 5.0);
    }

    #[test]
    fn test_rgb_scale() {
        let ambient = Rgb::new(0.8, 0.4, 0.2).scale(0.5);
        assert_relative_eq!(ambient.r, 0.4);
        assert_relative_eq!(ambient.g, 0.2);
        assert_relative_eq!(ambient.b, 0.1);
    }

    #[test]
    fn test_uv_flip() {
        assert_eq!(Uv::new(0.25, 0.75).flip_v(), Uv::new(0.25, 0.25));
    }

    #[test]
    fn test_transform_serde_defaults() {
        let t: Transform = serde_json::from_str(r#"{ "location": [1, 2, 3] }"#).unwrap();
        assert_eq!(t.location, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.rotation, Euler::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
    }

    #[test]
    fn test_quat_identity_norm() {
        assert_relative_eq!(Quat::IDENTITY.norm(), 1.0);
    }
}
