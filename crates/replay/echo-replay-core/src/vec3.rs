//! Engine-space 3-vector and the stored-order axis permutation.
//!
//! Recorded vectors are `[a, b, c]` where `a` is the engine's z axis and `c` is
//! its x axis. Every read goes through [`Vec3::from_stored`] and every write
//! through [`Vec3::to_stored`].

use serde::{Deserialize, Serialize};

/// Linear interpolation of scalars.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Read a recorded `[a, b, c]` triple into engine space (`x = c`, `z = a`).
    #[inline]
    pub fn from_stored(v: [f32; 3]) -> Self {
        Self::new(v[2], v[1], v[0])
    }

    /// Inverse of [`Vec3::from_stored`].
    #[inline]
    pub fn to_stored(self) -> [f32; 3] {
        [self.z, self.y, self.x]
    }

    #[inline]
    pub fn lerp(self, other: Vec3, t: f32) -> Vec3 {
        Vec3::new(
            lerp_f32(self.x, other.x, t),
            lerp_f32(self.y, other.y, t),
            lerp_f32(self.z, other.z, t),
        )
    }
}

/// Blend two stored triples in engine space and write the result back in stored order.
#[inline]
pub fn lerp_stored(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    Vec3::from_stored(a)
        .lerp(Vec3::from_stored(b), t)
        .to_stored()
}

/// Blend two optional stored triples; absent on either side stays absent.
#[inline]
pub fn lerp_stored_opt(a: Option<[f32; 3]>, b: Option<[f32; 3]>, t: f32) -> Option<[f32; 3]> {
    match (a, b) {
        (Some(a), Some(b)) => Some(lerp_stored(a, b, t)),
        _ => None,
    }
}
