//! Transform encodings and their normalization into one canonical shape.
//!
//! Recordings carry tracked-object transforms in three encodings:
//! - `{ "pos": [..], "forward": [..], "left": [..], "up": [..] }`
//! - the same object with the point under `"position"` instead of `"pos"`
//! - a bare `[a, b, c]` point with no basis
//!
//! All of them are resolved once at deserialization into [`Transform`]. A field
//! that matches none of them becomes absent without failing the snapshot.

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::error::ReplayError;
use crate::vec3::{lerp_stored_opt, Vec3};

/// Canonical transform: a point and an optional forward/left/up basis, all in
/// stored axis order. Any sub-field may be absent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTransform")]
pub struct Transform {
    #[serde(rename = "pos", skip_serializing_if = "Option::is_none")]
    pub position: Option<[f32; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forward: Option<[f32; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<[f32; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub up: Option<[f32; 3]>,
}

impl Transform {
    /// Point-only transform from a stored triple.
    pub fn point(position: [f32; 3]) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    /// Point plus full basis.
    pub fn oriented(position: [f32; 3], forward: [f32; 3], left: [f32; 3], up: [f32; 3]) -> Self {
        Self {
            position: Some(position),
            forward: Some(forward),
            left: Some(left),
            up: Some(up),
        }
    }

    /// Point in engine space.
    #[inline]
    pub fn position_vec3(&self) -> Option<Vec3> {
        self.position.map(Vec3::from_stored)
    }

    #[inline]
    pub fn has_basis(&self) -> bool {
        self.forward.is_some() || self.left.is_some() || self.up.is_some()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.position.is_none() && !self.has_basis()
    }

    /// Blend each sub-field present on both sides; the rest stay absent.
    /// Returns `None` when nothing survives.
    pub fn blend(&self, other: &Transform, t: f32) -> Option<Transform> {
        let out = Transform {
            position: lerp_stored_opt(self.position, other.position, t),
            forward: lerp_stored_opt(self.forward, other.forward, t),
            left: lerp_stored_opt(self.left, other.left, t),
            up: lerp_stored_opt(self.up, other.up, t),
        };
        if out.is_empty() {
            None
        } else {
            Some(out)
        }
    }
}

/// Blend two optional transforms; absence on either side yields absence.
pub fn blend_opt(a: Option<&Transform>, b: Option<&Transform>, t: f32) -> Option<Transform> {
    match (a, b) {
        (Some(a), Some(b)) => a.blend(b, t),
        _ => None,
    }
}

/// Resolve an arbitrary JSON value into a canonical [`Transform`].
pub fn resolve_transform(value: &serde_json::Value) -> Result<Transform, ReplayError> {
    Transform::deserialize(value).map_err(|e| ReplayError::ConversionFailed {
        reason: e.to_string(),
    })
}

/// `deserialize_with` helper for optional transform fields: unrecognized
/// encodings degrade to `None` instead of failing the enclosing snapshot.
pub(crate) fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Option<Transform>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(v) => match resolve_transform(&v) {
            Ok(t) => Some(t),
            Err(e) => {
                debug!(error = %e, "dropping unrecognized transform field");
                None
            }
        },
    })
}

// ----- wire shapes (serde) -----

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTransform {
    // Bare point first: an array never matches the object shape anyway.
    Point([f32; 3]),
    Basis(RawBasis),
}

#[derive(Debug, Deserialize)]
struct RawBasis {
    #[serde(default)]
    pos: Option<[f32; 3]>,
    #[serde(default)]
    position: Option<[f32; 3]>,
    #[serde(default)]
    forward: Option<[f32; 3]>,
    #[serde(default)]
    left: Option<[f32; 3]>,
    #[serde(default)]
    up: Option<[f32; 3]>,
}

impl TryFrom<RawTransform> for Transform {
    type Error = ReplayError;

    fn try_from(raw: RawTransform) -> Result<Self, Self::Error> {
        match raw {
            RawTransform::Point(p) => Ok(Transform::point(p)),
            RawTransform::Basis(b) => {
                let t = Transform {
                    // "pos" is the newer name; prefer it when both are written.
                    position: b.pos.or(b.position),
                    forward: b.forward,
                    left: b.left,
                    up: b.up,
                };
                if t.is_empty() {
                    Err(ReplayError::ConversionFailed {
                        reason: "object carries no point or basis field".into(),
                    })
                } else {
                    Ok(t)
                }
            }
        }
    }
}
