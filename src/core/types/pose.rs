//! Rigid 3D pose.

use nalgebra::{Isometry3, Matrix4, Translation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// Camera pose as a rigid 3D transform (rotation + translation).
///
/// Stored as an isometry; callers consume it through [`Pose::matrix`],
/// which renders the transform as a homogeneous 4x4 matrix. A pose is only
/// meaningful when the tracking state that produced it was `Ok`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    isometry: Isometry3<f32>,
}

impl Pose {
    /// Identity pose at the origin.
    #[inline]
    pub fn identity() -> Self {
        Self {
            isometry: Isometry3::identity(),
        }
    }

    /// Create from an isometry.
    #[inline]
    pub fn from_isometry(isometry: Isometry3<f32>) -> Self {
        Self { isometry }
    }

    /// Create from translation and rotation parts.
    #[inline]
    pub fn from_parts(translation: Translation3<f32>, rotation: UnitQuaternion<f32>) -> Self {
        Self {
            isometry: Isometry3::from_parts(translation, rotation),
        }
    }

    /// The underlying isometry.
    #[inline]
    pub fn isometry(&self) -> &Isometry3<f32> {
        &self.isometry
    }

    /// Translation component.
    #[inline]
    pub fn translation(&self) -> Vector3<f32> {
        self.isometry.translation.vector
    }

    /// Rotation component.
    #[inline]
    pub fn rotation(&self) -> UnitQuaternion<f32> {
        self.isometry.rotation
    }

    /// Render as a homogeneous 4x4 matrix (caller-facing form).
    #[inline]
    pub fn matrix(&self) -> Matrix4<f32> {
        self.isometry.to_homogeneous()
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<Isometry3<f32>> for Pose {
    fn from(isometry: Isometry3<f32>) -> Self {
        Self { isometry }
    }
}
