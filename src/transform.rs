//! Entity transforms.
//!
//! [`Transform`] stores rotation as Euler angles (radians, intrinsic X→Y→Z),
//! which is what the scene builders and animation rules write to. Use
//! [`Transform::quat`] or [`Transform::matrix`] when a renderer needs the
//! composed rotation.
//!
//! # Example
//!
//! ```
//! use diorama::{Transform, Vec3};
//!
//! let transform = Transform::new()
//!     .position(Vec3::new(0.0, 1.25, 0.0))
//!     .rotation(Vec3::new(0.0, std::f32::consts::FRAC_PI_4, 0.0))
//!     .uniform_scale(0.5);
//! assert_eq!(transform.scale, Vec3::splat(0.5));
//! ```

use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Transform component for positioning entities in 3D space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// World-space position (translation).
    pub position: Vec3,
    /// Euler angles in radians, applied in intrinsic X, Y, Z order.
    pub rotation: Vec3,
    /// Scale factors for each axis.
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Creates a new identity transform (origin, no rotation, unit scale).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transform positioned at the given location.
    ///
    /// ```
    /// use diorama::{Transform, Vec3};
    ///
    /// let transform = Transform::from_position(Vec3::new(1.0, 2.0, 3.0));
    /// assert_eq!(transform.position, Vec3::new(1.0, 2.0, 3.0));
    /// ```
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Sets the position (translation) component.
    pub fn position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Sets the Euler rotation in radians.
    pub fn rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    /// Sets only the rotation around the Y axis.
    pub fn yaw(mut self, angle: f32) -> Self {
        self.rotation.y = angle;
        self
    }

    /// Sets non-uniform scale factors for each axis.
    pub fn scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Sets uniform scale on all axes.
    pub fn uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::splat(scale);
        self
    }

    /// The rotation as a unit quaternion.
    pub fn quat(&self) -> Quat {
        Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        )
    }

    /// Converts this transform to a 4×4 matrix in SRT order.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.quat(), self.position)
    }

    /// Maps a point from this transform's local space into its parent space.
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.quat() * (self.scale * local)
    }

    /// Places `child` (expressed in this transform's local space) into the parent space.
    ///
    /// This is the rigid local-to-world composition used for grouped assemblies.
    /// A child without its own rotation inherits this rotation exactly.
    pub fn compose(&self, child: &Transform) -> Transform {
        let rotation = if child.rotation == Vec3::ZERO {
            self.rotation
        } else {
            let (x, y, z) = (self.quat() * child.quat()).to_euler(EulerRot::XYZ);
            Vec3::new(x, y, z)
        };

        Transform {
            position: self.transform_point(child.position),
            rotation,
            scale: self.scale * child.scale,
        }
    }
}
