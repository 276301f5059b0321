//! Perspective camera: a position looking at a target, plus its projection.

use glam::{Mat4, Vec3};

use crate::error::Result;
use crate::projection::CameraProjection;

/// A perspective camera: where it sits, what it looks at, and how it projects.
///
/// The projection part is kept consistent with the viewport by
/// [`ViewportCoordinator`](crate::ViewportCoordinator); position and target
/// are plain fields an external controller is free to move.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub projection: CameraProjection,
}

impl Camera {
    /// Creates a camera at the origin looking down -Z.
    pub fn new(projection: CameraProjection) -> Self {
        Self {
            position: Vec3::ZERO,
            target: Vec3::NEG_Z,
            up: Vec3::Y,
            projection,
        }
    }

    /// Creates a camera with a fresh projection for a `width`×`height` viewport.
    pub fn perspective(
        vertical_fov: f32,
        width: f32,
        height: f32,
        near: f32,
        far: f32,
    ) -> Result<Self> {
        Ok(Self::new(CameraProjection::new(
            vertical_fov,
            width,
            height,
            near,
            far,
        )?))
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn looking_at(mut self, target: Vec3) -> Self {
        self.target = target;
        self
    }

    /// Unit vector from the camera towards its target.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or(Vec3::NEG_Z)
    }

    /// World-to-view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Combined projection × view matrix.
    pub fn view_projection(&self) -> Mat4 {
        self.projection.matrix() * self.view_matrix()
    }
}
