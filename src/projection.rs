//! Perspective projection parameters.
//!
//! The vertical field of view is the fixed input; the horizontal field of view
//! is always derived from it and the current aspect ratio:
//!
//! ```text
//! h = 2 * atan(tan(v / 2) * aspect)
//! ```
//!
//! Horizontal extent scales with aspect through the tangent of the half-angle,
//! not linearly, so a 75° vertical view on a 16:9 viewport spans ~107.51°
//! rather than 75° × 16/9.

use glam::Mat4;

use crate::error::{Error, Result};

/// Horizontal field of view, in degrees, for a symmetric perspective frustum.
///
/// Fails with [`Error::InvalidAspectRatio`] when `aspect_ratio` is not a
/// positive finite number.
///
/// ```
/// let h = diorama::horizontal_fov(75.0, 16.0 / 9.0).unwrap();
/// assert!((h - 107.51).abs() < 0.01);
/// ```
pub fn horizontal_fov(vertical_fov_deg: f32, aspect_ratio: f32) -> Result<f32> {
    if !(aspect_ratio > 0.0 && aspect_ratio.is_finite()) {
        return Err(Error::InvalidAspectRatio(aspect_ratio));
    }
    let half_vertical = vertical_fov_deg.to_radians() / 2.0;
    Ok((2.0 * (half_vertical.tan() * aspect_ratio).atan()).to_degrees())
}

/// Projection state of a perspective camera.
///
/// `horizontal_fov` is never set on its own; every change to the aspect ratio
/// recomputes it. After a change the projection is marked dirty until the
/// renderer has consumed it (see [`CameraProjection::mark_clean`]).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraProjection {
    vertical_fov: f32,
    aspect_ratio: f32,
    horizontal_fov: f32,
    near: f32,
    far: f32,
    dirty: bool,
}

impl CameraProjection {
    /// Creates a projection for a `width`×`height` viewport.
    ///
    /// The new projection starts dirty so the first frame picks it up.
    pub fn new(vertical_fov: f32, width: f32, height: f32, near: f32, far: f32) -> Result<Self> {
        if !(vertical_fov > 0.0 && vertical_fov < 180.0) {
            return Err(Error::InvalidProjection(format!(
                "vertical fov {vertical_fov} outside (0, 180)"
            )));
        }
        if !(near > 0.0 && far > near && far.is_finite()) {
            return Err(Error::InvalidProjection(format!(
                "clip planes near={near} far={far}"
            )));
        }
        let aspect_ratio = aspect_of(width, height)?;
        Ok(Self {
            vertical_fov,
            aspect_ratio,
            horizontal_fov: horizontal_fov(vertical_fov, aspect_ratio)?,
            near,
            far,
            dirty: true,
        })
    }

    /// Recomputes the aspect ratio and horizontal FOV for a new viewport size.
    ///
    /// On error nothing is modified and the last valid projection stays in place.
    pub fn update_aspect_ratio(&mut self, width: f32, height: f32) -> Result<()> {
        let aspect_ratio = aspect_of(width, height)?;
        let horizontal = horizontal_fov(self.vertical_fov, aspect_ratio)?;

        self.aspect_ratio = aspect_ratio;
        self.horizontal_fov = horizontal;
        self.dirty = true;
        Ok(())
    }

    /// Vertical field of view in degrees.
    pub fn vertical_fov(&self) -> f32 {
        self.vertical_fov
    }

    /// Horizontal field of view in degrees, derived from the vertical FOV.
    pub fn horizontal_fov(&self) -> f32 {
        self.horizontal_fov
    }

    /// Width divided by height.
    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    /// Whether the projection matrix must be rebuilt before the next frame.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Acknowledges that the renderer has rebuilt its projection matrix.
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Right-handed perspective matrix with a [0, 1] depth range.
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.vertical_fov.to_radians(),
            self.aspect_ratio,
            self.near,
            self.far,
        )
    }
}

fn aspect_of(width: f32, height: f32) -> Result<f32> {
    let valid = |v: f32| v > 0.0 && v.is_finite();
    if !(valid(width) && valid(height)) {
        return Err(Error::InvalidViewport { width, height });
    }
    Ok(width / height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn widescreen_horizontal_fov() {
        let h = horizontal_fov(75.0, 16.0 / 9.0).unwrap();
        assert_abs_diff_eq!(h, 107.51, epsilon = 0.01);
    }

    #[test]
    fn square_aspect_keeps_vertical_fov() {
        let h = horizontal_fov(75.0, 1.0).unwrap();
        assert_abs_diff_eq!(h, 75.0, epsilon = 1e-4);
    }

    #[test]
    fn horizontal_fov_is_strictly_increasing() {
        let mut previous = horizontal_fov(75.0, 0.05).unwrap();
        for step in 2..200 {
            let aspect = step as f32 * 0.05;
            let h = horizontal_fov(75.0, aspect).unwrap();
            assert!(h > previous, "not increasing at aspect {aspect}");
            assert!(h < 180.0);
            previous = h;
        }
    }

    #[test]
    fn non_positive_aspect_is_rejected() {
        for aspect in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            assert!(matches!(
                horizontal_fov(75.0, aspect),
                Err(Error::InvalidAspectRatio(_))
            ));
        }
    }

    #[test]
    fn update_is_idempotent() {
        let mut a = CameraProjection::new(75.0, 800.0, 600.0, 0.1, 100.0).unwrap();
        a.update_aspect_ratio(1920.0, 1080.0).unwrap();
        let first = a;
        a.update_aspect_ratio(1920.0, 1080.0).unwrap();
        assert_eq!(first, a);
        assert_eq!(first.horizontal_fov().to_bits(), a.horizontal_fov().to_bits());
        assert_eq!(first.aspect_ratio().to_bits(), a.aspect_ratio().to_bits());
    }

    #[test]
    fn degenerate_resize_keeps_last_projection() {
        let mut projection = CameraProjection::new(75.0, 800.0, 600.0, 0.1, 100.0).unwrap();
        projection.mark_clean();
        let before = projection;

        assert!(projection.update_aspect_ratio(800.0, 0.0).is_err());
        assert!(projection.update_aspect_ratio(-10.0, 600.0).is_err());
        assert_eq!(projection, before);
        assert!(!projection.is_dirty());
    }

    #[test]
    fn resize_marks_dirty() {
        let mut projection = CameraProjection::new(75.0, 800.0, 600.0, 0.1, 100.0).unwrap();
        assert!(projection.is_dirty());
        projection.mark_clean();
        projection.update_aspect_ratio(1024.0, 768.0).unwrap();
        assert!(projection.is_dirty());
        assert_abs_diff_eq!(projection.aspect_ratio(), 4.0 / 3.0, epsilon = 1e-6);
    }

    #[test]
    fn rejects_bad_clip_planes() {
        assert!(CameraProjection::new(75.0, 800.0, 600.0, 0.0, 100.0).is_err());
        assert!(CameraProjection::new(75.0, 800.0, 600.0, 1.0, 0.5).is_err());
        assert!(CameraProjection::new(180.0, 800.0, 600.0, 0.1, 100.0).is_err());
    }
}
