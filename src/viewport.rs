//! Viewport size tracking and resize propagation.

use crate::error::{Error, Result};
use crate::projection::CameraProjection;
use crate::renderer::Renderer;

/// Viewport size in logical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Width divided by height. Only meaningful for a valid viewport.
    #[inline]
    pub fn aspect_ratio(self) -> f32 {
        self.width / self.height
    }
}

/// Keeps the camera projection and the renderer's output size in step with
/// the host viewport.
///
/// Each resize is applied immediately; there is no debouncing.
#[derive(Debug, Clone)]
pub struct ViewportCoordinator {
    viewport: Viewport,
    pixel_ratio_cap: f32,
    pixel_ratio: f32,
}

impl ViewportCoordinator {
    /// Fails on an invalid viewport or a cap that is not a positive finite number.
    pub fn new(viewport: Viewport, pixel_ratio_cap: f32) -> Result<Self> {
        if !viewport.is_valid() {
            return Err(Error::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        check_cap(pixel_ratio_cap)?;
        Ok(Self {
            viewport,
            pixel_ratio_cap,
            pixel_ratio: 1.0,
        })
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Upper bound on device pixels per logical pixel.
    pub fn pixel_ratio_cap(&self) -> f32 {
        self.pixel_ratio_cap
    }

    /// Changes the cap. Takes effect on the next resize or sync.
    pub fn set_pixel_ratio_cap(&mut self, cap: f32) -> Result<()> {
        check_cap(cap)?;
        self.pixel_ratio_cap = cap;
        Ok(())
    }

    /// Pixel ratio last forwarded to the renderer.
    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    /// `min(device_pixel_ratio, cap)`. Nonsensical ratios count as 1.
    pub fn clamp_pixel_ratio(&self, device_pixel_ratio: f32) -> f32 {
        let ratio = if device_pixel_ratio > 0.0 && device_pixel_ratio.is_finite() {
            device_pixel_ratio
        } else {
            1.0
        };
        ratio.min(self.pixel_ratio_cap)
    }

    /// Applies a new viewport size.
    ///
    /// Updates the projection, then forwards the size to the renderer. An
    /// invalid size is rejected before anything changes: the viewport, the
    /// projection and the renderer all keep their previous state.
    pub fn on_resize(
        &mut self,
        width: f32,
        height: f32,
        device_pixel_ratio: f32,
        projection: &mut CameraProjection,
        renderer: &mut dyn Renderer,
    ) -> Result<()> {
        let viewport = Viewport::new(width, height);
        if !viewport.is_valid() {
            return Err(Error::InvalidViewport { width, height });
        }

        projection.update_aspect_ratio(width, height)?;
        self.viewport = viewport;
        self.pixel_ratio = self.clamp_pixel_ratio(device_pixel_ratio);
        renderer.set_output_size(width, height, self.pixel_ratio);

        log::debug!(
            "viewport {width}x{height} @{} -> hfov {:.2}°",
            self.pixel_ratio,
            projection.horizontal_fov()
        );
        Ok(())
    }

    /// Pushes the current size to a renderer that has not seen it yet.
    pub fn sync(&mut self, device_pixel_ratio: f32, renderer: &mut dyn Renderer) {
        self.pixel_ratio = self.clamp_pixel_ratio(device_pixel_ratio);
        renderer.set_output_size(self.viewport.width, self.viewport.height, self.pixel_ratio);
    }
}

fn check_cap(cap: f32) -> Result<()> {
    if cap > 0.0 && cap.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidPixelRatio(cap))
    }
}
