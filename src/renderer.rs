//! The boundary to whatever actually draws the scene.
//!
//! The scene core never rasterizes. It hands a renderer the world and the
//! camera once per frame, and tells it the output size whenever the viewport
//! changes. [`HeadlessRenderer`] is the no-window implementation used for
//! fixed-step runs and tests; the windowed one is [`GpuRenderer`](crate::GpuRenderer).

use hecs::World;

use crate::camera::Camera;
use crate::ecs::Color;

/// A rendering backend driven by [`Stage`](crate::Stage).
pub trait Renderer {
    /// Sets the drawing buffer to `width`×`height` logical pixels at `pixel_ratio`
    /// device pixels per logical pixel (already clamped by the caller).
    fn set_output_size(&mut self, width: f32, height: f32, pixel_ratio: f32);

    /// Draws one frame and returns whether it reached the output.
    ///
    /// When `camera.projection.is_dirty()`, the projection matrix must be rebuilt
    /// before use. The stage clears the flag only after a frame that returned
    /// `true`, so a dropped frame sees the dirty projection again next time.
    fn render(&mut self, world: &World, camera: &Camera, background: Color) -> bool;
}

/// Renderer that draws nothing and keeps a few counters.
#[derive(Debug, Default, Clone)]
pub struct HeadlessRenderer {
    /// Drawing buffer size in device pixels.
    pub buffer_size: (u32, u32),
    pub frames: u64,
    pub projection_rebuilds: u64,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Renderer for HeadlessRenderer {
    fn set_output_size(&mut self, width: f32, height: f32, pixel_ratio: f32) {
        self.buffer_size = device_pixels(width, height, pixel_ratio);
        log::debug!(
            "headless output {}x{} (ratio {pixel_ratio})",
            self.buffer_size.0,
            self.buffer_size.1
        );
    }

    fn render(&mut self, world: &World, camera: &Camera, _background: Color) -> bool {
        if camera.projection.is_dirty() {
            self.projection_rebuilds += 1;
        }
        self.frames += 1;
        log::trace!("headless frame {} with {} entities", self.frames, world.len());
        true
    }
}

/// Logical size × pixel ratio, rounded to whole device pixels.
pub fn device_pixels(width: f32, height: f32, pixel_ratio: f32) -> (u32, u32) {
    (
        (width * pixel_ratio).round().max(1.0) as u32,
        (height * pixel_ratio).round().max(1.0) as u32,
    )
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// One call observed by [`RecordingRenderer`].
    #[derive(Clone, Debug, PartialEq)]
    pub enum Call {
        SetOutputSize {
            width: f32,
            height: f32,
            pixel_ratio: f32,
        },
        Render {
            aspect_ratio: f32,
            projection_dirty: bool,
        },
    }

    /// Test double that records every call in order.
    #[derive(Debug, Default)]
    pub struct RecordingRenderer {
        pub calls: Vec<Call>,
        /// Report frames as not presented, like a lost surface.
        pub drop_frames: bool,
    }

    impl Renderer for RecordingRenderer {
        fn set_output_size(&mut self, width: f32, height: f32, pixel_ratio: f32) {
            self.calls.push(Call::SetOutputSize {
                width,
                height,
                pixel_ratio,
            });
        }

        fn render(&mut self, _world: &World, camera: &Camera, _background: Color) -> bool {
            self.calls.push(Call::Render {
                aspect_ratio: camera.projection.aspect_ratio(),
                projection_dirty: camera.projection.is_dirty(),
            });
            !self.drop_frames
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_pixels_scale_and_round() {
        assert_eq!(device_pixels(800.0, 600.0, 2.0), (1600, 1200));
        assert_eq!(device_pixels(333.3, 100.0, 1.5), (500, 150));
        assert_eq!(device_pixels(0.1, 0.1, 1.0), (1, 1));
    }

    #[test]
    fn headless_counts_frames_and_rebuilds() {
        let mut renderer = HeadlessRenderer::new();
        let mut camera = Camera::perspective(75.0, 800.0, 600.0, 0.1, 100.0).unwrap();
        let world = World::new();

        renderer.set_output_size(800.0, 600.0, 2.0);
        assert!(renderer.render(&world, &camera, Color::BLACK));
        camera.projection.mark_clean();
        assert!(renderer.render(&world, &camera, Color::BLACK));

        assert_eq!(renderer.buffer_size, (1600, 1200));
        assert_eq!(renderer.frames, 2);
        assert_eq!(renderer.projection_rebuilds, 1);
    }
}
