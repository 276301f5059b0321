//! The scene context: world, camera, viewport, scheduler and renderer in one
//! owned value.
//!
//! A host drives a stage through exactly two entry points:
//! [`Stage::on_resize`] when the viewport changes and [`Stage::on_frame`] once
//! per display refresh. Neither blocks, and each runs to completion.
//!
//! ```
//! use diorama::*;
//!
//! let config = StageConfig::default();
//! let mut stage = Stage::new(&config, 800.0, 600.0, HeadlessRenderer::new()).unwrap();
//! stage.animate(
//!     Transform::new(),
//!     AnimationRule::Spin { rate: Vec3::new(0.0, 0.18, 0.0) },
//! );
//! stage.start();
//!
//! stage.on_resize(1280.0, 720.0, 2.0).unwrap();
//! assert!(stage.on_frame(0.016).is_ready());
//! assert_eq!(stage.renderer().buffer_size, (2560, 1440));
//! ```

use hecs::{Entity, World};

use crate::animation::AnimationRule;
use crate::camera::Camera;
use crate::config::StageConfig;
use crate::ecs::Color;
use crate::error::Result;
use crate::renderer::Renderer;
use crate::scheduler::{AnimationScheduler, FrameSignal};
use crate::transform::Transform;
use crate::viewport::{Viewport, ViewportCoordinator};

pub struct Stage<R: Renderer> {
    world: World,
    camera: Camera,
    viewport: ViewportCoordinator,
    scheduler: AnimationScheduler,
    /// Clear colour; also the fog colour in scenes that use fog.
    pub background: Color,
    renderer: R,
}

impl<R: Renderer> Stage<R> {
    /// Builds an empty stage for a `width`×`height` viewport and tells the
    /// renderer its initial output size.
    pub fn new(config: &StageConfig, width: f32, height: f32, mut renderer: R) -> Result<Self> {
        let mut viewport =
            ViewportCoordinator::new(Viewport::new(width, height), config.viewport.pixel_ratio_cap)?;
        let mut camera = Camera::perspective(
            config.camera.fov,
            width,
            height,
            config.camera.near,
            config.camera.far,
        )?;
        if let Some(position) = config.camera.position {
            camera.position = position;
        }

        viewport.sync(1.0, &mut renderer);

        Ok(Self {
            world: World::new(),
            camera,
            viewport,
            scheduler: AnimationScheduler::new(),
            background: Color::BLACK,
            renderer,
        })
    }

    /// Applies a viewport change immediately: projection first, then the
    /// renderer's output size. A rejected size leaves everything untouched.
    pub fn on_resize(&mut self, width: f32, height: f32, device_pixel_ratio: f32) -> Result<()> {
        self.viewport.on_resize(
            width,
            height,
            device_pixel_ratio,
            &mut self.camera.projection,
            &mut self.renderer,
        )
    }

    /// Produces one frame for time `now` (seconds since the host started).
    ///
    /// Every animated entity is updated before the renderer sees the world.
    /// Nothing is rendered unless the scheduler is running. The projection
    /// stays dirty until a frame is actually presented.
    pub fn on_frame(&mut self, now: f32) -> FrameSignal {
        let signal = self.scheduler.tick(&mut self.world, now);
        if signal.is_ready()
            && self
                .renderer
                .render(&self.world, &self.camera, self.background)
        {
            self.camera.projection.mark_clean();
        }
        signal
    }

    pub fn start(&mut self) {
        self.scheduler.start();
    }

    pub fn stop(&mut self) {
        self.scheduler.stop();
    }

    /// Spawns an animated entity; see [`AnimationScheduler::register`].
    pub fn animate(&mut self, rest: Transform, rule: AnimationRule) -> Entity {
        self.scheduler.register(&mut self.world, rest, rule)
    }

    /// Adds an entity spawned with `Transform` and `Animated` to the update order.
    pub fn track(&mut self, entity: Entity) {
        self.scheduler.track(entity);
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport.viewport()
    }

    pub fn pixel_ratio(&self) -> f32 {
        self.viewport.pixel_ratio()
    }

    pub fn scheduler(&self) -> &AnimationScheduler {
        &self.scheduler
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Elapsed scene time as of the last frame.
    pub fn elapsed(&self) -> f32 {
        self.scheduler.clock().elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::testing::{Call, RecordingRenderer};
    use crate::scheduler::SchedulerState;
    use glam::Vec3;

    fn stage() -> Stage<RecordingRenderer> {
        Stage::new(&StageConfig::default(), 800.0, 600.0, RecordingRenderer::default()).unwrap()
    }

    #[test]
    fn new_stage_syncs_output_size() {
        let stage = stage();
        assert_eq!(
            stage.renderer().calls,
            vec![Call::SetOutputSize {
                width: 800.0,
                height: 600.0,
                pixel_ratio: 1.0
            }]
        );
        assert_eq!(stage.camera().projection.vertical_fov(), 75.0);
    }

    #[test]
    fn resize_reaches_renderer_before_the_next_render() {
        let mut stage = stage();
        stage.start();
        stage.on_frame(0.0);
        stage.renderer_mut().calls.clear();

        stage.on_resize(1920.0, 1080.0, 3.0).unwrap();
        stage.on_frame(0.016);

        assert_eq!(
            stage.renderer().calls,
            vec![
                Call::SetOutputSize {
                    width: 1920.0,
                    height: 1080.0,
                    pixel_ratio: 2.0
                },
                Call::Render {
                    aspect_ratio: 1920.0 / 1080.0,
                    projection_dirty: true
                },
            ]
        );
        assert!(!stage.camera().projection.is_dirty());
    }

    #[test]
    fn dropped_frame_keeps_projection_dirty() {
        let mut stage = stage();
        stage.start();
        stage.on_resize(1024.0, 768.0, 1.0).unwrap();

        stage.renderer_mut().drop_frames = true;
        stage.on_frame(0.0);
        assert!(stage.camera().projection.is_dirty());

        stage.renderer_mut().drop_frames = false;
        stage.renderer_mut().calls.clear();
        stage.on_frame(0.016);
        assert_eq!(
            stage.renderer().calls,
            vec![Call::Render {
                aspect_ratio: 1024.0 / 768.0,
                projection_dirty: true
            }]
        );
        assert!(!stage.camera().projection.is_dirty());
    }

    #[test]
    fn unusable_pixel_ratio_cap_fails_construction() {
        for cap in [0.0, -1.0, f32::NAN] {
            let mut config = StageConfig::default();
            config.viewport.pixel_ratio_cap = cap;
            let err = Stage::new(&config, 1024.0, 768.0, RecordingRenderer::default())
                .err()
                .unwrap();
            assert!(err.is_invalid_argument());
        }
    }

    #[test]
    fn rejected_resize_keeps_last_projection() {
        let mut stage = stage();
        let before = stage.camera().projection;
        let err = stage.on_resize(1024.0, 0.0, 1.0).unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(stage.camera().projection, before);
        assert_eq!(stage.viewport(), Viewport::new(800.0, 600.0));
        assert_eq!(stage.renderer().calls.len(), 1);
    }

    #[test]
    fn frames_render_only_while_running() {
        let mut stage = stage();
        assert_eq!(stage.on_frame(1.0), FrameSignal::Skipped);

        stage.start();
        assert!(stage.on_frame(1.0).is_ready());
        stage.stop();
        assert_eq!(stage.on_frame(2.0), FrameSignal::Skipped);
        assert_eq!(stage.scheduler().state(), SchedulerState::Stopped);

        let renders = stage
            .renderer()
            .calls
            .iter()
            .filter(|c| matches!(c, Call::Render { .. }))
            .count();
        assert_eq!(renders, 1);
    }

    #[test]
    fn entities_are_posed_before_render() {
        let mut stage = stage();
        let spinner = stage.animate(
            Transform::new(),
            AnimationRule::Spin {
                rate: Vec3::new(0.0, 0.5, 0.0),
            },
        );
        stage.start();
        stage.on_frame(2.0);

        assert_eq!(stage.elapsed(), 2.0);
        let rotation = stage.world().get::<&Transform>(spinner).unwrap().rotation;
        assert_eq!(rotation.y, 1.0);
    }

    #[test]
    fn camera_position_comes_from_config() {
        let mut config = StageConfig::default();
        config.camera.position = Some(Vec3::new(4.0, 2.0, 5.0));
        let stage = Stage::new(&config, 800.0, 600.0, RecordingRenderer::default()).unwrap();
        assert_eq!(stage.camera().position, Vec3::new(4.0, 2.0, 5.0));
    }

    #[test]
    fn invalid_initial_size_is_rejected() {
        let result = Stage::new(&StageConfig::default(), 0.0, 600.0, RecordingRenderer::default());
        assert!(result.is_err());
    }
}
