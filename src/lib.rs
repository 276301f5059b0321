//! # Diorama
//!
//! **The math and scheduling behind small 3D scene demos, without the renderer.**
//!
//! A [`Stage`] owns an ECS world, a perspective camera, a viewport coordinator
//! and an animation scheduler. A host tells it when the viewport changes and
//! when to produce a frame; the stage keeps the projection in step with the
//! viewport, poses every animated entity from elapsed time, then hands the
//! world to a [`Renderer`].
//!
//! ## Quick Start
//!
//! ```
//! use diorama::*;
//!
//! let config = StageConfig::default();
//! let mut stage = Stage::new(&config, 800.0, 600.0, HeadlessRenderer::new()).unwrap();
//!
//! // A ring of graves, reproducible from a seed
//! let graves = PlacementSpec::annulus(50, 3.0, 9.0).unwrap().seed(42);
//! for transform in generate(&graves, &mut graves.rng()) {
//!     stage.world_mut().spawn((
//!         transform,
//!         Visual::new(Shape::cuboid(0.6, 0.8, 0.2), Material::color(Color::rgb8(0xb2, 0xb6, 0xb1))),
//!     ));
//! }
//!
//! // A ghost light circling the origin
//! stage.animate(Transform::new(), AnimationRule::Orbit(Orbit::new(0.5, 4.0).bob(3.0)));
//!
//! stage.start();
//! stage.on_resize(1280.0, 720.0, 2.0).unwrap();
//! stage.on_frame(0.016);
//! ```
//!
//! ## Pieces
//!
//! - **Projection**: [`horizontal_fov`] and [`CameraProjection`], recomputed on every resize.
//! - **Placement**: [`PlacementSpec`] with annular and box scatter, plus [`FrameAssembly`].
//! - **Animation**: [`AnimationRule`] pure functions of time, run by [`AnimationScheduler`].
//! - **Viewport**: [`ViewportCoordinator`] pushes sizes to the projection and the renderer.
//!
//! The `diorama` binary runs the bundled [`Demo`] scenes in a window or headless.

mod animation;
mod app;
mod camera;
mod clock;
mod config;
mod demos;
mod ecs;
mod error;
mod gpu;
mod logging;
mod placement;
mod projection;
mod renderer;
mod scheduler;
mod stage;
mod transform;
mod viewport;

pub use animation::{Animated, AnimationRule, Orbit, PoseFn, SpinTween, Wobble};
pub use app::{AppOptions, run, run_headless};
pub use camera::Camera;
pub use clock::Clock;
pub use config::{
    CameraConfig, Config, ConfigError, GhostConfig, HauntedHouseConfig, StageConfig,
    ViewportConfig,
};
pub use demos::{
    CubeTweaks, DebugUi, Demo, FirstProject, HauntedHouse, LightTweaks, Text3d, Textures,
};
pub use ecs::{Color, Fog, Light, Material, Name, Shape, TextureKey, Visual};
pub use error::{Error, Result};
pub use gpu::GpuRenderer;
pub use logging::{LoggingConfig, init_logging};
pub use placement::{
    FrameAssembly, FramePart, FramePartKind, PlacementSpec, Region, Span, annular_scatter,
    box_scatter, generate,
};
pub use projection::{CameraProjection, horizontal_fov};
pub use renderer::{HeadlessRenderer, Renderer, device_pixels};
pub use scheduler::{AnimationScheduler, FrameSignal, SchedulerState};
pub use stage::Stage;
pub use transform::Transform;
pub use viewport::{Viewport, ViewportCoordinator};

pub use glam::{Mat4, Quat, Vec3};
pub use hecs::{Entity, World};
