//! A cube with tweakable elevation, look and geometry, plus a spin button.

use std::f32::consts::TAU;
use std::ops::RangeInclusive;

use glam::Vec3;
use hecs::{Entity, World};

use super::place_camera;
use crate::animation::{Animated, AnimationRule, SpinTween};
use crate::config::StageConfig;
use crate::ecs::{Color, Material, Name, Shape, Visual};
use crate::renderer::Renderer;
use crate::stage::Stage;
use crate::transform::Transform;

/// A wireframe cube driven by a tweak panel.
pub struct DebugUi {
    pub tweaks: CubeTweaks,
}

impl DebugUi {
    pub fn build<R: Renderer>(stage: &mut Stage<R>, config: &StageConfig) -> Self {
        place_camera(stage, config, Vec3::new(1.0, 1.0, 2.0));
        stage.background = Color::BLACK;

        let mut material = Material::color(CubeTweaks::COLOR);
        material.wireframe = true;

        let rest = Transform::new();
        let spin = AnimationRule::Tween(SpinTween::new(Vec3::new(0.0, TAU, 0.0), 1.0));
        let cube = stage.world_mut().spawn((
            Name::new("cube"),
            rest,
            Animated::new(rest, spin),
            Visual::new(CubeTweaks::geometry(CubeTweaks::SUBDIVISIONS), material),
        ));
        stage.track(cube);

        Self {
            tweaks: CubeTweaks::new(cube),
        }
    }
}

/// Panel-editable parameters of the cube.
///
/// Edit the public fields, then call [`CubeTweaks::apply`]. Geometry is rebuilt
/// only when `subdivision` actually changed.
#[derive(Debug, Clone)]
pub struct CubeTweaks {
    pub elevation: f32,
    pub visible: bool,
    pub wireframe: bool,
    pub color: Color,
    pub subdivision: u32,
    cube: Entity,
    built_subdivision: u32,
}

impl CubeTweaks {
    pub const ELEVATION: RangeInclusive<f32> = -3.0..=3.0;
    pub const SUBDIVISION: RangeInclusive<u32> = 1..=20;

    const COLOR: Color = Color::rgb8(0xa7, 0x78, 0xd8);
    const SUBDIVISIONS: u32 = 2;

    fn new(cube: Entity) -> Self {
        Self {
            elevation: 0.0,
            visible: true,
            wireframe: true,
            color: Self::COLOR,
            subdivision: Self::SUBDIVISIONS,
            cube,
            built_subdivision: Self::SUBDIVISIONS,
        }
    }

    fn geometry(subdivision: u32) -> Shape {
        Shape::Cuboid {
            size: Vec3::ONE,
            segments: subdivision,
        }
    }

    pub fn cube(&self) -> Entity {
        self.cube
    }

    /// Pushes the fields into the cube's components, clamping them to the
    /// panel's ranges first. Returns `true` if the geometry was rebuilt.
    pub fn apply(&mut self, world: &mut World) -> bool {
        self.elevation = self
            .elevation
            .clamp(*Self::ELEVATION.start(), *Self::ELEVATION.end());
        self.subdivision = self
            .subdivision
            .clamp(*Self::SUBDIVISION.start(), *Self::SUBDIVISION.end());

        let Ok((animated, visual)) = world.query_one_mut::<(&mut Animated, &mut Visual)>(self.cube)
        else {
            log::warn!("debug cube {:?} is gone", self.cube);
            return false;
        };

        animated.rest.position.y = self.elevation;
        visual.visible = self.visible;
        visual.material.wireframe = self.wireframe;
        visual.material.color = self.color;

        if self.subdivision == self.built_subdivision {
            return false;
        }
        visual.shape = Self::geometry(self.subdivision);
        self.built_subdivision = self.subdivision;
        log::debug!("cube rebuilt with {} segments", self.subdivision);
        true
    }

    /// Starts a one-second full turn around Y at scene time `now`.
    ///
    /// A spin triggered mid-turn continues from the current angle.
    pub fn spin(&self, world: &mut World, now: f32) {
        let Ok(animated) = world.query_one_mut::<&mut Animated>(self.cube) else {
            return;
        };
        if let AnimationRule::Tween(tween) = &mut animated.rule {
            animated.rest.rotation += tween.turn * tween.progress(now);
            tween.started_at = Some(now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::HeadlessRenderer;
    use approx::assert_abs_diff_eq;

    fn build() -> (Stage<HeadlessRenderer>, DebugUi) {
        let config = StageConfig::default();
        let mut stage = Stage::new(&config, 800.0, 600.0, HeadlessRenderer::new()).unwrap();
        let scene = DebugUi::build(&mut stage, &config);
        stage.start();
        (stage, scene)
    }

    #[test]
    fn starts_as_purple_wireframe() {
        let (stage, scene) = build();
        let visual = stage.world().get::<&Visual>(scene.tweaks.cube()).unwrap();
        assert!(visual.material.wireframe);
        assert_eq!(visual.material.color.to_hex(), "#a778d8");
        assert_eq!(visual.shape, CubeTweaks::geometry(2));
        assert_eq!(stage.camera().position, Vec3::new(1.0, 1.0, 2.0));
    }

    #[test]
    fn subdivision_change_rebuilds_once() {
        let (mut stage, mut scene) = build();
        assert!(!scene.tweaks.apply(stage.world_mut()));

        scene.tweaks.subdivision = 8;
        assert!(scene.tweaks.apply(stage.world_mut()));
        assert!(!scene.tweaks.apply(stage.world_mut()));

        let visual = stage.world().get::<&Visual>(scene.tweaks.cube()).unwrap();
        assert_eq!(visual.shape, CubeTweaks::geometry(8));
    }

    #[test]
    fn elevation_is_clamped_and_survives_frames() {
        let (mut stage, mut scene) = build();
        scene.tweaks.elevation = 5.0;
        scene.tweaks.visible = false;
        scene.tweaks.apply(stage.world_mut());
        stage.on_frame(0.5);

        let cube = scene.tweaks.cube();
        assert_eq!(scene.tweaks.elevation, 3.0);
        assert_eq!(stage.world().get::<&Transform>(cube).unwrap().position.y, 3.0);
        assert!(!stage.world().get::<&Visual>(cube).unwrap().visible);
    }

    #[test]
    fn spin_turns_once_over_a_second() {
        let (mut stage, scene) = build();
        let cube = scene.tweaks.cube();

        stage.on_frame(1.0);
        assert_eq!(stage.world().get::<&Transform>(cube).unwrap().rotation.y, 0.0);

        scene.tweaks.spin(stage.world_mut(), 1.0);
        stage.on_frame(1.5);
        let halfway = stage.world().get::<&Transform>(cube).unwrap().rotation.y;
        assert!(halfway > TAU / 2.0 && halfway < TAU);

        stage.on_frame(3.0);
        let done = stage.world().get::<&Transform>(cube).unwrap().rotation.y;
        assert_abs_diff_eq!(done, TAU, epsilon = 1e-5);
    }

    #[test]
    fn second_spin_continues_from_current_angle() {
        let (mut stage, scene) = build();
        let cube = scene.tweaks.cube();
        scene.tweaks.spin(stage.world_mut(), 0.0);
        stage.on_frame(2.0);
        scene.tweaks.spin(stage.world_mut(), 2.0);
        stage.on_frame(4.0);

        let rotation = stage.world().get::<&Transform>(cube).unwrap().rotation.y;
        assert_abs_diff_eq!(rotation, 2.0 * TAU, epsilon = 1e-4);
    }
}
