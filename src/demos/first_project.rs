//! The smallest scene: one coloured cube in front of the camera.

use glam::Vec3;
use hecs::Entity;

use super::place_camera;
use crate::config::StageConfig;
use crate::ecs::{Color, Material, Name, Shape, Visual};
use crate::renderer::Renderer;
use crate::stage::Stage;
use crate::transform::Transform;

/// One deep-pink unit box in front of the camera. Nothing moves.
pub struct FirstProject {
    pub cube: Entity,
}

impl FirstProject {
    pub const COLOR: Color = Color::rgb8(0xff, 0x14, 0x93);

    pub fn build<R: Renderer>(stage: &mut Stage<R>, config: &StageConfig) -> Self {
        place_camera(stage, config, Vec3::new(0.0, 0.0, 3.0));
        stage.background = Color::BLACK;

        let cube = stage.world_mut().spawn((
            Name::new("cube"),
            Transform::new(),
            Visual::new(Shape::cuboid(1.0, 1.0, 1.0), Material::color(Self::COLOR)),
        ));
        Self { cube }
    }
}
