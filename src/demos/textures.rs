//! One cube wearing a texture looked up by key.

use glam::Vec3;
use hecs::Entity;

use super::place_camera;
use crate::config::StageConfig;
use crate::ecs::{Color, Material, Name, Shape, Visual};
use crate::renderer::Renderer;
use crate::stage::Stage;
use crate::transform::Transform;

/// A unit box wearing a pixel-art texture.
///
/// The texture is referenced by key; until the renderer has it, the box shows
/// plain white.
pub struct Textures {
    pub cube: Entity,
}

impl Textures {
    pub const TEXTURE: &'static str = "minecraft";

    pub fn build<R: Renderer>(stage: &mut Stage<R>, config: &StageConfig) -> Self {
        place_camera(stage, config, Vec3::ONE);
        stage.background = Color::BLACK;

        let cube = stage.world_mut().spawn((
            Name::new("cube"),
            Transform::new(),
            Visual::new(
                Shape::cuboid(1.0, 1.0, 1.0),
                Material::textured(Color::WHITE, Self::TEXTURE),
            ),
        ));
        Self { cube }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::TextureKey;
    use crate::renderer::HeadlessRenderer;

    #[test]
    fn cube_references_its_texture() {
        let config = StageConfig::default();
        let mut stage = Stage::new(&config, 800.0, 600.0, HeadlessRenderer::new()).unwrap();
        let scene = Textures::build(&mut stage, &config);

        let visual = stage.world().get::<&Visual>(scene.cube).unwrap();
        assert_eq!(visual.material.texture, Some(TextureKey("minecraft".into())));
        assert_eq!(visual.material.color, Color::WHITE);
    }
}
