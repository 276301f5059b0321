//! The 3D text lesson: a matcap title among spinning donuts.

use std::f32::consts::PI;

use glam::Vec3;
use hecs::Entity;

use super::{place_camera, seeded};
use crate::animation::{Animated, AnimationRule};
use crate::config::StageConfig;
use crate::ecs::{Color, Material, Name, Shape, Visual};
use crate::error::Result;
use crate::placement::{PlacementSpec, Span, generate};
use crate::renderer::Renderer;
use crate::stage::Stage;
use crate::transform::Transform;

/// Extruded title text in a cloud of tumbling donuts.
///
/// Everything shares one matcap material. Until the font has loaded, the text
/// is drawn as its placeholder; the donuts spin regardless.
pub struct Text3d {
    pub text: Entity,
    pub donuts: Vec<Entity>,
}

impl Text3d {
    pub const TITLE: &'static str = "Iris Is Beautifull";
    pub const MATCAP: &'static str = "matcaps/1";
    pub const DONUT_COUNT: usize = 100;
    /// Radians per second on both X and Y.
    pub const DONUT_SPIN: f32 = 0.18;

    /// Donuts fill a 10-unit cube around the text, tumbled on X and Y and
    /// shrunk by up to 100%.
    pub fn donut_placement(config: &StageConfig) -> Result<PlacementSpec> {
        let spec = PlacementSpec::scatter_box(Self::DONUT_COUNT, 10.0, 10.0)?
            .height(Span::symmetric(5.0))?
            .rotation(Span::new(0.0, PI)?, Span::new(0.0, PI)?, Span::fixed(0.0))?
            .scale(Span::new(0.0, 1.0)?)?;
        Ok(seeded(spec, config, 0))
    }

    pub fn build<R: Renderer>(stage: &mut Stage<R>, config: &StageConfig) -> Result<Self> {
        let spec = Self::donut_placement(config)?;
        place_camera(stage, config, Vec3::new(1.0, 1.0, 2.0));
        stage.background = Color::WHITE;

        let material = Material::textured(Color::WHITE, Self::MATCAP);

        let rest = Transform::new();
        let sway = AnimationRule::OscillatingSpin {
            amplitude: Vec3::new(0.0, 0.1, 0.0),
            frequency: 0.5,
        };
        let text = stage.world_mut().spawn((
            Name::new("title"),
            rest,
            Animated::new(rest, sway),
            Visual::new(
                Shape::Text {
                    text: Self::TITLE.to_owned(),
                    size: 0.5,
                    depth: 0.2,
                },
                material.clone(),
            ),
        ));
        stage.track(text);

        let spin = AnimationRule::Spin {
            rate: Vec3::new(Self::DONUT_SPIN, Self::DONUT_SPIN, 0.0),
        };
        let donuts = generate(&spec, &mut spec.rng())
            .into_iter()
            .enumerate()
            .map(|(i, rest)| {
                let donut = stage.world_mut().spawn((
                    Name::new(format!("donut {i}")),
                    rest,
                    Animated::new(rest, spin.clone()),
                    Visual::new(
                        Shape::Torus {
                            radius: 0.3,
                            tube: 0.2,
                        },
                        material.clone(),
                    ),
                ));
                stage.track(donut);
                donut
            })
            .collect();

        Ok(Self { text, donuts })
    }
}
