//! The haunted house: procedural graves and rocks, framed windows, fog and
//! ghost lights on orbits.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};
use std::ops::RangeInclusive;

use glam::Vec3;
use hecs::{Entity, World};

use super::{place_camera, seeded};
use crate::animation::{Animated, AnimationRule};
use crate::config::StageConfig;
use crate::ecs::{Color, Light, Material, Name, Shape, Visual};
use crate::error::Result;
use crate::placement::{FrameAssembly, FramePartKind, PlacementSpec, generate};
use crate::renderer::Renderer;
use crate::stage::Stage;
use crate::transform::Transform;

const ROOF: Color = Color::rgb8(0xb3, 0x5f, 0x45);
const BUSH: Color = Color::rgb8(0x89, 0xc8, 0x54);
const ALLEY: Color = Color::rgb8(0xac, 0x8e, 0x82);
const GLASS: Color = Color::rgb8(0x00, 0x7f, 0xff);
const FRAME: Color = Color::rgb8(0x65, 0x43, 0x21);
const CHIMNEY: Color = Color::rgb8(0x3f, 0x3f, 0x3f);
const ROCK: Color = Color::rgb8(0x5a, 0x5a, 0x5a);
const GRAVE: Color = Color::rgb8(0xb2, 0xb6, 0xb1);
const DOOR_LIGHT: Color = Color::rgb8(0xff, 0x7d, 0x46);
const MOON: Color = Color::rgb8(0xb9, 0xd5, 0xff);

/// Frame bar cross-section; side bars overlap the top and bottom ones by this much.
const FRAME_THICKNESS: f32 = 0.05;

/// Bush scale and position around the door.
const BUSHES: [(f32, Vec3); 4] = [
    (0.5, Vec3::new(0.8, 0.2, 2.2)),
    (0.25, Vec3::new(1.4, 0.1, 2.1)),
    (0.4, Vec3::new(-0.8, 0.1, 2.2)),
    (0.15, Vec3::new(-1.0, 0.05, 2.6)),
];

/// Window anchors on the walls: two at the front, two per side.
const WINDOWS: [(Vec3, f32); 6] = [
    (Vec3::new(1.3, 1.0, 2.04), 0.0),
    (Vec3::new(-1.3, 1.0, 2.04), 0.0),
    (Vec3::new(2.04, 1.0, 1.0), FRAC_PI_2),
    (Vec3::new(2.04, 1.0, -1.0), FRAC_PI_2),
    (Vec3::new(-2.04, 1.0, 1.0), -FRAC_PI_2),
    (Vec3::new(-2.04, 1.0, -1.0), -FRAC_PI_2),
];

/// A small house on a foggy lawn, ringed by graves, with three ghost lights
/// circling it.
pub struct HauntedHouse {
    pub graves: Vec<Entity>,
    pub rocks: Vec<Entity>,
    pub ghosts: Vec<Entity>,
    /// Window panes, one per anchor in wall order.
    pub windows: Vec<Entity>,
    pub lights: LightTweaks,
}

impl HauntedHouse {
    pub fn build<R: Renderer>(stage: &mut Stage<R>, config: &StageConfig) -> Result<Self> {
        let scene = &config.haunted_house;
        // Validate both populations before the stage is touched.
        let graves = PlacementSpec::annulus(
            scene.grave_count,
            scene.grave_inner_radius,
            scene.grave_outer_radius,
        )?;
        let graves = seeded(graves, config, 0);
        let rocks = PlacementSpec::scatter_box(scene.rock_count, scene.rock_area, scene.rock_area)?;
        let rocks = seeded(rocks, config, 1);

        place_camera(stage, config, Vec3::new(4.0, 2.0, 5.0));
        stage.background = scene.fog.color;

        let world = stage.world_mut();
        world.spawn((Name::new("fog"), scene.fog));
        build_house(world);
        let windows = WINDOWS
            .iter()
            .map(|&(position, yaw)| {
                build_window(world, scene.window_frame, Transform::from_position(position).yaw(yaw))
            })
            .collect();

        let rocks = generate(&rocks, &mut rocks.rng())
            .into_iter()
            .map(|t| {
                world.spawn((
                    Name::new("rock"),
                    t,
                    Visual::new(Shape::sphere(1.0), Material::color(ROCK)),
                ))
            })
            .collect();

        let graves = generate(&graves, &mut graves.rng())
            .into_iter()
            .map(|t| {
                world.spawn((
                    Name::new("grave"),
                    t,
                    Visual::new(Shape::cuboid(0.6, 0.8, 0.2), Material::color(GRAVE)).casting_shadow(),
                ))
            })
            .collect();

        world.spawn((
            Name::new("floor"),
            Transform::new().rotation(Vec3::new(-FRAC_PI_2, 0.0, 0.0)),
            Visual::new(
                Shape::Plane {
                    width: 20.0,
                    height: 20.0,
                },
                Material::textured(Color::WHITE, "grass/color"),
            ),
        ));

        let lights = LightTweaks::spawn(world);

        let ghosts = scene
            .ghosts
            .iter()
            .enumerate()
            .map(|(i, ghost)| {
                let rest = Transform::new();
                let orbit = AnimationRule::Orbit(ghost.orbit.clone());
                let entity = stage.world_mut().spawn((
                    Name::new(format!("ghost {}", i + 1)),
                    rest,
                    Animated::new(rest, orbit),
                    Light::Point {
                        color: ghost.color,
                        intensity: 6.0,
                        range: 3.0,
                    },
                ));
                stage.track(entity);
                entity
            })
            .collect();

        Ok(Self {
            graves,
            rocks,
            ghosts,
            windows,
            lights,
        })
    }
}

fn build_house(world: &mut World) {
    world.spawn((
        Name::new("walls"),
        Transform::from_position(Vec3::new(0.0, 1.25, 0.0)),
        Visual::new(
            Shape::cuboid(4.0, 2.5, 4.0),
            Material::textured(Color::WHITE, "bricks/color"),
        ),
    ));
    world.spawn((
        Name::new("roof"),
        Transform::from_position(Vec3::new(0.0, 3.0, 0.0)).yaw(FRAC_PI_4),
        Visual::new(
            Shape::Cone {
                radius: 3.5,
                height: 1.0,
                sides: 4,
            },
            Material::color(ROOF),
        ),
    ));
    world.spawn((
        Name::new("door"),
        Transform::from_position(Vec3::new(0.0, 1.0, 2.01)),
        Visual::new(
            Shape::Plane {
                width: 2.2,
                height: 2.2,
            },
            Material::textured(Color::WHITE, "door/color"),
        ),
    ));
    world.spawn((
        Name::new("door light"),
        Transform::from_position(Vec3::new(0.0, 2.2, 2.7)),
        Light::Point {
            color: DOOR_LIGHT,
            intensity: 1.0,
            range: 7.0,
        },
    ));
    for (scale, position) in BUSHES {
        world.spawn((
            Name::new("bush"),
            Transform::from_position(position).uniform_scale(scale),
            Visual::new(Shape::sphere(1.0), Material::color(BUSH)),
        ));
    }
    world.spawn((
        Name::new("alley"),
        Transform::from_position(Vec3::new(0.0, 0.0, 2.0)),
        Visual::new(Shape::cuboid(0.5, 0.1, 4.0), Material::color(ALLEY)),
    ));
    world.spawn((
        Name::new("chimney"),
        Transform::from_position(Vec3::new(-1.5, 2.5, -1.5)),
        Visual::new(
            Shape::Cylinder {
                radius: 0.2,
                height: 1.0,
            },
            Material::color(CHIMNEY),
        ),
    ));
}

/// A pane plus its four frame bars, sitting just proud of the wall at `anchor`.
fn build_window(world: &mut World, frame: FrameAssembly, anchor: Transform) -> Entity {
    let anchor = Transform {
        position: anchor.position + Vec3::new(0.0, 0.0, 0.01),
        ..anchor
    };
    let pane = world.spawn((
        Name::new("window"),
        anchor,
        Visual::new(
            Shape::Plane {
                width: 0.8,
                height: 1.0,
            },
            Material::color(GLASS),
        ),
    ));

    for part in frame.parts(&anchor) {
        let size = match part.kind {
            FramePartKind::Top | FramePartKind::Bottom => {
                Vec3::new(2.0 * frame.half_width, FRAME_THICKNESS, FRAME_THICKNESS)
            }
            FramePartKind::Left | FramePartKind::Right => Vec3::new(
                FRAME_THICKNESS,
                2.0 * (frame.half_height + FRAME_THICKNESS),
                FRAME_THICKNESS,
            ),
        };
        world.spawn((
            Name::new("window frame"),
            part.transform,
            Visual::new(Shape::cuboid(size.x, size.y, size.z), Material::color(FRAME)),
        ));
    }
    pane
}

/// Panel-editable lighting.
///
/// Edit the public fields, then call [`LightTweaks::apply`].
#[derive(Debug, Clone)]
pub struct LightTweaks {
    pub ambient_intensity: f32,
    pub moon_intensity: f32,
    pub moon_position: Vec3,
    ambient: Entity,
    moon: Entity,
}

impl LightTweaks {
    pub const INTENSITY: RangeInclusive<f32> = 0.0..=1.0;
    /// Per-axis bound of the moon position.
    pub const MOON_POSITION: RangeInclusive<f32> = -5.0..=5.0;

    fn spawn(world: &mut World) -> Self {
        let ambient_intensity = 0.12;
        let moon_intensity = 0.26;
        let moon_position = Vec3::new(4.0, 5.0, -2.0);

        let ambient = world.spawn((
            Name::new("ambient light"),
            Light::Ambient {
                color: MOON,
                intensity: ambient_intensity,
            },
        ));
        let moon = world.spawn((
            Name::new("moon light"),
            Transform::from_position(moon_position),
            Light::Directional {
                color: MOON,
                intensity: moon_intensity,
            },
        ));

        Self {
            ambient_intensity,
            moon_intensity,
            moon_position,
            ambient,
            moon,
        }
    }

    pub fn ambient(&self) -> Entity {
        self.ambient
    }

    pub fn moon(&self) -> Entity {
        self.moon
    }

    /// Clamps the fields to the panel's ranges and writes them to the lights.
    pub fn apply(&mut self, world: &mut World) {
        let (lo, hi) = (*Self::INTENSITY.start(), *Self::INTENSITY.end());
        self.ambient_intensity = self.ambient_intensity.clamp(lo, hi);
        self.moon_intensity = self.moon_intensity.clamp(lo, hi);
        let (lo, hi) = (*Self::MOON_POSITION.start(), *Self::MOON_POSITION.end());
        self.moon_position = self.moon_position.clamp(Vec3::splat(lo), Vec3::splat(hi));

        if let Ok(light) = world.query_one_mut::<&mut Light>(self.ambient) {
            *light.intensity_mut() = self.ambient_intensity;
        }
        match world.query_one_mut::<(&mut Light, &mut Transform)>(self.moon) {
            Ok((light, transform)) => {
                *light.intensity_mut() = self.moon_intensity;
                transform.position = self.moon_position;
            }
            Err(_) => log::warn!("moon light {:?} is gone", self.moon),
        }
    }
}
