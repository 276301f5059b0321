//! ECS components describing scene content.
//!
//! The scene graph is a plain [`hecs::World`]. Every placed entity has a
//! [`Transform`](crate::Transform); what it looks like lives in [`Visual`],
//! light sources carry a [`Light`], and animated entities additionally carry an
//! [`Animated`](crate::Animated) component owned by the scheduler.
//!
//! # Example
//!
//! ```
//! use diorama::*;
//!
//! let mut world = World::new();
//! world.spawn((
//!     Name::new("walls"),
//!     Transform::from_position(Vec3::new(0.0, 1.25, 0.0)),
//!     Visual::new(Shape::cuboid(4.0, 2.5, 4.0), Material::textured(Color::WHITE, "bricks/color")),
//! ));
//! ```
//!
//! Textures are referenced by key only. Loading them is the renderer's
//! business; until a texture is available (or if it never loads) the entity is
//! drawn with its material colour.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Linear RGBA colour.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// From 8-bit channels, e.g. `Color::rgb8(0xb3, 0x5f, 0x45)`.
    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);

    /// Parses `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .ok()
                .map(|v| v as f32 / 255.0)
        };
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Formats as `#rrggbb`, dropping alpha.
    pub fn to_hex(&self) -> String {
        let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", byte(self.r), byte(self.g), byte(self.b))
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value).ok_or_else(|| format!("expected #rrggbb colour, got '{value}'"))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

/// Debug label for an entity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Name(pub String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Key of a texture known to the renderer's asset provider.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TextureKey(pub String);

/// Parametric geometry, sized in local units before the entity's scale applies.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Cuboid {
        size: glam::Vec3,
        /// Subdivisions per edge.
        segments: u32,
    },
    Sphere {
        radius: f32,
        segments: u32,
    },
    Plane {
        width: f32,
        height: f32,
    },
    Cone {
        radius: f32,
        height: f32,
        sides: u32,
    },
    Cylinder {
        radius: f32,
        height: f32,
    },
    Torus {
        radius: f32,
        tube: f32,
    },
    /// Extruded text. Rendered as a placeholder box until a font is ready.
    Text {
        text: String,
        size: f32,
        depth: f32,
    },
}

impl Shape {
    /// A box with one segment per edge.
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        Shape::Cuboid {
            size: glam::Vec3::new(width, height, depth),
            segments: 1,
        }
    }

    pub fn sphere(radius: f32) -> Self {
        Shape::Sphere {
            radius,
            segments: 16,
        }
    }
}

/// Surface appearance.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub color: Color,
    pub texture: Option<TextureKey>,
    pub wireframe: bool,
    pub opacity: f32,
}

impl Material {
    pub fn color(color: Color) -> Self {
        Self {
            color,
            texture: None,
            wireframe: false,
            opacity: 1.0,
        }
    }

    pub fn textured(color: Color, texture: impl Into<String>) -> Self {
        Self {
            texture: Some(TextureKey(texture.into())),
            ..Self::color(color)
        }
    }
}

/// Component for drawable entities.
#[derive(Clone, Debug, PartialEq)]
pub struct Visual {
    pub shape: Shape,
    pub material: Material,
    pub visible: bool,
    pub cast_shadow: bool,
}

impl Visual {
    pub fn new(shape: Shape, material: Material) -> Self {
        Self {
            shape,
            material,
            visible: true,
            cast_shadow: false,
        }
    }

    pub fn casting_shadow(mut self) -> Self {
        self.cast_shadow = true;
        self
    }
}

/// Linear distance fog, blending towards `color` between `near` and `far`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fog {
    pub color: Color,
    pub near: f32,
    pub far: f32,
}

/// Component for light sources. Intensity fields are meant to be tuned live.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Light {
    Ambient {
        color: Color,
        intensity: f32,
    },
    Directional {
        color: Color,
        intensity: f32,
    },
    Point {
        color: Color,
        intensity: f32,
        /// Distance at which the light falls off to zero.
        range: f32,
    },
}

impl Light {
    pub fn intensity_mut(&mut self) -> &mut f32 {
        match self {
            Light::Ambient { intensity, .. }
            | Light::Directional { intensity, .. }
            | Light::Point { intensity, .. } => intensity,
        }
    }
}
