//! Stage configuration loaded from TOML.
//!
//! Every struct here implements `Default` with the values the demos were
//! tuned with, and uses `#[serde(default)]`, so a config file only needs the
//! keys it changes:
//!
//! ```toml
//! seed = 7
//!
//! [viewport]
//! pixel_ratio_cap = 1.0
//!
//! [haunted_house]
//! grave_count = 80
//! ```

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::animation::Orbit;
use crate::ecs::{Color, Fog};
use crate::placement::FrameAssembly;

/// Load/save for any serde config type, keyed on the file extension.
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !is_toml(path) {
            return Err(ConfigError::UnsupportedFormat(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if !is_toml(path) {
            return Err(ConfigError::UnsupportedFormat(path.display().to_string()));
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "toml")
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("serialization error: {0}")]
    Serialize(String),

    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),
}

/// Top-level configuration for a [`Stage`](crate::Stage) and the demo scenes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    /// Seed for every procedural layout. `None` draws a fresh layout each run.
    pub seed: Option<u64>,
    pub camera: CameraConfig,
    pub viewport: ViewportConfig,
    pub haunted_house: HauntedHouseConfig,
}

impl Config for StageConfig {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Overrides the demo's own camera position.
    pub position: Option<Vec3>,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 75.0,
            near: 0.1,
            far: 100.0,
            position: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Initial logical size, used by the headless host and as the window size.
    pub width: f32,
    pub height: f32,
    /// Upper bound on device pixels per logical pixel.
    pub pixel_ratio_cap: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            pixel_ratio_cap: 2.0,
        }
    }
}

/// Tunables of the haunted-house scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HauntedHouseConfig {
    pub grave_count: usize,
    pub grave_inner_radius: f32,
    pub grave_outer_radius: f32,
    pub rock_count: usize,
    /// Side of the square the rocks are scattered over.
    pub rock_area: f32,
    pub ghosts: Vec<GhostConfig>,
    pub window_frame: FrameAssembly,
    pub fog: Fog,
}

impl Default for HauntedHouseConfig {
    fn default() -> Self {
        Self {
            grave_count: 50,
            grave_inner_radius: 3.0,
            grave_outer_radius: 9.0,
            rock_count: 10,
            rock_area: 10.0,
            ghosts: vec![
                GhostConfig {
                    color: Color::rgb(1.0, 0.0, 1.0),
                    orbit: Orbit::new(0.5, 4.0).bob(3.0),
                },
                GhostConfig {
                    color: Color::rgb(0.0, 1.0, 1.0),
                    orbit: Orbit::new(-0.32, 5.0).bob(4.0).bob(2.5),
                },
                GhostConfig {
                    color: Color::rgb(1.0, 1.0, 0.0),
                    orbit: Orbit::new(-0.18, 7.0)
                        .wobble(0.32, 0.5, 1.0)
                        .bob(4.0)
                        .bob(2.5),
                },
            ],
            window_frame: FrameAssembly::default(),
            fog: Fog {
                color: Color::rgb8(0x26, 0x28, 0x37),
                near: 1.0,
                far: 15.0,
            },
        }
    }
}

/// One orbiting ghost light.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GhostConfig {
    pub color: Color,
    pub orbit: Orbit,
}
