//! The demo scenes.
//!
//! Each scene is a builder that populates a [`Stage`] and returns handles to
//! whatever it exposes for live tuning. The resize and frame wiring is the
//! stage's own and is shared by every scene.

mod debug_ui;
mod first_project;
mod haunted_house;
mod text3d;
mod textures;

pub use debug_ui::{CubeTweaks, DebugUi};
pub use first_project::FirstProject;
pub use haunted_house::{HauntedHouse, LightTweaks};
pub use text3d::Text3d;
pub use textures::Textures;

use glam::Vec3;

use crate::config::StageConfig;
use crate::error::Result;
use crate::placement::PlacementSpec;
use crate::renderer::Renderer;
use crate::stage::Stage;

/// Selects a scene from the command line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Demo {
    /// A single pink box.
    FirstProject,
    /// A wireframe cube with a tweak panel.
    DebugUi,
    /// A textured box.
    Textures,
    /// Floating title text surrounded by spinning donuts.
    #[value(name = "text3d")]
    Text3d,
    /// A house on a lawn with graves, rocks and orbiting ghost lights.
    #[default]
    HauntedHouse,
}

impl Demo {
    pub const ALL: [Demo; 5] = [
        Demo::FirstProject,
        Demo::DebugUi,
        Demo::Textures,
        Demo::Text3d,
        Demo::HauntedHouse,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Demo::FirstProject => "First project",
            Demo::DebugUi => "Debug UI",
            Demo::Textures => "Textures",
            Demo::Text3d => "3D text",
            Demo::HauntedHouse => "Haunted house",
        }
    }

    /// Populates `stage` with this scene. Tweak handles are dropped; embedders
    /// that want them call the scene's own `build`.
    pub fn build<R: Renderer>(self, stage: &mut Stage<R>, config: &StageConfig) -> Result<()> {
        match self {
            Demo::FirstProject => {
                FirstProject::build(stage, config);
            }
            Demo::DebugUi => {
                DebugUi::build(stage, config);
            }
            Demo::Textures => {
                Textures::build(stage, config);
            }
            Demo::Text3d => {
                Text3d::build(stage, config)?;
            }
            Demo::HauntedHouse => {
                HauntedHouse::build(stage, config)?;
            }
        }
        log::info!(
            "built '{}' with {} entities ({} animated)",
            self.title(),
            stage.world().len(),
            stage.scheduler().registered().len()
        );
        Ok(())
    }
}

/// Puts the camera at the scene's default spot, unless the config overrides it.
fn place_camera<R: Renderer>(stage: &mut Stage<R>, config: &StageConfig, default: Vec3) {
    let camera = stage.camera_mut();
    camera.position = config.camera.position.unwrap_or(default);
    camera.target = Vec3::ZERO;
}

/// Applies the configured seed, offset by `salt` so that populations in one
/// scene do not share a random sequence.
fn seeded(spec: PlacementSpec, config: &StageConfig, salt: u64) -> PlacementSpec {
    match config.seed {
        Some(seed) => spec.seed(seed.wrapping_add(salt)),
        None => spec,
    }
}
