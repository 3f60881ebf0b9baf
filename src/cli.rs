// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

use crate::config::{ConfigError, ViewerConfig};

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "orbit-viewer")]
#[command(about = "Orbit a camera around solid and wireframe scenes", long_about = None)]
pub struct Cli {
    /// JSON config file; flags below override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Scene shown at startup (1-3)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=3))]
    pub scene: Option<u8>,

    /// Start with the wireframe pass enabled
    #[arg(long)]
    pub wireframe: bool,

    /// Start with the solid pass disabled
    #[arg(long = "hide-solid")]
    pub hide_solid: bool,

    /// Orbit degrees per pixel of pointer motion
    #[arg(long, allow_negative_numbers = true)]
    pub sensitivity: Option<f32>,

    /// Vertical field of view in degrees
    #[arg(long)]
    pub fov: Option<f32>,

    /// glTF mesh for the mesh scene
    #[arg(long)]
    pub mesh: Option<PathBuf>,

    /// Directory of extra or overriding *.wgsl materials
    #[arg(long = "shader-dir")]
    pub shader_dir: Option<PathBuf>,

    /// Disable the HUD overlay
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,
}

impl Cli {
    /// Loads `--config` (or defaults), applies the flags on top and validates the result
    pub fn resolve(&self) -> Result<ViewerConfig, ConfigError> {
        let base = match &self.config {
            Some(path) => ViewerConfig::load(path)?,
            None => ViewerConfig::default(),
        };
        let config = self.apply(base);
        config.validate()?;
        Ok(config)
    }

    pub fn apply(&self, mut config: ViewerConfig) -> ViewerConfig {
        if let Some(scene) = self.scene {
            config.render.scene = usize::from(scene.saturating_sub(1));
        }
        if self.wireframe {
            config.render.show_wireframe = true;
        }
        if self.hide_solid {
            config.render.show_solid = false;
        }
        if let Some(sensitivity) = self.sensitivity {
            config.camera.sensitivity = sensitivity;
        }
        if let Some(fov) = self.fov {
            config.camera.field_of_view = fov;
        }
        if let Some(mesh) = &self.mesh {
            config.render.mesh = Some(mesh.clone());
        }
        if let Some(dir) = &self.shader_dir {
            config.render.shader_dir = Some(dir.clone());
        }
        if self.no_ui {
            config.render.show_hud = false;
        }
        config
    }
}
