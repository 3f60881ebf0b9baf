use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::camera::{DEFAULT_FAR_PLANE, DEFAULT_FIELD_OF_VIEW, DEFAULT_NEAR_PLANE};
use crate::core::orbit_input::DEFAULT_ORBIT_SENSITIVITY;
use crate::renderer::DEFAULT_CLEAR_COLOR;
use crate::scenes::SCENE_COUNT;
use crate::state::CameraPose;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Window settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Orbit Viewer".to_string(),
            width: 800,
            height: 600,
        }
    }
}

/// Projection, orbit and home pose
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub field_of_view: f32,
    pub near: f32,
    pub far: f32,
    /// Orbit degrees per pixel of pointer motion
    pub sensitivity: f32,
    pub home_position: [f32; 3],
    pub home_target: [f32; 3],
}

impl CameraConfig {
    pub fn home_pose(&self) -> CameraPose {
        CameraPose {
            position: Vec3::from_array(self.home_position),
            target: Vec3::from_array(self.home_target),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        let home = CameraPose::default();
        Self {
            field_of_view: DEFAULT_FIELD_OF_VIEW,
            near: DEFAULT_NEAR_PLANE,
            far: DEFAULT_FAR_PLANE,
            sensitivity: DEFAULT_ORBIT_SENSITIVITY,
            home_position: home.position.to_array(),
            home_target: home.target.to_array(),
        }
    }
}

/// Initial toggles and content sources
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Zero-based scene slot shown at startup
    pub scene: usize,
    pub show_solid: bool,
    pub show_wireframe: bool,
    pub clear_color: [f32; 4],
    /// glTF file for the mesh scene
    pub mesh: Option<PathBuf>,
    /// Directory of extra `*.wgsl` materials
    pub shader_dir: Option<PathBuf>,
    pub show_hud: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            scene: 0,
            show_solid: true,
            show_wireframe: false,
            clear_color: DEFAULT_CLEAR_COLOR,
            mesh: None,
            shader_dir: None,
            show_hud: true,
        }
    }
}

/// Complete viewer configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ViewerConfig {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

impl ViewerConfig {
    /// Reads a JSON config; missing fields take their defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Rejects values the viewer cannot start with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |message: String| Err(ConfigError::Invalid(message));

        if self.window.width == 0 || self.window.height == 0 {
            return invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            ));
        }
        let camera = &self.camera;
        if !(camera.field_of_view > 0.0 && camera.field_of_view < 180.0) {
            return invalid(format!(
                "field of view must be within (0, 180) degrees, got {}",
                camera.field_of_view
            ));
        }
        if !(camera.near > 0.0 && camera.near < camera.far && camera.far.is_finite()) {
            return invalid(format!(
                "clip planes must satisfy 0 < near < far, got near={} far={}",
                camera.near, camera.far
            ));
        }
        if !camera.sensitivity.is_finite() {
            return invalid(format!("sensitivity must be finite, got {}", camera.sensitivity));
        }
        let home = camera.home_pose();
        if !home.position.is_finite() || !home.target.is_finite() {
            return invalid("home position and target must be finite".to_string());
        }
        if home.position.distance_squared(home.target) <= f32::EPSILON {
            return invalid("home position and target must differ".to_string());
        }
        if self.render.scene >= SCENE_COUNT {
            return invalid(format!(
                "scene must be between 1 and {}, got {}",
                SCENE_COUNT,
                self.render.scene + 1
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ViewerConfig::default();
        config.validate().unwrap();
        assert_eq!(config.camera.sensitivity, -0.4);
        assert_eq!(config.camera.home_position, [0.0, 0.0, -3.0]);
        assert!(config.render.show_solid);
        assert!(!config.render.show_wireframe);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: ViewerConfig =
            serde_json::from_str(r#"{ "camera": { "field_of_view": 60.0 }, "render": { "show_wireframe": true } }"#)
                .unwrap();
        assert_eq!(config.camera.field_of_view, 60.0);
        assert_eq!(config.camera.near, DEFAULT_NEAR_PLANE);
        assert!(config.render.show_wireframe);
        assert!(config.render.show_solid);
        assert_eq!(config.window, WindowConfig::default());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ViewerConfig::default();
        config.camera.field_of_view = 180.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = ViewerConfig::default();
        config.camera.near = 10.0;
        config.camera.far = 1.0;
        assert!(config.validate().is_err());

        let mut config = ViewerConfig::default();
        config.render.scene = 3;
        assert!(config.validate().is_err());

        let mut config = ViewerConfig::default();
        config.camera.home_target = config.camera.home_position;
        assert!(config.validate().is_err());

        let mut config = ViewerConfig::default();
        config.window.height = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_round_trips_through_file() {
        let path = std::env::temp_dir().join(format!("orbit-viewer-config-{}.json", std::process::id()));
        let mut config = ViewerConfig::default();
        config.render.scene = 2;
        config.camera.sensitivity = -0.25;
        fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

        let loaded = ViewerConfig::load(&path);
        fs::remove_file(&path).unwrap();
        assert_eq!(loaded.unwrap(), config);
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let path = std::env::temp_dir().join(format!("orbit-viewer-bad-{}.json", std::process::id()));
        fs::write(&path, "{ not json").unwrap();
        let err = ViewerConfig::load(&path).unwrap_err();
        fs::remove_file(&path).unwrap();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
