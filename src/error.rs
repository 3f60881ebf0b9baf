use std::path::PathBuf;

use glam::Vec3;

use crate::scene::{GeometryId, MaterialId};

/// Rejected camera mutations. The camera is left unchanged when one of these is returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CameraError {
    #[error("aspect ratio must be finite and positive, got {0}")]
    InvalidAspectRatio(f32),
    #[error("field of view must be within (0, 180) degrees, got {0}")]
    InvalidFieldOfView(f32),
    #[error("clip planes must satisfy 0 < near < far, got near={near} far={far}")]
    InvalidClipPlanes { near: f32, far: f32 },
    #[error("position must be finite, got {0:?}")]
    NonFinitePosition(Vec3),
    #[error("cannot look at {target:?} from the same position")]
    DegenerateLookAt { target: Vec3 },
}

/// Toggle/selection state errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("scene index {index} is out of range (scene count {count})")]
    SceneOutOfRange { index: usize, count: usize },
    #[error("a viewer needs at least one scene")]
    NoScenes,
}

/// Errors raised by input handlers while advancing the viewer state
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ViewerError {
    #[error(transparent)]
    Camera(#[from] CameraError),
    #[error(transparent)]
    State(#[from] StateError),
}

/// Failures reported by a pass backend
#[derive(Debug, thiserror::Error)]
pub enum GraphicsError {
    #[error("no frame has been acquired; call clear() first")]
    NoFrame,
    #[error("a pass is already being recorded")]
    PassAlreadyOpen,
    #[error("no pass is being recorded")]
    NoOpenPass,
    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
    #[error("unknown geometry {0:?}")]
    UnknownGeometry(GeometryId),
    #[error("unknown material {0:?}")]
    UnknownMaterial(MaterialId),
    #[error("GPU validation error: {0}")]
    Validation(String),
    #[error("adapter does not support required feature {0}")]
    MissingFeature(&'static str),
    #[error("failed to acquire GPU: {0}")]
    Device(String),
}

/// Orchestrator errors; every one of them is fatal for the run
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("{pass} pass requested before the frame was cleared")]
    FrameNotCleared { pass: &'static str },
    #[error("failed to clear frame: {0}")]
    Clear(#[source] GraphicsError),
    #[error("{pass} pass failed: {source}")]
    Pass {
        pass: &'static str,
        #[source]
        source: GraphicsError,
    },
    #[error("failed to present frame: {0}")]
    Present(#[source] GraphicsError),
}

/// Scene construction failures
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("no material named '{0}' is registered")]
    UnknownMaterial(String),
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Fatal errors raised before the frame loop starts
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("shader compilation failed for material '{material}': {message}")]
    ShaderCompilation { material: String, message: String },
    #[error(transparent)]
    Graphics(#[from] GraphicsError),
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error(transparent)]
    Camera(#[from] CameraError),
    #[error(transparent)]
    State(#[from] StateError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pass_error_names_the_pass() {
        let err = RenderError::Pass {
            pass: "wireframe",
            source: GraphicsError::Validation("bad pipeline".to_string()),
        };
        let message = err.to_string();
        assert!(message.contains("wireframe"));
        assert!(message.contains("bad pipeline"));
    }

    #[test]
    fn test_viewer_error_is_transparent() {
        let err: ViewerError = CameraError::InvalidAspectRatio(0.0).into();
        assert_eq!(err.to_string(), "aspect ratio must be finite and positive, got 0");
    }

    #[test]
    fn test_shader_error_message() {
        let err = StartupError::ShaderCompilation {
            material: "noise".to_string(),
            message: "unknown identifier".to_string(),
        };
        assert!(err.to_string().contains("'noise'"));
    }
}
