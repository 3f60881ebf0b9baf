pub mod camera;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod frame;
pub mod hud;
pub mod loaders;
pub mod math;
pub mod renderer;
pub mod scene;
pub mod scenes;
pub mod state;
pub mod transform;
pub mod types;
pub mod window;

pub use camera::Camera;
pub use error::{CameraError, GraphicsError, RenderError, SceneError, StartupError, StateError, ViewerError};
pub use renderer::Renderer;
pub use state::{CameraPose, ToggleState, ViewerState};
pub use transform::Transform;
