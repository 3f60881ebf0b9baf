pub mod backend;
pub mod controller;
pub mod events;
pub mod gpu_context;
pub mod input_adapter;
pub mod orbit_input;
pub mod pass;
pub mod surface_renderer;
pub mod timer;

pub use backend::{DrawCommand, PassBackend};
pub use controller::{Button, Controller};
pub use events::{EventDispatcher, InputEvent, Key, KeyEvent, PointerDelta, PointerSample, ResizeEvent};
pub use gpu_context::GpuContext;
pub use input_adapter::WinitController;
pub use orbit_input::OrbitInput;
pub use pass::{DepthBias, PassKind, PolygonMode, RasterState};
pub use surface_renderer::SurfaceRenderer;
pub use timer::{FixedHz, FpsCounter};
