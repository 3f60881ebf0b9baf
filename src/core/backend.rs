use crate::core::pass::{PassKind, RasterState};
use crate::error::GraphicsError;
use crate::scene::{GeometryId, MaterialId};
use crate::types::DrawUniform;

/// One object draw inside a pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    pub geometry: GeometryId,
    pub material: MaterialId,
    pub uniform: DrawUniform,
}

/// Graphics collaborator driven by the renderer.
///
/// A frame is `clear`, any number of `begin_pass`/`draw`/`end_pass` groups,
/// then `present`. `begin_pass` always receives the complete raster state of
/// the pass.
pub trait PassBackend {
    /// Acquires the frame and clears color and depth
    fn clear(&mut self, color: [f32; 4]) -> Result<(), GraphicsError>;

    fn begin_pass(&mut self, pass: PassKind, raster: &RasterState) -> Result<(), GraphicsError>;

    fn draw(&mut self, command: &DrawCommand) -> Result<(), GraphicsError>;

    fn end_pass(&mut self) -> Result<(), GraphicsError>;

    fn present(&mut self) -> Result<(), GraphicsError>;
}
