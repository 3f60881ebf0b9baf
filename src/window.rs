use std::sync::Arc;

use winit::error::OsError;
use winit::event_loop::ActiveEventLoop;
use winit::window::Window as WinitWindow;

use crate::config::WindowConfig;

/// Shared handle to the viewer's winit window
#[derive(Debug, Clone)]
pub struct Window {
    inner: Arc<WinitWindow>,
}

impl Window {
    pub fn new(window: Arc<WinitWindow>) -> Self {
        Self { inner: window }
    }

    /// Opens a window with the configured title and logical size
    pub fn create(event_loop: &ActiveEventLoop, config: &WindowConfig) -> Result<Self, OsError> {
        let window = event_loop.create_window(
            WinitWindow::default_attributes()
                .with_title(config.title.as_str())
                .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height)),
        )?;
        Ok(Self::new(Arc::new(window)))
    }

    pub fn inner(&self) -> &Arc<WinitWindow> {
        &self.inner
    }

    pub fn request_redraw(&self) {
        self.inner.request_redraw();
    }

    pub fn inner_size(&self) -> winit::dpi::PhysicalSize<u32> {
        self.inner.inner_size()
    }

    /// Width over height of the drawable area, `None` while minimized
    pub fn aspect_ratio(&self) -> Option<f32> {
        aspect_ratio(self.inner_size())
    }
}

fn aspect_ratio(size: winit::dpi::PhysicalSize<u32>) -> Option<f32> {
    (size.width > 0 && size.height > 0).then(|| size.width as f32 / size.height as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalSize;

    #[test]
    fn test_aspect_ratio() {
        assert_eq!(aspect_ratio(PhysicalSize::new(800, 600)), Some(800.0 / 600.0));
        assert_eq!(aspect_ratio(PhysicalSize::new(800, 0)), None);
        assert_eq!(aspect_ratio(PhysicalSize::new(0, 0)), None);
    }
}
