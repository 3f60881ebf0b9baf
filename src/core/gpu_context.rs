use std::sync::Arc;
use wgpu::{Adapter, Device, DeviceDescriptor, Features, Instance, Limits, Queue, Surface};

use crate::error::GraphicsError;

/// Features the wireframe pass cannot run without
pub const REQUIRED_FEATURES: Features = Features::POLYGON_MODE_LINE;

/// Shared GPU handles for the window surface
///
/// Device and queue are reference counted so the HUD renderer and the pass
/// backend can hold them without borrowing each other.
#[derive(Clone)]
pub struct GpuContext {
    adapter: Arc<Adapter>,
    device: Arc<Device>,
    queue: Arc<Queue>,
}

impl GpuContext {
    /// Create a GPU context compatible with a surface
    ///
    /// Fails with [`GraphicsError::MissingFeature`] when the adapter cannot
    /// rasterize polygons as lines.
    pub async fn new_with_surface(instance: &Instance, surface: &Surface<'_>) -> Result<Self, GraphicsError> {
        let adapter = Self::request_adapter(instance, surface).await?;
        let info = adapter.get_info();
        log::info!("Using adapter {} ({:?})", info.name, info.backend);

        check_features(adapter.features())?;
        let (device, queue) = Self::request_device(&adapter).await?;

        Ok(Self {
            adapter: Arc::new(adapter),
            device: Arc::new(device),
            queue: Arc::new(queue),
        })
    }

    pub fn adapter(&self) -> &Adapter {
        &self.adapter
    }

    /// Get reference to the device
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Get reference to the queue
    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    /// Request adapter with surface compatibility
    async fn request_adapter(instance: &Instance, surface: &Surface<'_>) -> Result<Adapter, GraphicsError> {
        instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| GraphicsError::Device(format!("Failed to find appropriate adapter: {}", e)))
    }

    /// Request device and queue
    async fn request_device(adapter: &Adapter) -> Result<(Device, Queue), GraphicsError> {
        let limits = Limits::default().using_resolution(adapter.limits());

        adapter
            .request_device(&DeviceDescriptor {
                label: Some("Orbit Viewer Device"),
                required_features: REQUIRED_FEATURES,
                required_limits: limits,
                memory_hints: Default::default(),
                experimental_features: Default::default(),
                trace: Default::default(),
            })
            .await
            .map_err(|e| GraphicsError::Device(format!("Failed to create device: {}", e)))
    }
}

fn check_features(supported: Features) -> Result<(), GraphicsError> {
    if supported.contains(Features::POLYGON_MODE_LINE) {
        Ok(())
    } else {
        Err(GraphicsError::MissingFeature("POLYGON_MODE_LINE"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_mode_is_required() {
        assert!(REQUIRED_FEATURES.contains(Features::POLYGON_MODE_LINE));
    }

    #[test]
    fn test_missing_line_mode_is_reported() {
        let err = check_features(Features::empty()).unwrap_err();
        assert!(matches!(err, GraphicsError::MissingFeature("POLYGON_MODE_LINE")));
        assert!(check_features(Features::POLYGON_MODE_LINE | Features::TIMESTAMP_QUERY).is_ok());
    }

    #[test]
    fn test_clone_semantics() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<GpuContext>();
    }
}
