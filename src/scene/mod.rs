pub mod geometry;
pub mod material;

use glam::Mat4;

pub use geometry::{GeometryId, GeometryLibrary, Mesh};
pub use material::{Material, MaterialId, MaterialLibrary};

/// One drawable entry of a scene
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub name: String,
    pub geometry: GeometryId,
    pub material: MaterialId,
    pub transform: Mat4,
    pub color: [f32; 4],
}

impl SceneObject {
    pub fn new(name: impl Into<String>, geometry: GeometryId, material: MaterialId) -> Self {
        Self {
            name: name.into(),
            geometry,
            material,
            transform: Mat4::IDENTITY,
            color: [1.0; 4],
        }
    }

    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = color;
        self
    }
}

/// Flat, ordered list of objects drawn by every pass
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub name: String,
    pub objects: Vec<SceneObject>,
}

impl Scene {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            objects: Vec::new(),
        }
    }

    pub fn push(&mut self, object: SceneObject) -> &mut Self {
        self.objects.push(object);
        self
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
