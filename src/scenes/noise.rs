use glam::{Mat4, Vec3};

use crate::error::SceneError;
use crate::scene::material::{NOISE_MATERIAL, SOLID_MATERIAL};
use crate::scene::{GeometryLibrary, MaterialLibrary, Mesh, Scene, SceneObject};

/// Noise-displaced sphere floating over a displaced ground plane
pub fn create_noise_scene(materials: &MaterialLibrary, geometry: &mut GeometryLibrary) -> Result<Scene, SceneError> {
    let noise = materials.id(NOISE_MATERIAL)?;
    let solid = materials.id(SOLID_MATERIAL)?;

    let sphere = geometry.add(Mesh::uv_sphere(0.8, 48, 32, [0.9, 0.6, 0.3]));
    let ground = geometry.add(Mesh::plane(6.0, 48, [0.4, 0.7, 0.9]));
    let marker = geometry.add(Mesh::cube(0.2, [1.0, 1.0, 1.0]));

    let mut scene = Scene::new("noise");
    scene
        .push(SceneObject::new("sphere", sphere, noise))
        .push(
            SceneObject::new("ground", ground, noise)
                .with_transform(Mat4::from_translation(Vec3::new(0.0, -1.2, 0.0))),
        )
        .push(
            SceneObject::new("origin", marker, solid)
                .with_transform(Mat4::from_translation(Vec3::new(0.0, 1.3, 0.0)))
                .with_color([1.0, 0.3, 0.3, 1.0]),
        );
    Ok(scene)
}
