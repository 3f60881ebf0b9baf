use std::path::Path;

use glam::{Mat4, Vec3};

use crate::error::SceneError;
use crate::loaders::load_gltf_mesh;
use crate::scene::material::SOLID_MATERIAL;
use crate::scene::{GeometryLibrary, MaterialLibrary, Mesh, Scene, SceneObject};

/// Single mesh scene. Loads `mesh_path` when given, else a procedural torus.
///
/// A mesh that fails to load, including a file without triangles, is logged and
/// replaced by the torus.
pub fn create_monkey_scene(
    materials: &MaterialLibrary,
    geometry: &mut GeometryLibrary,
    mesh_path: Option<&Path>,
) -> Result<Scene, SceneError> {
    let solid = materials.id(SOLID_MATERIAL)?;

    let mesh = match mesh_path.map(load_gltf_mesh) {
        Some(Ok(mesh)) => mesh,
        Some(Err(err)) => {
            log::warn!("{:#}; using the built-in torus instead", err);
            fallback_mesh()
        }
        None => fallback_mesh(),
    };

    let id = geometry.add(mesh);
    let mut scene = Scene::new("monkey");
    scene.push(
        SceneObject::new("mesh", id, solid)
            .with_transform(Mat4::from_rotation_x(20f32.to_radians()))
            .with_color([0.8, 0.75, 0.6, 1.0]),
    );

    let floor = geometry.add(Mesh::plane(4.0, 8, [0.35, 0.35, 0.4]));
    scene.push(
        SceneObject::new("floor", floor, solid)
            .with_transform(Mat4::from_translation(Vec3::new(0.0, -1.0, 0.0))),
    );
    Ok(scene)
}

fn fallback_mesh() -> Mesh {
    Mesh::torus(0.7, 0.3, 48, 24, [1.0, 1.0, 1.0])
}
