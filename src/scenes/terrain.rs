use glam::{Mat4, Vec2, Vec3};

use crate::error::SceneError;
use crate::math::{height_color, ValueNoise};
use crate::scene::material::TERRAIN_MATERIAL;
use crate::scene::{GeometryLibrary, MaterialLibrary, Mesh, Scene, SceneObject};

const TERRAIN_SIZE: f32 = 4.0;
const TERRAIN_DIVISIONS: u32 = 128;
const TERRAIN_HEIGHT: f32 = 0.8;
const WATER_FRACTION: f32 = 0.35;

/// fbm heightfield colored by height; the terrain shader floods everything below y = 0
pub fn create_terrain_scene(materials: &MaterialLibrary, geometry: &mut GeometryLibrary) -> Result<Scene, SceneError> {
    let terrain = materials.id(TERRAIN_MATERIAL)?;
    let mesh = terrain_mesh(ValueNoise::default());
    let id = geometry.add(mesh);

    let mut scene = Scene::new("terrain");
    scene.push(
        SceneObject::new("terrain", id, terrain)
            .with_transform(Mat4::from_translation(Vec3::new(0.0, -0.5, 0.0))),
    );
    Ok(scene)
}

/// Heights are fbm in `[0, 1]` shifted so that `WATER_FRACTION` of the range lies below zero
pub fn terrain_mesh(noise: ValueNoise) -> Mesh {
    let height = |x: f32, z: f32| {
        let h = noise.fbm(Vec2::new(x, z) * 1.5, 5, 2.0, 0.5);
        (h - WATER_FRACTION) * TERRAIN_HEIGHT
    };
    let mut mesh = Mesh::heightfield(TERRAIN_SIZE, TERRAIN_DIVISIONS, [1.0; 3], height);
    for vertex in &mut mesh.vertices {
        let t = vertex.position[1] / TERRAIN_HEIGHT + WATER_FRACTION;
        vertex.color = height_color(t);
    }
    mesh.name = "terrain".to_string();
    mesh
}
