mod monkey;
mod noise;
mod terrain;

use std::path::Path;

use crate::error::SceneError;
use crate::scene::{GeometryLibrary, MaterialLibrary, Scene};

pub use monkey::create_monkey_scene;
pub use noise::create_noise_scene;
pub use terrain::{create_terrain_scene, terrain_mesh};

/// Number of scene slots bound to the `1`..`3` keys
pub const SCENE_COUNT: usize = 3;

/// Builds the noise, monkey and terrain scenes in slot order
pub fn create_scenes(
    materials: &MaterialLibrary,
    geometry: &mut GeometryLibrary,
    mesh_path: Option<&Path>,
) -> Result<Vec<Scene>, SceneError> {
    let scenes = vec![
        create_noise_scene(materials, geometry)?,
        create_monkey_scene(materials, geometry, mesh_path)?,
        create_terrain_scene(materials, geometry)?,
    ];
    for (slot, scene) in scenes.iter().enumerate() {
        log::info!("Scene {}: '{}' ({} objects)", slot + 1, scene.name, scene.len());
    }
    Ok(scenes)
}
