use std::borrow::Cow;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::SceneError;

/// Handle to a material registered in a [`MaterialLibrary`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub usize);

pub const SOLID_MATERIAL: &str = "solid";
pub const NOISE_MATERIAL: &str = "noise";
pub const TERRAIN_MATERIAL: &str = "terrain";

const SOLID_SHADER: &str = include_str!("../shaders/solid.wgsl");
const NOISE_SHADER: &str = include_str!("../shaders/noise.wgsl");
const TERRAIN_SHADER: &str = include_str!("../shaders/terrain.wgsl");

/// A named WGSL program with `vs_main`/`fs_main` entry points
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Material {
    pub name: String,
    pub source: Cow<'static, str>,
}

/// Registry of materials, looked up by name when scenes are built
#[derive(Debug, Default)]
pub struct MaterialLibrary {
    materials: Vec<Material>,
    by_name: HashMap<String, MaterialId>,
}

impl MaterialLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Library holding the built-in `solid`, `noise` and `terrain` materials
    pub fn with_builtins() -> Self {
        let mut library = Self::new();
        library.register(SOLID_MATERIAL, SOLID_SHADER);
        library.register(NOISE_MATERIAL, NOISE_SHADER);
        library.register(TERRAIN_MATERIAL, TERRAIN_SHADER);
        library
    }

    /// Adds a material, replacing the source of an existing one with the same name
    pub fn register(&mut self, name: impl Into<String>, source: impl Into<Cow<'static, str>>) -> MaterialId {
        let name = name.into();
        let source = source.into();
        if let Some(&id) = self.by_name.get(&name) {
            self.materials[id.0].source = source;
            return id;
        }

        let id = MaterialId(self.materials.len());
        self.materials.push(Material {
            name: name.clone(),
            source,
        });
        self.by_name.insert(name, id);
        id
    }

    /// Registers every `*.wgsl` file in `dir` under its file stem
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize, SceneError> {
        let io_error = |source| SceneError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut paths = Vec::new();
        for entry in fs::read_dir(dir).map_err(io_error)? {
            let path = entry.map_err(io_error)?.path();
            if path.extension().is_some_and(|ext| ext == "wgsl") {
                paths.push(path);
            }
        }
        paths.sort();

        for path in &paths {
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                log::warn!("Skipping shader with non UTF-8 name: {:?}", path);
                continue;
            };
            let source = fs::read_to_string(path).map_err(|source| SceneError::Io {
                path: path.clone(),
                source,
            })?;
            log::info!("Loaded material '{}' from {:?}", name, path);
            self.register(name.to_string(), source);
        }
        Ok(paths.len())
    }

    pub fn id(&self, name: &str) -> Result<MaterialId, SceneError> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| SceneError::UnknownMaterial(name.to_string()))
    }

    pub fn get(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MaterialId, &Material)> {
        self.materials
            .iter()
            .enumerate()
            .map(|(index, material)| (MaterialId(index), material))
    }
}
