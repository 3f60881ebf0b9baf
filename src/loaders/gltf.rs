use anyhow::{bail, Context, Result};
use glam::{Mat3, Mat4, Vec3};
use std::path::Path;

use crate::scene::geometry::area_weighted_normals;
use crate::scene::Mesh;
use crate::types::Vertex;

/// Loads every triangle primitive of a glTF file into one indexed mesh.
///
/// Node transforms are baked into the vertices. Vertex colors come from each
/// primitive's base color factor. Primitives without normals get area-weighted
/// normals from their own triangles.
pub fn load_gltf_mesh(path: impl AsRef<Path>) -> Result<Mesh> {
    let path = path.as_ref();
    log::info!("Loading glTF file: {:?}", path);

    let (gltf, buffers, _images) =
        gltf::import(path).with_context(|| format!("Failed to load glTF file: {:?}", path))?;

    log::debug!(
        "glTF loaded: {} scenes, {} nodes, {} meshes",
        gltf.scenes().count(),
        gltf.nodes().count(),
        gltf.meshes().count()
    );

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("gltf")
        .to_string();
    let mut builder = MeshBuilder::default();

    for scene in gltf.scenes() {
        for node in scene.nodes() {
            process_node(&node, &buffers, &Mat4::IDENTITY, &mut builder)?;
        }
    }

    if builder.indices.is_empty() {
        bail!("glTF file {:?} contains no triangles", path);
    }

    let mesh = Mesh::new(name, builder.vertices, builder.indices);
    log::info!(
        "Extracted {} triangles ({} vertices) from glTF",
        mesh.triangle_count(),
        mesh.vertices.len()
    );
    Ok(mesh)
}

#[derive(Default)]
struct MeshBuilder {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

/// Recursively processes glTF nodes
fn process_node(
    node: &gltf::Node,
    buffers: &[gltf::buffer::Data],
    parent_transform: &Mat4,
    builder: &mut MeshBuilder,
) -> Result<()> {
    let local_transform = Mat4::from_cols_array_2d(&node.transform().matrix());
    let global_transform = *parent_transform * local_transform;

    if let Some(mesh) = node.mesh() {
        process_mesh(&mesh, buffers, &global_transform, builder)?;
    }

    for child in node.children() {
        process_node(&child, buffers, &global_transform, builder)?;
    }

    Ok(())
}

fn process_mesh(
    mesh: &gltf::Mesh,
    buffers: &[gltf::buffer::Data],
    transform: &Mat4,
    builder: &mut MeshBuilder,
) -> Result<()> {
    log::debug!("Processing mesh: {:?}", mesh.name());
    let normal_matrix = Mat3::from_mat4(*transform).inverse().transpose();

    for primitive in mesh.primitives() {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            log::warn!("Skipping non-triangle primitive ({:?})", primitive.mode());
            continue;
        }

        let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| &data.0[..]));

        let positions: Vec<Vec3> = reader
            .read_positions()
            .context("Mesh primitive has no positions")?
            .map(|pos| transform.transform_point3(Vec3::from_array(pos)))
            .collect();

        let normals: Option<Vec<Vec3>> = reader.read_normals().map(|normals| {
            normals
                .map(|n| (normal_matrix * Vec3::from_array(n)).try_normalize().unwrap_or(Vec3::Y))
                .collect()
        });

        let [r, g, b, _] = primitive
            .material()
            .pbr_metallic_roughness()
            .base_color_factor();

        let base = builder.vertices.len() as u32;
        for (i, position) in positions.iter().enumerate() {
            let normal = normals
                .as_ref()
                .and_then(|n| n.get(i).copied())
                .unwrap_or(Vec3::Y);
            builder
                .vertices
                .push(Vertex::new(position.to_array(), normal.to_array(), [r, g, b]));
        }

        let count = positions.len() as u32;
        let local_indices: Vec<u32> = match reader.read_indices() {
            Some(indices) => indices.into_u32().collect(),
            // No indices - treat as triangle list
            None => (0..count).collect(),
        };

        let triangles = &local_indices[..local_indices.len() - local_indices.len() % 3];
        if triangles.iter().any(|&i| i >= count) {
            bail!("Mesh {:?} has an index out of range", mesh.name());
        }
        if normals.is_none() {
            area_weighted_normals(&mut builder.vertices[base as usize..], triangles);
        }
        builder
            .indices
            .extend(triangles.iter().map(|&i| base + i));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_an_error() {
        let err = load_gltf_mesh("/definitely/not/here.gltf").unwrap_err();
        assert!(err.to_string().contains("Failed to load glTF file"));
    }

    #[test]
    fn test_embedded_triangle_loads() {
        // One triangle, positions only, buffer embedded as a data URI
        let positions: [[f32; 3]; 3] = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let bytes: &[u8] = bytemuck::cast_slice(&positions);
        let uri = format!("data:application/octet-stream;base64,{}", base64_encode(bytes));
        let document = format!(
            r#"{{
  "asset": {{ "version": "2.0" }},
  "scene": 0,
  "scenes": [{{ "nodes": [0] }}],
  "nodes": [{{ "mesh": 0, "translation": [0.0, 0.0, 2.0] }}],
  "meshes": [{{ "primitives": [{{ "attributes": {{ "POSITION": 0 }} }}] }}],
  "accessors": [{{
    "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
    "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0]
  }}],
  "bufferViews": [{{ "buffer": 0, "byteLength": 36 }}],
  "buffers": [{{ "byteLength": 36, "uri": "{}" }}]
}}"#,
            uri
        );

        let path = std::env::temp_dir().join(format!("orbit-viewer-triangle-{}.gltf", std::process::id()));
        std::fs::write(&path, document).unwrap();
        let mesh = load_gltf_mesh(&path);
        std::fs::remove_file(&path).unwrap();
        let mesh = mesh.unwrap();

        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        assert_eq!(mesh.vertices[1].position, [1.0, 0.0, 2.0]);
        // Counter-clockwise in XY, recomputed normal faces +Z
        assert!((Vec3::from_array(mesh.vertices[0].normal) - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_supplied_normals_survive_a_sibling_without_normals() {
        // Primitive 0 carries +X normals, primitive 1 has positions only
        let lit: [[f32; 3]; 3] = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let normals: [[f32; 3]; 3] = [[1.0, 0.0, 0.0]; 3];
        let bare: [[f32; 3]; 3] = [[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [0.0, 1.0, 1.0]];
        let mut bytes = Vec::new();
        for block in [&lit, &normals, &bare] {
            bytes.extend_from_slice(bytemuck::cast_slice(block));
        }
        let uri = format!("data:application/octet-stream;base64,{}", base64_encode(&bytes));
        let document = format!(
            r#"{{
  "asset": {{ "version": "2.0" }},
  "scene": 0,
  "scenes": [{{ "nodes": [0] }}],
  "nodes": [{{ "mesh": 0 }}],
  "meshes": [{{ "primitives": [
    {{ "attributes": {{ "POSITION": 0, "NORMAL": 1 }} }},
    {{ "attributes": {{ "POSITION": 2 }} }}
  ] }}],
  "accessors": [
    {{ "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
       "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] }},
    {{ "bufferView": 1, "componentType": 5126, "count": 3, "type": "VEC3" }},
    {{ "bufferView": 2, "componentType": 5126, "count": 3, "type": "VEC3",
       "min": [0.0, 0.0, 1.0], "max": [1.0, 1.0, 1.0] }}
  ],
  "bufferViews": [
    {{ "buffer": 0, "byteOffset": 0, "byteLength": 36 }},
    {{ "buffer": 0, "byteOffset": 36, "byteLength": 36 }},
    {{ "buffer": 0, "byteOffset": 72, "byteLength": 36 }}
  ],
  "buffers": [{{ "byteLength": 108, "uri": "{}" }}]
}}"#,
            uri
        );

        let path = std::env::temp_dir().join(format!("orbit-viewer-normals-{}.gltf", std::process::id()));
        std::fs::write(&path, document).unwrap();
        let mesh = load_gltf_mesh(&path);
        std::fs::remove_file(&path).unwrap();
        let mesh = mesh.unwrap();

        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.indices, vec![0, 1, 2, 3, 4, 5]);
        for vertex in &mesh.vertices[..3] {
            assert!((Vec3::from_array(vertex.normal) - Vec3::X).length() < 1e-5);
        }
        for vertex in &mesh.vertices[3..] {
            assert!((Vec3::from_array(vertex.normal) - Vec3::Z).length() < 1e-5);
        }
    }

    fn base64_encode(bytes: &[u8]) -> String {
        const TABLE: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
        let mut out = String::new();
        for chunk in bytes.chunks(3) {
            let b = [chunk[0], *chunk.get(1).unwrap_or(&0), *chunk.get(2).unwrap_or(&0)];
            let n = (b[0] as u32) << 16 | (b[1] as u32) << 8 | b[2] as u32;
            for i in 0..4 {
                if i <= chunk.len() {
                    out.push(TABLE[(n >> (18 - 6 * i) & 63) as usize] as char);
                } else {
                    out.push('=');
                }
            }
        }
        out
    }
}
