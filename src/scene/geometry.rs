use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::types::Vertex;

/// Handle to a mesh registered in a [`GeometryLibrary`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryId(pub usize);

/// Indexed triangle list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub name: String,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new(name: impl Into<String>, vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self {
            name: name.into(),
            vertices,
            indices,
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.triangle_count() == 0
    }

    /// Flat square in the XZ plane centered on the origin, `divisions` quads per side
    pub fn plane(size: f32, divisions: u32, color: [f32; 3]) -> Self {
        let mut mesh = Self::heightfield(size, divisions, color, |_, _| 0.0);
        mesh.name = "plane".to_string();
        mesh
    }

    /// Grid in the XZ plane displaced along Y by `height(x, z)`; normals are recomputed
    pub fn heightfield(size: f32, divisions: u32, color: [f32; 3], height: impl Fn(f32, f32) -> f32) -> Self {
        let divisions = divisions.max(1);
        let step = size / divisions as f32;
        let half = size * 0.5;
        let row = divisions + 1;

        let mut vertices = Vec::with_capacity((row * row) as usize);
        for iz in 0..row {
            for ix in 0..row {
                let x = -half + ix as f32 * step;
                let z = -half + iz as f32 * step;
                vertices.push(Vertex::new([x, height(x, z), z], [0.0, 1.0, 0.0], color));
            }
        }

        let mut indices = Vec::with_capacity((divisions * divisions * 6) as usize);
        for iz in 0..divisions {
            for ix in 0..divisions {
                let i0 = iz * row + ix;
                let i1 = i0 + 1;
                let i2 = i0 + row;
                let i3 = i2 + 1;
                indices.extend_from_slice(&[i0, i2, i1, i1, i2, i3]);
            }
        }

        let mut mesh = Self::new("heightfield", vertices, indices);
        mesh.recompute_normals();
        mesh
    }

    pub fn uv_sphere(radius: f32, segments: u32, rings: u32, color: [f32; 3]) -> Self {
        let segments = segments.max(3);
        let rings = rings.max(2);

        let mut vertices = Vec::with_capacity(((segments + 1) * (rings + 1)) as usize);
        for ring in 0..=rings {
            let phi = PI * ring as f32 / rings as f32;
            for segment in 0..=segments {
                let theta = TAU * segment as f32 / segments as f32;
                let normal = Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin());
                vertices.push(Vertex::new((normal * radius).to_array(), normal.to_array(), color));
            }
        }

        let row = segments + 1;
        let mut indices = Vec::with_capacity((segments * rings * 6) as usize);
        for ring in 0..rings {
            for segment in 0..segments {
                let i0 = ring * row + segment;
                let i1 = i0 + 1;
                let i2 = i0 + row;
                let i3 = i2 + 1;
                if ring != 0 {
                    indices.extend_from_slice(&[i0, i1, i2]);
                }
                if ring != rings - 1 {
                    indices.extend_from_slice(&[i1, i3, i2]);
                }
            }
        }

        Self::new("sphere", vertices, indices)
    }

    /// Axis-aligned cube with per-face normals
    pub fn cube(size: f32, color: [f32; 3]) -> Self {
        let h = size * 0.5;
        // (normal, u, v) with u × v == normal so faces wind counter-clockwise outward
        let faces: [(Vec3, Vec3, Vec3); 6] = [
            (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::Z, Vec3::X),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (normal, u, v) in faces {
            let base = vertices.len() as u32;
            for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                let position = (normal + u * su + v * sv) * h;
                vertices.push(Vertex::new(position.to_array(), normal.to_array(), color));
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self::new("cube", vertices, indices)
    }

    /// Torus around the Y axis
    pub fn torus(major_radius: f32, minor_radius: f32, segments: u32, sides: u32, color: [f32; 3]) -> Self {
        let segments = segments.max(3);
        let sides = sides.max(3);

        let mut vertices = Vec::with_capacity(((segments + 1) * (sides + 1)) as usize);
        for segment in 0..=segments {
            let theta = TAU * segment as f32 / segments as f32;
            let center = Vec3::new(theta.cos(), 0.0, theta.sin()) * major_radius;
            for side in 0..=sides {
                let phi = TAU * side as f32 / sides as f32;
                let normal = Vec3::new(phi.cos() * theta.cos(), phi.sin(), phi.cos() * theta.sin());
                let position = center + normal * minor_radius;
                vertices.push(Vertex::new(position.to_array(), normal.to_array(), color));
            }
        }

        let row = sides + 1;
        let mut indices = Vec::with_capacity((segments * sides * 6) as usize);
        for segment in 0..segments {
            for side in 0..sides {
                let i0 = segment * row + side;
                let i1 = i0 + 1;
                let i2 = i0 + row;
                let i3 = i2 + 1;
                indices.extend_from_slice(&[i0, i1, i2, i1, i3, i2]);
            }
        }

        Self::new("torus", vertices, indices)
    }

    /// Area-weighted vertex normals from the triangle list
    pub fn recompute_normals(&mut self) {
        area_weighted_normals(&mut self.vertices, &self.indices);
    }

    /// Replaces every vertex color
    pub fn with_color(mut self, color: [f32; 3]) -> Self {
        for vertex in &mut self.vertices {
            vertex.color = color;
        }
        self
    }
}

/// Overwrites the normals of `vertices` from the triangles in `indices`.
///
/// Indices are local to `vertices`; triangles that reach outside it are skipped.
pub fn area_weighted_normals(vertices: &mut [Vertex], indices: &[u32]) {
    let mut accumulated = vec![Vec3::ZERO; vertices.len()];
    for triangle in indices.chunks_exact(3) {
        let [a, b, c] = [triangle[0], triangle[1], triangle[2]].map(|i| i as usize);
        if a >= vertices.len() || b >= vertices.len() || c >= vertices.len() {
            continue;
        }
        let pa = Vec3::from_array(vertices[a].position);
        let pb = Vec3::from_array(vertices[b].position);
        let pc = Vec3::from_array(vertices[c].position);
        let face = (pb - pa).cross(pc - pa);
        accumulated[a] += face;
        accumulated[b] += face;
        accumulated[c] += face;
    }

    for (vertex, normal) in vertices.iter_mut().zip(accumulated) {
        vertex.normal = normal.try_normalize().unwrap_or(Vec3::Y).to_array();
    }
}

/// Owns the meshes scenes refer to by [`GeometryId`]
#[derive(Debug, Default)]
pub struct GeometryLibrary {
    meshes: Vec<Mesh>,
}

impl GeometryLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, mesh: Mesh) -> GeometryId {
        self.meshes.push(mesh);
        GeometryId(self.meshes.len() - 1)
    }

    pub fn get(&self, id: GeometryId) -> Option<&Mesh> {
        self.meshes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (GeometryId, &Mesh)> {
        self.meshes
            .iter()
            .enumerate()
            .map(|(index, mesh)| (GeometryId(index), mesh))
    }
}
