//! Mesh data structures and generation

use crate::backend::{BackendResult, GraphicsContext, MeshHandle, Vertex};
use glam::{Vec2, Vec3};
use std::f32::consts::PI;

/// CPU-side indexed triangle geometry
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub name: String,
}

impl MeshData {
    pub fn new(name: &str) -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            name: name.to_string(),
        }
    }

    /// Calculate triangle count
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get vertex data as bytes
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Create a unit cube centered at origin
    pub fn cube() -> Self {
        let mut mesh = MeshData::new("cube");

        let faces = [
            (Vec3::Z, Vec3::X, Vec3::Y),
            (-Vec3::Z, -Vec3::X, Vec3::Y),
            (Vec3::X, -Vec3::Z, Vec3::Y),
            (-Vec3::X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::X, -Vec3::Z),
            (-Vec3::Y, Vec3::X, Vec3::Z),
        ];

        for (normal, right, up) in faces {
            let base = mesh.vertices.len() as u32;
            let center = normal * 0.5;
            let corners = [
                (-0.5, -0.5, Vec2::new(0.0, 0.0)),
                (0.5, -0.5, Vec2::new(1.0, 0.0)),
                (0.5, 0.5, Vec2::new(1.0, 1.0)),
                (-0.5, 0.5, Vec2::new(0.0, 1.0)),
            ];
            for (u, v, uv) in corners {
                mesh.vertices
                    .push(Vertex::new(center + right * u + up * v, uv, normal));
            }
            mesh.indices
                .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        mesh
    }

    /// Create a unit-radius UV sphere with counter-clockwise outward faces
    pub fn sphere(segments: u32, rings: u32) -> Self {
        let mut mesh = MeshData::new("sphere");

        let segment_angle = 2.0 * PI / segments as f32;
        let ring_angle = PI / rings as f32;

        for ring in 0..=rings {
            let phi = ring as f32 * ring_angle;
            let y = phi.cos();
            let ring_radius = phi.sin();

            for segment in 0..=segments {
                let theta = segment as f32 * segment_angle;
                let normal = Vec3::new(ring_radius * theta.cos(), y, -ring_radius * theta.sin());
                let uv = Vec2::new(
                    segment as f32 / segments as f32,
                    1.0 - ring as f32 / rings as f32,
                );
                mesh.vertices.push(Vertex::new(normal, uv, normal));
            }
        }

        for ring in 0..rings {
            for segment in 0..segments {
                let current = ring * (segments + 1) + segment;
                let below = current + segments + 1;

                mesh.indices.extend_from_slice(&[
                    current,
                    below,
                    below + 1,
                    below + 1,
                    current + 1,
                    current,
                ]);
            }
        }

        mesh
    }

    /// Create a plane on the XZ axis
    pub fn plane(width: f32, depth: f32, subdivisions: u32) -> Self {
        let mut mesh = MeshData::new("plane");

        let half_width = width / 2.0;
        let half_depth = depth / 2.0;
        let step_x = width / subdivisions as f32;
        let step_z = depth / subdivisions as f32;

        for z in 0..=subdivisions {
            for x in 0..=subdivisions {
                let px = -half_width + x as f32 * step_x;
                let pz = -half_depth + z as f32 * step_z;

                mesh.vertices.push(Vertex::new(
                    Vec3::new(px, 0.0, pz),
                    Vec2::new(x as f32 / subdivisions as f32, z as f32 / subdivisions as f32),
                    Vec3::Y,
                ));
            }
        }

        for z in 0..subdivisions {
            for x in 0..subdivisions {
                let current = z * (subdivisions + 1) + x;
                let next = current + subdivisions + 1;

                mesh.indices.extend_from_slice(&[
                    current,
                    next,
                    current + 1,
                    current + 1,
                    next,
                    next + 1,
                ]);
            }
        }

        mesh
    }
}

/// Immutable geometry uploaded to the GPU
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mesh {
    pub handle: MeshHandle,
    pub index_count: u32,
    pub name: String,
}

impl Mesh {
    /// Upload mesh data
    pub fn upload<G: GraphicsContext>(ctx: &mut G, data: &MeshData) -> BackendResult<Self> {
        let handle = ctx.create_mesh(&data.vertices, &data.indices)?;
        log::trace!(
            "Uploaded mesh '{}' ({} vertices, {} triangles)",
            data.name,
            data.vertices.len(),
            data.triangle_count()
        );
        Ok(Self {
            handle,
            index_count: data.indices.len() as u32,
            name: data.name.clone(),
        })
    }

    /// Draw all of this mesh's triangles
    pub fn draw<G: GraphicsContext>(&self, ctx: &mut G) {
        ctx.draw_mesh(self.handle, self.index_count);
    }

    pub fn destroy<G: GraphicsContext>(&self, ctx: &mut G) {
        ctx.destroy_mesh(self.handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{GlCall, RecordingContext};

    #[test]
    fn cube_counts() {
        let cube = MeshData::cube();
        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.triangle_count(), 12);
        assert_eq!(cube.vertex_bytes().len(), 24 * std::mem::size_of::<Vertex>());
    }

    #[test]
    fn sphere_is_unit_radius() {
        let sphere = MeshData::sphere(16, 16);
        assert_eq!(sphere.vertices.len(), 17 * 17);
        assert_eq!(sphere.indices.len(), 16 * 16 * 6);
        for vertex in &sphere.vertices {
            assert!((vertex.position.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn sphere_faces_point_outward() {
        let sphere = MeshData::sphere(8, 8);
        for tri in sphere.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| sphere.vertices[i as usize].position);
            let normal = (b - a).cross(c - a);
            // Degenerate triangles at the poles have no orientation.
            if normal.length() < 1e-6 {
                continue;
            }
            let centroid = (a + b + c) / 3.0;
            assert!(normal.dot(centroid) > 0.0);
        }
    }

    #[test]
    fn plane_counts() {
        let plane = MeshData::plane(2.0, 2.0, 4);
        assert_eq!(plane.vertices.len(), 25);
        assert_eq!(plane.triangle_count(), 32);
    }

    #[test]
    fn draw_uses_full_index_count() {
        let mut ctx = RecordingContext::new();
        let mesh = Mesh::upload(&mut ctx, &MeshData::cube()).unwrap();
        mesh.draw(&mut ctx);
        assert_eq!(
            ctx.calls().last(),
            Some(&GlCall::DrawMesh {
                mesh: mesh.handle,
                index_count: 36
            })
        );
    }
}
