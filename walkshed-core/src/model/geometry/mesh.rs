use super::{GeometryError, Triangle, Vec3};

/// an indexed triangle soup. buffers arrive from the caller in the flat
/// layout of the loader boundary: `vertices` is x,y,z interleaved and
/// `indices` holds three vertex indices per triangle.
#[derive(Debug, Clone)]
pub struct TriangleMesh {
    mesh_id: u32,
    vertices: Vec<Vec3>,
    indices: Vec<[u32; 3]>,
}

impl TriangleMesh {
    /// validate and take ownership of raw vertex/index buffers.
    ///
    /// # Arguments
    ///
    /// * `vertices` - interleaved x,y,z coordinates, length `3 * V`
    /// * `indices` - triangle vertex indices, length `3 * T`, `T > 0`
    /// * `mesh_id` - caller-chosen id distinguishing meshes within a scene
    pub fn new(vertices: Vec<f32>, indices: Vec<u32>, mesh_id: u32) -> Result<Self, GeometryError> {
        if vertices.is_empty() || vertices.len() % 3 != 0 {
            return Err(GeometryError::InvalidMesh(format!(
                "vertex buffer length {} is not a positive multiple of 3",
                vertices.len()
            )));
        }
        if indices.is_empty() || indices.len() % 3 != 0 {
            return Err(GeometryError::InvalidMesh(format!(
                "index buffer length {} is not a positive multiple of 3",
                indices.len()
            )));
        }

        let vertex_count = (vertices.len() / 3) as u32;
        if let Some(out_of_range) = indices.iter().find(|i| **i >= vertex_count) {
            return Err(GeometryError::InvalidMesh(format!(
                "index {} out of range for {} vertices",
                out_of_range, vertex_count
            )));
        }

        let vertices = vertices
            .chunks_exact(3)
            .map(|c| Vec3::new(c[0], c[1], c[2]))
            .collect();
        let indices = indices.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect();

        Ok(TriangleMesh {
            mesh_id,
            vertices,
            indices,
        })
    }

    /// build a mesh directly from triangle corner positions, deduplicating
    /// nothing. used by fixtures and procedural geometry.
    pub fn from_triangles(triangles: &[[Vec3; 3]], mesh_id: u32) -> Result<Self, GeometryError> {
        if triangles.is_empty() {
            return Err(GeometryError::InvalidMesh(String::from(
                "mesh has zero triangles",
            )));
        }
        let mut vertices = Vec::with_capacity(triangles.len() * 3);
        let mut indices = Vec::with_capacity(triangles.len());
        for tri in triangles {
            let base = vertices.len() as u32;
            vertices.extend_from_slice(tri);
            indices.push([base, base + 1, base + 2]);
        }
        Ok(TriangleMesh {
            mesh_id,
            vertices,
            indices,
        })
    }

    pub fn mesh_id(&self) -> u32 {
        self.mesh_id
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle(&self, index: usize) -> Triangle {
        let [a, b, c] = self.indices[index];
        Triangle::new(
            self.vertices[a as usize],
            self.vertices[b as usize],
            self.vertices[c as usize],
        )
    }

    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        (0..self.triangle_count()).map(|i| self.triangle(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_buffers() {
        let vertices = vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let indices = vec![0, 1, 2];
        let mesh = TriangleMesh::new(vertices, indices, 0).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.vertex_count(), 3);
    }

    #[test]
    fn test_empty_mesh_rejected() {
        let result = TriangleMesh::new(vec![], vec![], 0);
        assert!(matches!(result, Err(GeometryError::InvalidMesh(_))));
    }

    #[test]
    fn test_index_out_of_range_rejected() {
        let vertices = vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let indices = vec![0, 1, 3];
        let result = TriangleMesh::new(vertices, indices, 0);
        assert!(matches!(result, Err(GeometryError::InvalidMesh(_))));
    }

    #[test]
    fn test_ragged_index_buffer_rejected() {
        let vertices = vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let indices = vec![0, 1];
        let result = TriangleMesh::new(vertices, indices, 0);
        assert!(matches!(result, Err(GeometryError::InvalidMesh(_))));
    }
}
