use wde_math::{InnerSpace, Vec3f, UP_VEC3F};

/// A vertex of the terrain surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainVertex {
    /// World position. `y` holds the scaled elevation.
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Axis aligned bounding box of a mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

/// Rectangular grid of `rows * cols` vertices lying in the XZ plane.
///
/// The grid is centered at the origin, spans `width` along X (columns) and `height` along Z (rows).
/// Row 0 lies at `z = -height / 2`. Vertex `(i, j)` is stored at index `i * cols + j`.
#[derive(Clone, PartialEq)]
pub struct MeshGrid {
    rows: usize,
    cols: usize,
    width: f32,
    height: f32,
    vertices: Vec<TerrainVertex>,
    indices: Vec<u32>,
    bounding_box: BoundingBox,
    dirty: bool,
}

impl std::fmt::Debug for MeshGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeshGrid")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("indices", &self.indices.len())
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl MeshGrid {
    /// Create a flat lattice of `rows * cols` vertices.
    /// A single row (or column) collapses onto the center line of its axis.
    ///
    /// # Arguments
    ///
    /// * `rows` - Number of vertex rows.
    /// * `cols` - Number of vertex columns.
    /// * `width` - Extent along X.
    /// * `height` - Extent along Z.
    pub fn lattice(rows: usize, cols: usize, width: f32, height: f32) -> Self {
        let step_x = if cols > 1 { width / (cols - 1) as f32 } else { 0.0 };
        let step_z = if rows > 1 { height / (rows - 1) as f32 } else { 0.0 };
        let origin_x = if cols > 1 { -width / 2.0 } else { 0.0 };
        let origin_z = if rows > 1 { -height / 2.0 } else { 0.0 };

        let mut vertices = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                let u = if cols > 1 { j as f32 / (cols - 1) as f32 } else { 0.5 };
                let v = if rows > 1 { i as f32 / (rows - 1) as f32 } else { 0.5 };
                vertices.push(TerrainVertex {
                    position: [origin_x + j as f32 * step_x, 0.0, origin_z + i as f32 * step_z],
                    normal: UP_VEC3F.into(),
                    uv: [u, v],
                });
            }
        }

        // Two counter-clockwise triangles per cell, seen from above
        let mut indices = Vec::with_capacity(rows.saturating_sub(1) * cols.saturating_sub(1) * 6);
        for i in 0..rows.saturating_sub(1) {
            for j in 0..cols.saturating_sub(1) {
                let a = (i * cols + j) as u32;
                let b = a + 1;
                let c = a + cols as u32;
                let d = c + 1;
                indices.extend_from_slice(&[a, c, b, b, c, d]);
            }
        }

        let mut mesh = MeshGrid {
            rows, cols, width, height,
            vertices,
            indices,
            bounding_box: BoundingBox { min: [0.0; 3], max: [0.0; 3] },
            dirty: false,
        };
        mesh.commit();
        mesh
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn vertices(&self) -> &[TerrainVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.bounding_box
    }

    /// Elevation of vertex `(i, j)`, or `None` if out of bounds.
    pub fn elevation(&self, i: usize, j: usize) -> Option<f32> {
        if i >= self.rows || j >= self.cols {
            return None;
        }
        Some(self.vertices[i * self.cols + j].position[1])
    }

    /// Overwrite the up coordinate of the vertex at `index`.
    /// Normals and bounds are stale until the next [`MeshGrid::commit`].
    pub(crate) fn set_elevation(&mut self, index: usize, elevation: f32) {
        self.vertices[index].position[1] = elevation;
    }

    /// Recompute normals and bounding box, and flag the mesh for re-upload.
    pub fn commit(&mut self) {
        self.compute_normals();
        self.compute_bounding_box();
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag.
    ///
    /// # Returns
    ///
    /// Whether the mesh changed since the last call.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    fn compute_normals(&mut self) {
        let (rows, cols) = (self.rows, self.cols);
        let y = |i: usize, j: usize| self.vertices[i * cols + j].position[1];
        let x = |i: usize, j: usize| self.vertices[i * cols + j].position[0];
        let z = |i: usize, j: usize| self.vertices[i * cols + j].position[2];

        let mut normals = Vec::with_capacity(self.vertices.len());
        for i in 0..rows {
            for j in 0..cols {
                // Central differences, one-sided on the borders
                let (l, r) = (j.saturating_sub(1), (j + 1).min(cols - 1));
                let (t, b) = (i.saturating_sub(1), (i + 1).min(rows - 1));

                let dx = x(i, r) - x(i, l);
                let dz = z(b, j) - z(t, j);
                let slope_x = if dx != 0.0 { (y(i, r) - y(i, l)) / dx } else { 0.0 };
                let slope_z = if dz != 0.0 { (y(b, j) - y(t, j)) / dz } else { 0.0 };

                let normal = Vec3f::new(-slope_x, 1.0, -slope_z).normalize();
                normals.push(normal);
            }
        }

        for (vertex, normal) in self.vertices.iter_mut().zip(normals) {
            vertex.normal = normal.into();
        }
    }

    fn compute_bounding_box(&mut self) {
        let mut min = [f32::INFINITY; 3];
        let mut max = [f32::NEG_INFINITY; 3];
        for vertex in &self.vertices {
            for axis in 0..3 {
                min[axis] = min[axis].min(vertex.position[axis]);
                max[axis] = max[axis].max(vertex.position[axis]);
            }
        }
        if self.vertices.is_empty() {
            min = [0.0; 3];
            max = [0.0; 3];
        }
        self.bounding_box = BoundingBox { min, max };
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_normal(mesh: &MeshGrid, tri: &[u32]) -> Vec3f {
        let p = |k: usize| Vec3f::from(mesh.vertices()[tri[k] as usize].position);
        (p(1) - p(0)).cross(p(2) - p(0))
    }

    #[test]
    fn lattice_is_centered() {
        let mesh = MeshGrid::lattice(3, 5, 40.0, 20.0);
        assert_eq!(mesh.vertices().len(), 15);
        assert_eq!(mesh.vertices()[0].position, [-20.0, 0.0, -10.0]);
        assert_eq!(mesh.vertices()[14].position, [20.0, 0.0, 10.0]);
        // Row 1, column 2 is the center
        assert_eq!(mesh.vertices()[7].position, [0.0, 0.0, 0.0]);
        assert_eq!(mesh.bounding_box(), BoundingBox { min: [-20.0, 0.0, -10.0], max: [20.0, 0.0, 10.0] });
    }

    #[test]
    fn lattice_triangles_face_up() {
        let mesh = MeshGrid::lattice(4, 3, 3.0, 4.0);
        assert_eq!(mesh.indices().len(), 3 * 2 * 6);
        for tri in mesh.indices().chunks(3) {
            let n = triangle_normal(&mesh, tri);
            assert!(n.y > 0.0);
        }
    }

    #[test]
    fn single_row_collapses_to_center() {
        let mesh = MeshGrid::lattice(1, 3, 10.0, 10.0);
        assert!(mesh.indices().is_empty());
        for vertex in mesh.vertices() {
            assert_eq!(vertex.position[2], 0.0);
        }
        assert_eq!(mesh.vertices()[0].position[0], -5.0);

        let mesh = MeshGrid::lattice(1, 1, 10.0, 10.0);
        assert_eq!(mesh.vertices()[0].position, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn commit_updates_normals_and_bounds() {
        let mut mesh = MeshGrid::lattice(2, 2, 2.0, 2.0);
        assert!(mesh.take_dirty());
        assert!(!mesh.take_dirty());

        // Slope rising along X
        mesh.set_elevation(1, 2.0);
        mesh.set_elevation(3, 2.0);
        mesh.commit();

        assert!(mesh.is_dirty());
        assert_eq!(mesh.bounding_box().max[1], 2.0);
        for vertex in mesh.vertices() {
            assert!(vertex.normal[0] < 0.0);
            assert!(vertex.normal[1] > 0.0);
            assert_eq!(vertex.normal[2], 0.0);
        }
    }

    #[test]
    fn elevation_lookup() {
        let mut mesh = MeshGrid::lattice(2, 3, 1.0, 1.0);
        mesh.set_elevation(4, 7.5);
        assert_eq!(mesh.elevation(1, 1), Some(7.5));
        assert_eq!(mesh.elevation(2, 0), None);
    }
}
