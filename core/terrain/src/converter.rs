use wde_logger::{debug, error, warn};

use crate::{ElevationGrid, ElevationRange, MeshGrid, TerrainError};

/// Map the samples of an elevation grid onto the up coordinate of a mesh grid.
/// Each sample `e` becomes `(e - min) / (max - min) * elevation_scale`.
///
/// # Arguments
///
/// * `mesh` - The mesh grid to displace. Must have the same rows and cols as the elevation grid.
/// * `elevation` - The elevation grid.
/// * `elevation_scale` - Height of the highest sample once mapped.
///
/// # Returns
///
/// The range used for the mapping, or `TerrainError::DimensionMismatch` if the grids differ.
/// On error the mesh is left untouched.
pub fn apply_elevation(mesh: &mut MeshGrid, elevation: &ElevationGrid, elevation_scale: f32) -> Result<ElevationRange, TerrainError> {
    if mesh.rows() != elevation.rows() || mesh.cols() != elevation.cols() {
        return Err(TerrainError::DimensionMismatch {
            grid_rows: elevation.rows(),
            grid_cols: elevation.cols(),
            mesh_rows: mesh.rows(),
            mesh_cols: mesh.cols(),
        });
    }

    let range = elevation.range();
    for (index, &sample) in elevation.samples().iter().enumerate() {
        mesh.set_elevation(index, range.normalize(sample, elevation_scale));
    }
    mesh.commit();

    Ok(range)
}

/// Build a terrain mesh from an elevation grid.
///
/// # Arguments
///
/// * `elevation` - The elevation grid.
/// * `width` - Extent of the terrain along X.
/// * `height` - Extent of the terrain along Z.
/// * `elevation_scale` - Height of the highest sample.
///
/// # Returns
///
/// A mesh with one vertex per sample, marked dirty.
#[tracing::instrument(skip(elevation), fields(rows = elevation.rows(), cols = elevation.cols()))]
pub fn build_terrain(elevation: &ElevationGrid, width: f32, height: f32, elevation_scale: f32) -> MeshGrid {
    let mut mesh = MeshGrid::lattice(elevation.rows(), elevation.cols(), width, height);

    match apply_elevation(&mut mesh, elevation, elevation_scale) {
        Ok(range) => {
            if range.is_flat() {
                warn!(min = range.min, max = range.max, "Elevation range is flat, terrain stays at ground level.");
            }
            debug!(min = range.min, max = range.max, "Built terrain mesh.");
        },
        Err(e) => error!("Skipping elevation mapping: {}", e),
    }

    mesh
}


#[cfg(test)]
mod tests {
    use super::*;

    fn elevations(mesh: &MeshGrid) -> Vec<f32> {
        mesh.vertices().iter().map(|v| v.position[1]).collect()
    }

    #[test]
    fn maps_two_by_two_grid() {
        let grid = ElevationGrid::from_rows(&[vec![0.0, 10.0], vec![20.0, 30.0]]).unwrap();
        let mesh = build_terrain(&grid, 2.0, 2.0, 50.0);

        let expected = [0.0, 50.0 / 3.0, 100.0 / 3.0, 50.0];
        for (got, want) in elevations(&mesh).iter().zip(expected) {
            assert!((got - want).abs() < 1e-4, "{} != {}", got, want);
        }
        assert_eq!(mesh.elevation(0, 0), Some(0.0));
        assert_eq!(mesh.elevation(1, 1), Some(50.0));
    }

    #[test]
    fn flat_grid_maps_to_zero() {
        let grid = ElevationGrid::new(3, 3, vec![5.0; 9]).unwrap();
        let mesh = build_terrain(&grid, 10.0, 10.0, 50.0);
        assert!(elevations(&mesh).iter().all(|&e| e == 0.0));
    }

    #[test]
    fn mapped_values_stay_in_range_and_keep_order() {
        let samples: Vec<f32> = (0..64).map(|k| ((k * 37) % 64) as f32 * 13.7 - 200.0).collect();
        let grid = ElevationGrid::new(8, 8, samples.clone()).unwrap();
        let mesh = build_terrain(&grid, 100.0, 100.0, 42.0);
        let mapped = elevations(&mesh);

        assert!(mapped.iter().all(|&e| (0.0..=42.0).contains(&e)));
        let range = grid.range();
        for (k, &sample) in samples.iter().enumerate() {
            if sample == range.min {
                assert_eq!(mapped[k], 0.0);
            }
            if sample == range.max {
                assert_eq!(mapped[k], 42.0);
            }
        }
        for a in 0..samples.len() {
            for b in 0..samples.len() {
                if samples[a] <= samples[b] {
                    assert!(mapped[a] <= mapped[b]);
                }
            }
        }
    }

    #[test]
    fn extreme_samples_never_produce_nan() {
        let grid = ElevationGrid::new(1, 3, vec![-3.0e38, 0.0, 3.0e38]).unwrap();
        let mesh = build_terrain(&grid, 2.0, 1.0, 50.0);
        assert_eq!(elevations(&mesh), vec![0.0, 25.0, 50.0]);
        assert!(mesh.vertices().iter().all(|v| v.normal.iter().all(|n| n.is_finite())));
    }

    #[test]
    fn build_is_deterministic() {
        let samples: Vec<f32> = (0..30).map(|k| (k as f32 * 0.7).sin() * 120.0).collect();
        let grid = ElevationGrid::new(5, 6, samples).unwrap();
        let a = build_terrain(&grid, 60.0, 50.0, 50.0);
        let b = build_terrain(&grid, 60.0, 50.0, 50.0);
        assert_eq!(a, b);
    }

    #[test]
    fn mismatch_leaves_mesh_untouched() {
        let grid = ElevationGrid::new(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let mut mesh = MeshGrid::lattice(3, 2, 10.0, 10.0);
        mesh.take_dirty();
        let before = mesh.clone();

        let res = apply_elevation(&mut mesh, &grid, 50.0);
        assert_eq!(res, Err(TerrainError::DimensionMismatch { grid_rows: 2, grid_cols: 3, mesh_rows: 3, mesh_cols: 2 }));
        assert_eq!(mesh, before);
        assert!(!mesh.is_dirty());
    }

    #[test]
    fn non_finite_samples_map_to_zero() {
        let grid = ElevationGrid::new(1, 4, vec![f32::NAN, 10.0, 20.0, f32::INFINITY]).unwrap();
        let mesh = build_terrain(&grid, 3.0, 1.0, 10.0);
        assert_eq!(elevations(&mesh), vec![0.0, 0.0, 10.0, 0.0]);
        assert!(mesh.vertices().iter().all(|v| v.normal.iter().all(|n| n.is_finite())));
    }

    #[test]
    fn apply_marks_mesh_dirty() {
        let grid = ElevationGrid::new(2, 2, vec![0.0, 1.0, 2.0, 3.0]).unwrap();
        let mut mesh = MeshGrid::lattice(2, 2, 1.0, 1.0);
        assert!(mesh.take_dirty());

        apply_elevation(&mut mesh, &grid, 1.0).unwrap();
        assert!(mesh.take_dirty());
        assert_eq!(mesh.bounding_box().max[1], 1.0);
    }
}
