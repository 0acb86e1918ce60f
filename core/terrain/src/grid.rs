use crate::TerrainError;

/// Row-major grid of elevation samples.
/// Built once from a decoded raster and never modified afterwards.
#[derive(Clone, PartialEq)]
pub struct ElevationGrid {
    rows: usize,
    cols: usize,
    samples: Vec<f32>,
}

impl std::fmt::Debug for ElevationGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElevationGrid")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .finish()
    }
}

impl ElevationGrid {
    /// Create an elevation grid from row-major samples.
    ///
    /// # Arguments
    ///
    /// * `rows` - Number of rows (raster height).
    /// * `cols` - Number of columns (raster width).
    /// * `samples` - The samples, row after row.
    ///
    /// # Returns
    ///
    /// * `Err(TerrainError::EmptyGrid)` - One of the dimensions is zero.
    /// * `Err(TerrainError::SampleCount)` - The number of samples is not `rows * cols`.
    pub fn new(rows: usize, cols: usize, samples: Vec<f32>) -> Result<Self, TerrainError> {
        if rows == 0 || cols == 0 {
            return Err(TerrainError::EmptyGrid { rows, cols });
        }
        if samples.len() != rows * cols {
            return Err(TerrainError::SampleCount { expected: rows * cols, actual: samples.len() });
        }

        Ok(ElevationGrid { rows, cols, samples })
    }

    /// Create an elevation grid from a list of rows.
    /// Every row must have the same length as the first one.
    pub fn from_rows(rows: &[Vec<f32>]) -> Result<Self, TerrainError> {
        let cols = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut samples = Vec::with_capacity(rows.len() * cols);
        for (index, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(TerrainError::RaggedRow { row: index, expected: cols, actual: row.len() });
            }
            samples.extend_from_slice(row);
        }

        ElevationGrid::new(rows.len(), cols, samples)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// All samples in row-major order.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Sample at row `i`, column `j`, or `None` if out of bounds.
    pub fn get(&self, i: usize, j: usize) -> Option<f32> {
        if i >= self.rows || j >= self.cols {
            return None;
        }
        Some(self.samples[i * self.cols + j])
    }

    /// Extremes of the grid, see [`ElevationRange::scan`].
    pub fn range(&self) -> ElevationRange {
        ElevationRange::scan(&self.samples)
    }
}


/// Minimum and maximum elevation of a grid. `min <= max` always holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElevationRange {
    pub min: f32,
    pub max: f32,
}

impl ElevationRange {
    /// Scan the samples once and keep the extremes.
    /// Non-finite samples are ignored. Without any finite sample, the range is `(0, 0)`.
    pub fn scan(samples: &[f32]) -> Self {
        let (min, max) = samples.iter()
            .filter(|s| s.is_finite())
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(min, max), &s| (min.min(s), max.max(s)));

        if min > max {
            return ElevationRange { min: 0.0, max: 0.0 };
        }
        ElevationRange { min, max }
    }

    /// Distance between the extremes, in `f64` so that it never overflows.
    pub fn span(&self) -> f64 {
        self.max as f64 - self.min as f64
    }

    /// Whether every finite sample has the same value.
    pub fn is_flat(&self) -> bool {
        self.span() <= 0.0
    }

    /// Map an elevation into `[0, scale]`.
    /// Flat ranges and non-finite values map to 0.
    pub fn normalize(&self, value: f32, scale: f32) -> f32 {
        if self.is_flat() || !value.is_finite() {
            return 0.0;
        }
        let t = (value as f64 - self.min as f64) / self.span();
        (t.clamp(0.0, 1.0) * scale as f64) as f32
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_grid() {
        assert_eq!(ElevationGrid::new(0, 4, vec![]), Err(TerrainError::EmptyGrid { rows: 0, cols: 4 }));
        assert_eq!(ElevationGrid::from_rows(&[]), Err(TerrainError::EmptyGrid { rows: 0, cols: 0 }));
    }

    #[test]
    fn rejects_wrong_sample_count() {
        let res = ElevationGrid::new(2, 2, vec![1.0, 2.0, 3.0]);
        assert_eq!(res, Err(TerrainError::SampleCount { expected: 4, actual: 3 }));
    }

    #[test]
    fn rejects_ragged_rows() {
        let res = ElevationGrid::from_rows(&[vec![1.0, 2.0], vec![3.0]]);
        assert_eq!(res, Err(TerrainError::RaggedRow { row: 1, expected: 2, actual: 1 }));
    }

    #[test]
    fn indexes_row_major() {
        let grid = ElevationGrid::from_rows(&[vec![0.0, 1.0, 2.0], vec![3.0, 4.0, 5.0]]).unwrap();
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.cols(), 3);
        assert_eq!(grid.get(1, 0), Some(3.0));
        assert_eq!(grid.get(0, 2), Some(2.0));
        assert_eq!(grid.get(2, 0), None);
        assert_eq!(grid.get(0, 3), None);
    }

    #[test]
    fn range_covers_all_samples() {
        let grid = ElevationGrid::from_rows(&[vec![12.0, -3.5], vec![7.0, 40.25]]).unwrap();
        assert_eq!(grid.range(), ElevationRange { min: -3.5, max: 40.25 });
    }

    #[test]
    fn range_skips_non_finite() {
        let range = ElevationRange::scan(&[f32::NAN, 2.0, f32::INFINITY, -1.0, f32::NEG_INFINITY]);
        assert_eq!(range, ElevationRange { min: -1.0, max: 2.0 });

        let range = ElevationRange::scan(&[f32::NAN, f32::NAN]);
        assert_eq!(range, ElevationRange { min: 0.0, max: 0.0 });
        assert!(range.is_flat());
    }

    #[test]
    fn normalize_maps_extremes() {
        let range = ElevationRange { min: 100.0, max: 300.0 };
        assert_eq!(range.normalize(100.0, 50.0), 0.0);
        assert_eq!(range.normalize(300.0, 50.0), 50.0);
        assert_eq!(range.normalize(200.0, 50.0), 25.0);
        assert_eq!(range.normalize(f32::NAN, 50.0), 0.0);
    }

    #[test]
    fn normalize_huge_range_stays_finite() {
        let range = ElevationRange::scan(&[-3.0e38, 0.0, 3.0e38]);
        assert_eq!(range.normalize(-3.0e38, 50.0), 0.0);
        assert_eq!(range.normalize(0.0, 50.0), 25.0);
        assert_eq!(range.normalize(3.0e38, 50.0), 50.0);
    }

    #[test]
    fn normalize_flat_range_is_zero() {
        let range = ElevationRange { min: 5.0, max: 5.0 };
        assert_eq!(range.normalize(5.0, 50.0), 0.0);
    }
}
