use thiserror::Error;

/// Errors raised while building elevation grids or mapping them onto meshes.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TerrainError {
    #[error("Elevation grid is empty ({rows}x{cols}).")]
    EmptyGrid { rows: usize, cols: usize },

    #[error("Elevation grid expects {expected} samples, got {actual}.")]
    SampleCount { expected: usize, actual: usize },

    #[error("Elevation grid row {row} has {actual} samples instead of {expected}.")]
    RaggedRow { row: usize, expected: usize, actual: usize },

    #[error("Elevation grid is {grid_rows}x{grid_cols} but the mesh grid is {mesh_rows}x{mesh_cols}.")]
    DimensionMismatch {
        grid_rows: usize,
        grid_cols: usize,
        mesh_rows: usize,
        mesh_cols: usize,
    },
}
