use thiserror::Error;

/// Top-level error type for floor topology reconstruction.
#[derive(Debug, Error)]
pub enum FloortraceError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Errors raised by the planar graph engine.
#[derive(Debug, Error)]
pub enum GraphError {
    /// A face walk ran past its step bound without returning to its start.
    /// The graph is non-planar or corrupt.
    #[error("face walk from vertex {start} did not close after {steps} steps")]
    UnclosedFace { start: usize, steps: usize },

    #[error("{0} points exceed the 24-bit vertex index space")]
    TooManyPoints(usize),
}

/// Errors raised by layout edits that name a missing entity.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("room not found")]
    RoomNotFound,

    #[error("door not found")]
    DoorNotFound,
}

/// Errors raised while reading or writing persisted snapshots.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("edge ({a}, {b}) references a point outside 0..{len}")]
    EdgeOutOfRange { a: u32, b: u32, len: usize },

    #[error("room path references point {index} outside 0..{len}")]
    RoomOutOfRange { index: usize, len: usize },
}

/// Convenience type alias for results using [`FloortraceError`].
pub type Result<T> = std::result::Result<T, FloortraceError>;
