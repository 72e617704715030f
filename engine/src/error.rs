use thiserror::Error;

/// Indices outside the grid. Internal callers bounds-check first, so seeing
/// this at runtime means a caller skipped that check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("cell ({x}, {y}) is outside the {cols}x{rows} grid")]
    OutOfBounds {
        x: usize,
        y: usize,
        cols: usize,
        rows: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("cell pitch must be greater than zero")]
    ZeroPitch,
    #[error("display area {width}x{height} holds no complete cell at pitch {pitch}")]
    EmptyGrid { width: u32, height: u32, pitch: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueueError {
    #[error("event queue is full, event dropped")]
    Full,
    #[error("simulation is gone, event dropped")]
    Disconnected,
}
