//! Error types for crowdtrack.

use thiserror::Error;

/// Rejected configuration. Raised at construction, never per frame.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `process_every_n_frames` must be at least 1.
    #[error("process_every_n_frames must be positive, got {0}")]
    InvalidProcessInterval(u32),

    /// Band policy needs `zone_top <= zone_bottom`.
    #[error("band zone is inverted: top {top} is below bottom {bottom}")]
    InvalidZone { top: i32, bottom: i32 },

    #[error("frame height must be positive")]
    InvalidFrameHeight,

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failures talking to a per-stream worker.
#[derive(Debug, Error)]
pub enum StreamError {
    /// Frame queue is saturated; the frame was dropped.
    #[error("frame queue full, frame dropped")]
    Full,

    #[error("stream worker has stopped")]
    Closed,

    #[error("stream worker panicked")]
    WorkerPanicked,

    #[error("failed to spawn stream worker: {0}")]
    Spawn(#[from] std::io::Error),
}
