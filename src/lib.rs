//! Centroid tracking and crossing counts for people-counting video pipelines.
//!
//! A [`CentroidTracker`] keeps stable identities for detector boxes across
//! frames, a [`CrossingCounter`] turns identity tracks into entry/exit counts
//! under a band or line [`CrossingPolicy`], and a [`CountingPipeline`] wraps
//! both behind a frame-skipping scheduler for streaming sources.

pub mod config;
pub mod counting;
pub mod error;
pub mod integration;
pub mod tracker;

pub use config::{PipelineConfig, PolicyConfig};
pub use counting::{
    BandPolicy, CountSnapshot, CountingPolicy, CrossingCounter, CrossingPolicy, LinePolicy, Side,
};
pub use error::{ConfigError, StreamError};
pub use integration::{
    BoxBuilder, BoxFormat, CountingPipeline, DetectionSource, Frame, FrameResult, FrameScheduler,
    IntoDetections, JsonBoxSource, SchedulerConfig, StreamWorker,
};
pub use tracker::{Centroid, CentroidTracker, Rect, TrackId, TrackedObjects, TrackerConfig};
