//! Integration module for running detection backends through the tracker
//! and counter on live or recorded streams.
//!
//! This module provides the detector seam, frame scheduling with result
//! caching, the per-stream pipeline and a threaded worker around it.

mod builder;
mod detector;
mod pipeline;
mod scheduler;
mod stream;

pub use builder::BoxBuilder;
pub use detector::{BoxFormat, DetectionSource, IntoDetections, JsonBoxSource};
pub use pipeline::CountingPipeline;
pub use scheduler::{FrameDecision, FrameResult, FrameScheduler, SchedulerConfig};
pub use stream::{Frame, StreamWorker};
