//! Frame skipping and result caching for high-rate sources.

use serde::{Deserialize, Serialize};

use crate::counting::CountSnapshot;
use crate::error::ConfigError;
use crate::tracker::TrackedObjects;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Run the full pipeline on every N-th frame only.
    pub process_every_n_frames: u32,
    /// Keep the previous frame's objects when a processed frame yields none.
    ///
    /// Counts are always refreshed, so a retained result can list objects
    /// next to counts that no longer include them (e.g. `inside: 0`). Use it
    /// for overlays only.
    pub retain_last_non_empty: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            process_every_n_frames: 3,
            retain_last_non_empty: false,
        }
    }
}

impl SchedulerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.process_every_n_frames == 0 {
            return Err(ConfigError::InvalidProcessInterval(
                self.process_every_n_frames,
            ));
        }
        Ok(())
    }
}

/// Output emitted for every frame, fresh or cached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FrameResult {
    /// Scheduler frame number this result was computed on (0 = none yet).
    pub frame_index: u64,
    /// Live identities. May be carried over from an earlier frame when
    /// `retain_last_non_empty` is set; `counts` is always current.
    pub objects: TrackedObjects,
    pub counts: CountSnapshot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameDecision {
    /// Run detection, tracking and counting.
    Process,
    /// Re-emit the cached result.
    Reuse,
}

/// Decides which frames are processed and holds the last emitted result.
///
/// Never blocks: a frame that is not selected is answered from cache.
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    config: SchedulerConfig,
    frame_counter: u64,
    cached: FrameResult,
}

impl FrameScheduler {
    pub fn new(config: SchedulerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            frame_counter: 0,
            cached: FrameResult::default(),
        })
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Number of frames seen so far.
    pub fn frame_counter(&self) -> u64 {
        self.frame_counter
    }

    /// Count a new frame and decide whether to process it.
    pub fn next_frame(&mut self) -> FrameDecision {
        self.frame_counter += 1;
        if self.frame_counter % u64::from(self.config.process_every_n_frames) == 0 {
            FrameDecision::Process
        } else {
            FrameDecision::Reuse
        }
    }

    pub fn cached(&self) -> &FrameResult {
        &self.cached
    }

    /// Replace the cached result with a freshly computed one.
    pub fn store(&mut self, mut result: FrameResult) -> &FrameResult {
        if self.config.retain_last_non_empty && result.objects.is_empty() {
            result.objects = std::mem::take(&mut self.cached.objects);
        }
        self.cached = result;
        &self.cached
    }
}
