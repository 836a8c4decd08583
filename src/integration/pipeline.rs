//! CountingPipeline for combining detection, tracking and counting.

use tracing::{trace, warn};

use crate::config::PipelineConfig;
use crate::counting::{CountingPolicy, CrossingCounter, CrossingPolicy};
use crate::error::ConfigError;
use crate::tracker::{CentroidTracker, Rect, TrackerConfig};

use super::DetectionSource;
use super::scheduler::{FrameDecision, FrameResult, FrameScheduler, SchedulerConfig};

/// End-to-end per-stream processor: detector, tracker, counter and scheduler.
///
/// Not shareable between threads mid-update; give each camera or session its
/// own pipeline.
pub struct CountingPipeline<D: DetectionSource, P: CrossingPolicy = CountingPolicy> {
    detector: D,
    tracker: CentroidTracker,
    counter: CrossingCounter<P>,
    scheduler: FrameScheduler,
    /// Frame height the policy thresholds were derived from, if known.
    policy_height: Option<u32>,
    /// First frame height seen that differs from `policy_height`.
    height_mismatch: Option<u32>,
}

impl<D: DetectionSource> CountingPipeline<D> {
    /// Build a pipeline from a validated configuration.
    pub fn from_config(detector: D, config: &PipelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let policy = config.policy.build(config.frame_height)?;
        let mut pipeline = Self::new(detector, config.tracker, policy, config.scheduler)?;
        pipeline.policy_height = Some(config.frame_height);
        Ok(pipeline)
    }
}

impl<D: DetectionSource, P: CrossingPolicy> CountingPipeline<D, P> {
    pub fn new(
        detector: D,
        tracker_config: TrackerConfig,
        policy: P,
        scheduler_config: SchedulerConfig,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            detector,
            tracker: CentroidTracker::new(tracker_config),
            counter: CrossingCounter::new(policy),
            scheduler: FrameScheduler::new(scheduler_config)?,
            policy_height: None,
            height_mismatch: None,
        })
    }

    /// Process a single frame and return the result to emit for it.
    ///
    /// Frames not selected by the scheduler, and frames the detector cannot
    /// decode, return the cached result without touching tracker state.
    ///
    /// # Arguments
    /// * `input` - Raw frame bytes
    /// * `width` - Frame width in pixels
    /// * `height` - Frame height in pixels
    pub fn process_frame(&mut self, input: &[u8], width: u32, height: u32) -> &FrameResult {
        self.check_height(height);
        if self.scheduler.next_frame() == FrameDecision::Reuse {
            trace!(frame = self.scheduler.frame_counter(), "frame skipped");
            return self.scheduler.cached();
        }

        match self.detector.detect(input, width, height) {
            Ok(boxes) => self.apply(&boxes),
            Err(err) => {
                warn!(
                    frame = self.scheduler.frame_counter(),
                    error = %err,
                    "undecodable frame, re-emitting cached result"
                );
                self.scheduler.cached()
            }
        }
    }

    /// Run tracking and counting on boxes from an external detector,
    /// bypassing frame skipping.
    pub fn apply(&mut self, boxes: &[Rect]) -> &FrameResult {
        let objects = self.tracker.update(boxes);
        let counts = self.counter.update(&objects);
        let frame_index = self.scheduler.frame_counter();
        self.scheduler.store(FrameResult {
            frame_index,
            objects,
            counts,
        })
    }

    /// Thresholds stay fixed after construction; report once when frames
    /// arrive at a different height than the one they were derived from.
    fn check_height(&mut self, height: u32) {
        let Some(expected) = self.policy_height else {
            return;
        };
        if height == 0 || height == expected || self.height_mismatch.is_some() {
            return;
        }
        self.height_mismatch = Some(height);
        warn!(
            expected,
            actual = height,
            "frame height differs from configured frame_height, counting thresholds not rescaled"
        );
    }

    /// First frame height seen that differs from the configured one.
    pub fn height_mismatch(&self) -> Option<u32> {
        self.height_mismatch
    }

    /// Last emitted result.
    pub fn last_result(&self) -> &FrameResult {
        self.scheduler.cached()
    }

    /// Get a reference to the underlying detector.
    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Get a mutable reference to the underlying detector.
    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }

    /// Get a reference to the underlying tracker.
    pub fn tracker(&self) -> &CentroidTracker {
        &self.tracker
    }

    /// Get a reference to the underlying counter.
    pub fn counter(&self) -> &CrossingCounter<P> {
        &self.counter
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counting::LinePolicy;

    struct MockDetector {
        frames: Vec<Result<Vec<Rect>, String>>,
        calls: usize,
    }

    impl DetectionSource for MockDetector {
        type Error = String;

        fn detect(
            &mut self,
            _input: &[u8],
            _width: u32,
            _height: u32,
        ) -> Result<Vec<Rect>, Self::Error> {
            let out = self.frames[self.calls % self.frames.len()].clone();
            self.calls += 1;
            out
        }
    }

    fn every(n: u32) -> SchedulerConfig {
        SchedulerConfig {
            process_every_n_frames: n,
            ..Default::default()
        }
    }

    #[test]
    fn test_counting_pipeline() {
        let detector = MockDetector {
            frames: vec![Ok(vec![Rect::from_tlbr(10.0, 20.0, 50.0, 80.0)])],
            calls: 0,
        };

        let mut pipeline =
            CountingPipeline::new(detector, TrackerConfig::default(), LinePolicy::new(240), every(1))
                .unwrap();
        let result = pipeline.process_frame(&[], 640, 480).clone();

        assert_eq!(result.frame_index, 1);
        assert_eq!(result.objects.len(), 1);
        assert_eq!(pipeline.detector().calls, 1);
    }

    #[test]
    fn test_skipped_frames_do_not_call_detector() {
        let detector = MockDetector {
            frames: vec![Ok(vec![])],
            calls: 0,
        };
        let mut pipeline =
            CountingPipeline::new(detector, TrackerConfig::default(), LinePolicy::new(240), every(4))
                .unwrap();
        for _ in 0..8 {
            pipeline.process_frame(&[], 640, 480);
        }
        assert_eq!(pipeline.detector().calls, 2);
    }

    #[test]
    fn test_detector_error_reuses_cache() {
        let detector = MockDetector {
            frames: vec![
                Ok(vec![Rect::from_tlbr(0.0, 0.0, 20.0, 20.0)]),
                Err("corrupt jpeg".to_string()),
            ],
            calls: 0,
        };
        let mut pipeline =
            CountingPipeline::new(detector, TrackerConfig::default(), LinePolicy::new(240), every(1))
                .unwrap();
        let first = pipeline.process_frame(&[], 640, 480).clone();
        let second = pipeline.process_frame(&[], 640, 480).clone();

        assert_eq!(first, second);
        assert_eq!(pipeline.tracker().disappeared(0), Some(0));
    }
}
