//! Nearest-centroid multi-object tracker.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::tracker::matching::{self, AssignmentResult};
use crate::tracker::rect::{Centroid, Rect};

/// Identity assigned to a tracked object. Never reused within a tracker.
pub type TrackId = u64;

/// Live identities and their latest centroids, ordered by id.
pub type TrackedObjects = BTreeMap<TrackId, Centroid>;

/// Configuration for the CentroidTracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Consecutive unmatched updates tolerated before an identity is evicted.
    pub max_disappeared: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_disappeared: 40,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TrackedObject {
    centroid: Centroid,
    disappeared: u32,
}

/// Assigns stable identities to detections across frames.
///
/// One instance per stream; updates must be applied in frame order.
#[derive(Debug, Clone)]
pub struct CentroidTracker {
    objects: BTreeMap<TrackId, TrackedObject>,
    next_id: TrackId,
    config: TrackerConfig,
}

impl CentroidTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            objects: BTreeMap::new(),
            next_id: 0,
            config,
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Identity the next registration will receive.
    pub fn next_id(&self) -> TrackId {
        self.next_id
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn contains(&self, id: TrackId) -> bool {
        self.objects.contains_key(&id)
    }

    pub fn centroid(&self, id: TrackId) -> Option<Centroid> {
        self.objects.get(&id).map(|o| o.centroid)
    }

    /// Consecutive unmatched updates for `id`, if it is live.
    pub fn disappeared(&self, id: TrackId) -> Option<u32> {
        self.objects.get(&id).map(|o| o.disappeared)
    }

    /// Snapshot of the live id to centroid mapping.
    pub fn objects(&self) -> TrackedObjects {
        self.objects
            .iter()
            .map(|(&id, o)| (id, o.centroid))
            .collect()
    }

    /// Start tracking `centroid` under a fresh identity.
    pub fn register(&mut self, centroid: Centroid) -> TrackId {
        let id = self.next_id;
        self.objects.insert(
            id,
            TrackedObject {
                centroid,
                disappeared: 0,
            },
        );
        self.next_id += 1;
        debug!(id, x = centroid.x, y = centroid.y, "registered object");
        id
    }

    /// Stop tracking `id`. Absent ids are ignored.
    pub fn deregister(&mut self, id: TrackId) {
        if self.objects.remove(&id).is_some() {
            debug!(id, "deregistered object");
        }
    }

    /// Feed one frame's detections and return the live mapping.
    pub fn update(&mut self, boxes: &[Rect]) -> TrackedObjects {
        let inputs: Vec<Centroid> = boxes.iter().map(Rect::centroid).collect();

        if inputs.is_empty() {
            let ids: Vec<TrackId> = self.objects.keys().copied().collect();
            for id in ids {
                self.mark_missed(id);
            }
        } else if self.objects.is_empty() {
            for centroid in inputs {
                self.register(centroid);
            }
        } else {
            let ids: Vec<TrackId> = self.objects.keys().copied().collect();
            let tracked: Vec<Centroid> = self.objects.values().map(|o| o.centroid).collect();

            let dists = matching::euclidean_distance(&tracked, &inputs);
            let AssignmentResult {
                matches,
                unmatched_tracks,
                unmatched_detections,
            } = matching::greedy_assignment(&dists);

            for (row, col) in matches {
                if let Some(object) = self.objects.get_mut(&ids[row]) {
                    object.centroid = inputs[col];
                    object.disappeared = 0;
                }
            }

            for row in unmatched_tracks {
                self.mark_missed(ids[row]);
            }

            for col in unmatched_detections {
                self.register(inputs[col]);
            }
        }

        self.debug_check_invariants();
        self.objects()
    }

    fn mark_missed(&mut self, id: TrackId) {
        let Some(object) = self.objects.get_mut(&id) else {
            return;
        };
        object.disappeared += 1;
        if object.disappeared > self.config.max_disappeared {
            self.deregister(id);
        }
    }

    fn debug_check_invariants(&self) {
        debug_assert!(
            self.objects.keys().all(|&id| id < self.next_id),
            "live identity at or beyond next_id {}",
            self.next_id
        );
        debug_assert!(
            self.objects
                .values()
                .all(|o| o.disappeared <= self.config.max_disappeared),
            "object retained past max_disappeared"
        );
    }
}

impl Default for CentroidTracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: f32, y: f32) -> Rect {
        Rect::from_tlbr(x - 10.0, y - 10.0, x + 10.0, y + 10.0)
    }

    #[test]
    fn test_first_frame_registers_all() {
        let mut tracker = CentroidTracker::default();
        let objects = tracker.update(&[at(10.0, 10.0), at(200.0, 50.0)]);
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[&0], Centroid::new(10, 10));
        assert_eq!(objects[&1], Centroid::new(200, 50));
        assert_eq!(tracker.next_id(), 2);
    }

    #[test]
    fn test_empty_frame_on_empty_tracker() {
        let mut tracker = CentroidTracker::default();
        assert!(tracker.update(&[]).is_empty());
        assert_eq!(tracker.next_id(), 0);
    }

    #[test]
    fn test_deregister_is_idempotent() {
        let mut tracker = CentroidTracker::default();
        let id = tracker.register(Centroid::new(1, 1));
        tracker.deregister(id);
        tracker.deregister(id);
        tracker.deregister(99);
        assert!(tracker.is_empty());
        assert_eq!(tracker.disappeared(id), None);
    }

    #[test]
    fn test_match_resets_disappeared() {
        let mut tracker = CentroidTracker::default();
        tracker.update(&[at(50.0, 50.0)]);
        tracker.update(&[]);
        tracker.update(&[]);
        assert_eq!(tracker.disappeared(0), Some(2));

        tracker.update(&[at(55.0, 52.0)]);
        assert_eq!(tracker.disappeared(0), Some(0));
        assert_eq!(tracker.centroid(0), Some(Centroid::new(55, 52)));
    }

    #[test]
    fn test_unmatched_input_registers_and_unmatched_track_misses() {
        let mut tracker = CentroidTracker::default();
        tracker.update(&[at(0.0, 0.0), at(100.0, 100.0)]);

        // Object 0 moves slightly, object 1 vanishes and a newcomer appears
        // far away. Object 1's nearest input is the one object 0 claims, so
        // it goes unmatched and the far detection gets a new identity.
        let objects = tracker.update(&[at(3.0, 0.0), at(400.0, 400.0)]);
        assert_eq!(objects.len(), 3);
        assert_eq!(objects[&0], Centroid::new(3, 0));
        assert_eq!(objects[&1], Centroid::new(100, 100));
        assert_eq!(objects[&2], Centroid::new(400, 400));
        assert_eq!(tracker.disappeared(0), Some(0));
        assert_eq!(tracker.disappeared(1), Some(1));
        assert_eq!(tracker.disappeared(2), Some(0));
    }

    #[test]
    fn test_zero_max_disappeared_evicts_on_first_miss() {
        let mut tracker = CentroidTracker::new(TrackerConfig { max_disappeared: 0 });
        tracker.update(&[at(10.0, 10.0)]);
        assert!(tracker.update(&[]).is_empty());
    }
}
