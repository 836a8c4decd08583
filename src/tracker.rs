mod centroid_tracker;
mod matching;
mod rect;

pub use centroid_tracker::{CentroidTracker, TrackId, TrackedObjects, TrackerConfig};
pub use matching::{AssignmentResult, euclidean_distance, greedy_assignment};
pub use rect::{Centroid, Rect};
