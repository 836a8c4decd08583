//! Bidirectional counting across a single horizontal line.

use tracing::debug;

use crate::counting::policy::{CountSnapshot, CrossingPolicy, Tally};
use crate::counting::side::Side;
use crate::error::ConfigError;
use crate::tracker::{Centroid, TrackId};

/// Line at pixel row `line_y`. Moving from below to above is an entry,
/// above to below an exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinePolicy {
    line_y: i32,
}

impl LinePolicy {
    pub fn new(line_y: i32) -> Self {
        Self { line_y }
    }

    /// Line through the middle of the frame.
    pub fn from_frame_height(height: u32) -> Result<Self, ConfigError> {
        if height == 0 {
            return Err(ConfigError::InvalidFrameHeight);
        }
        let height = i32::try_from(height).map_err(|_| ConfigError::InvalidFrameHeight)?;
        Ok(Self::new(height / 2))
    }

    pub fn line_y(&self) -> i32 {
        self.line_y
    }
}

impl CrossingPolicy for LinePolicy {
    fn classify(&self, centroid: Centroid, _previous: Option<Side>) -> Side {
        if centroid.y < self.line_y {
            Side::Above
        } else {
            Side::Below
        }
    }

    fn on_transition(&self, id: TrackId, from: Side, to: Side, tally: &mut Tally) {
        match (from, to) {
            (Side::Below, Side::Above) => {
                tally.entered += 1;
                tally.inside.insert(id);
                debug!(id, entered = tally.entered, "entry counted");
            }
            (Side::Above, Side::Below) => {
                tally.exited += 1;
                tally.inside.remove(&id);
                debug!(id, exited = tally.exited, "exit counted");
            }
            _ => {}
        }
    }

    fn on_retire(&self, id: TrackId, _last: Side, tally: &mut Tally) {
        tally.inside.remove(&id);
    }

    fn snapshot(&self, tally: &Tally, _live: usize) -> CountSnapshot {
        CountSnapshot {
            entered: tally.entered,
            exited: tally.exited,
            inside: tally.inside.len(),
            total: tally.entered,
        }
    }
}
