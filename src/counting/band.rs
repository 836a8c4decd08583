//! Exit counting through a horizontal capture band near the bottom edge.

use tracing::debug;

use crate::counting::policy::{CountSnapshot, CrossingPolicy, Tally};
use crate::counting::side::Side;
use crate::error::ConfigError;
use crate::tracker::{Centroid, TrackId};

/// Band between `zone_top` and `zone_bottom` (pixel rows, inclusive).
///
/// Identities last seen above the band when they vanish are counted as
/// exits. Inside the band the previous side is kept, so an object walking
/// through it does not flicker between states. Entries are never counted;
/// `total` is `inside + exited`, which counts an object twice if it leaves
/// and comes back under a new identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandPolicy {
    zone_top: i32,
    zone_bottom: i32,
}

impl BandPolicy {
    pub fn new(zone_top: i32, zone_bottom: i32) -> Result<Self, ConfigError> {
        if zone_top > zone_bottom {
            return Err(ConfigError::InvalidZone {
                top: zone_top,
                bottom: zone_bottom,
            });
        }
        Ok(Self {
            zone_top,
            zone_bottom,
        })
    }

    /// Band spanning `height - 100` to `height - 20`.
    pub fn from_frame_height(height: u32) -> Result<Self, ConfigError> {
        if height == 0 {
            return Err(ConfigError::InvalidFrameHeight);
        }
        let height = i32::try_from(height).map_err(|_| ConfigError::InvalidFrameHeight)?;
        Self::new(height - 100, height - 20)
    }

    pub fn zone_top(&self) -> i32 {
        self.zone_top
    }

    pub fn zone_bottom(&self) -> i32 {
        self.zone_bottom
    }
}

impl CrossingPolicy for BandPolicy {
    fn classify(&self, centroid: Centroid, previous: Option<Side>) -> Side {
        if centroid.y < self.zone_top {
            Side::Above
        } else if centroid.y > self.zone_bottom {
            Side::Below
        } else {
            previous.unwrap_or(Side::Unknown)
        }
    }

    fn on_retire(&self, id: TrackId, last: Side, tally: &mut Tally) {
        if last == Side::Above && tally.counted.insert(id) {
            tally.exited += 1;
            debug!(id, exited = tally.exited, "exit counted");
        }
    }

    fn snapshot(&self, tally: &Tally, live: usize) -> CountSnapshot {
        CountSnapshot {
            entered: 0,
            exited: tally.exited,
            inside: live,
            total: live + tally.exited,
        }
    }
}
