//! Pluggable crossing strategies.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::counting::band::BandPolicy;
use crate::counting::line::LinePolicy;
use crate::counting::side::Side;
use crate::tracker::{Centroid, TrackId};

/// Running accumulators shared by all policies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    pub entered: usize,
    pub exited: usize,
    /// Identities currently counted as inside (line policy).
    pub inside: BTreeSet<TrackId>,
    /// Identities whose exit has already been counted (band policy).
    ///
    /// Grows by one entry per counted exit and is only cleared by
    /// [`CrossingCounter::reset`](crate::counting::CrossingCounter::reset).
    pub counted: BTreeSet<TrackId>,
}

/// Aggregate counts after a processed frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CountSnapshot {
    pub entered: usize,
    pub exited: usize,
    pub inside: usize,
    pub total: usize,
}

/// Spatial crossing rule driving a [`CrossingCounter`](crate::counting::CrossingCounter).
pub trait CrossingPolicy {
    /// Classify `centroid`, given the side recorded on the previous frame
    /// (`None` on first observation).
    fn classify(&self, centroid: Centroid, previous: Option<Side>) -> Side;

    /// Called when a previously observed identity changes side.
    fn on_transition(&self, _id: TrackId, _from: Side, _to: Side, _tally: &mut Tally) {}

    /// Called once when the tracker stops reporting `id`.
    fn on_retire(&self, _id: TrackId, _last: Side, _tally: &mut Tally) {}

    /// Derive the published counts. `live` is the number of tracked identities.
    fn snapshot(&self, tally: &Tally, live: usize) -> CountSnapshot;
}

/// Policy chosen per deployment at runtime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CountingPolicy {
    Band(BandPolicy),
    Line(LinePolicy),
}

impl From<BandPolicy> for CountingPolicy {
    fn from(policy: BandPolicy) -> Self {
        Self::Band(policy)
    }
}

impl From<LinePolicy> for CountingPolicy {
    fn from(policy: LinePolicy) -> Self {
        Self::Line(policy)
    }
}

impl CrossingPolicy for CountingPolicy {
    fn classify(&self, centroid: Centroid, previous: Option<Side>) -> Side {
        match self {
            Self::Band(p) => p.classify(centroid, previous),
            Self::Line(p) => p.classify(centroid, previous),
        }
    }

    fn on_transition(&self, id: TrackId, from: Side, to: Side, tally: &mut Tally) {
        match self {
            Self::Band(p) => p.on_transition(id, from, to, tally),
            Self::Line(p) => p.on_transition(id, from, to, tally),
        }
    }

    fn on_retire(&self, id: TrackId, last: Side, tally: &mut Tally) {
        match self {
            Self::Band(p) => p.on_retire(id, last, tally),
            Self::Line(p) => p.on_retire(id, last, tally),
        }
    }

    fn snapshot(&self, tally: &Tally, live: usize) -> CountSnapshot {
        match self {
            Self::Band(p) => p.snapshot(tally, live),
            Self::Line(p) => p.snapshot(tally, live),
        }
    }
}
