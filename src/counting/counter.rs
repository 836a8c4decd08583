//! Per-stream crossing counter.

use std::collections::BTreeMap;

use crate::counting::policy::{CountSnapshot, CountingPolicy, CrossingPolicy, Tally};
use crate::counting::side::Side;
use crate::tracker::{TrackId, TrackedObjects};

/// Turns the tracker's live mapping into directional counts.
///
/// Side state is created on an identity's first observation and dropped on
/// the same frame the tracker stops reporting it.
#[derive(Debug, Clone)]
pub struct CrossingCounter<P: CrossingPolicy = CountingPolicy> {
    policy: P,
    sides: BTreeMap<TrackId, Side>,
    tally: Tally,
    live: usize,
}

impl<P: CrossingPolicy> CrossingCounter<P> {
    pub fn new(policy: P) -> Self {
        Self {
            policy,
            sides: BTreeMap::new(),
            tally: Tally::default(),
            live: 0,
        }
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn side(&self, id: TrackId) -> Option<Side> {
        self.sides.get(&id).copied()
    }

    pub fn tally(&self) -> &Tally {
        &self.tally
    }

    pub fn is_inside(&self, id: TrackId) -> bool {
        self.tally.inside.contains(&id)
    }

    /// Apply one frame of tracker output.
    pub fn update(&mut self, objects: &TrackedObjects) -> CountSnapshot {
        for (&id, &centroid) in objects {
            let previous = self.sides.get(&id).copied();
            let current = self.policy.classify(centroid, previous);
            if let Some(previous) = previous {
                if previous != current {
                    self.policy
                        .on_transition(id, previous, current, &mut self.tally);
                }
            }
            self.sides.insert(id, current);
        }

        let retired: Vec<TrackId> = self
            .sides
            .keys()
            .filter(|&&id| !objects.contains_key(&id))
            .copied()
            .collect();
        for id in retired {
            if let Some(last) = self.sides.remove(&id) {
                self.policy.on_retire(id, last, &mut self.tally);
            }
        }

        debug_assert_eq!(self.sides.len(), objects.len());
        debug_assert!(
            self.tally.inside.iter().all(|id| objects.contains_key(id)),
            "inside set holds an identity the tracker no longer reports"
        );
        self.live = objects.len();
        self.snapshot()
    }

    /// Counts as of the last update.
    pub fn snapshot(&self) -> CountSnapshot {
        self.policy.snapshot(&self.tally, self.live)
    }

    /// Discard all per-identity state and counts.
    pub fn reset(&mut self) {
        self.sides.clear();
        self.tally = Tally::default();
        self.live = 0;
    }
}
