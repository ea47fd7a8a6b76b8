//! Per-query mutable state of the round-based scan.

use fixedbitset::FixedBitSet;

use crate::model::time::Time;
use crate::model::types::StopId;
use crate::routing::result::{Arrival, RoundEdges};

/// Everything one query mutates: the best-reach table, the marked-stop set
/// feeding the next round, and the per-round edge graph.
///
/// The marked set is hot; a bitset gives dedup for free and clears in one
/// pass.
#[derive(Debug)]
pub(crate) struct RouterState {
    pub(crate) earliest: Vec<Arrival>,
    pub(crate) marked: FixedBitSet,
    pub(crate) graph: Vec<RoundEdges>,
}

impl RouterState {
    pub(crate) fn new(stop_count: usize) -> Self {
        RouterState {
            earliest: vec![Arrival::UNREACHED; stop_count],
            marked: FixedBitSet::with_capacity(stop_count),
            graph: Vec::new(),
        }
    }

    /// Strict improvement of the best-reach table. Arrivals never regress:
    /// a worse or equal candidate leaves the entry untouched.
    pub(crate) fn improve(&mut self, stop: StopId, arrival: Time, round: usize) -> bool {
        if arrival < self.earliest[stop].arrival {
            self.earliest[stop] = Arrival {
                arrival,
                leg_number: round,
            };
            true
        } else {
            false
        }
    }

    pub(crate) fn best_arrival(&self, stop: StopId) -> Time {
        self.earliest[stop].arrival
    }

    /// Marked stops in ascending id order.
    pub(crate) fn marked_stops(&self) -> Vec<StopId> {
        self.marked.ones().collect()
    }
}
