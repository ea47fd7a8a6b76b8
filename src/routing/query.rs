//! Query parameters and the stops-index seam.

use hashbrown::HashMap;

use crate::model::time::{Duration, Time};
use crate::model::types::{RouteType, StopId};

/// A stop identifier in the caller's namespace, resolved to timetable stops
/// through a [`StopsIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceStopId(pub u64);

/// Expands a caller-facing stop id into the set of equivalent timetable
/// stops (a station and its platforms, or siblings).
///
/// This seam keeps name lookup, geometry and parent/child equivalence
/// outside the routing core and lets tests substitute fixed mappings.
/// Unknown ids expand to the empty set; routing still runs and simply
/// reaches nothing from them.
pub trait StopsIndex {
    fn equivalent_stops(&self, id: SourceStopId) -> Vec<StopId>;
}

impl StopsIndex for HashMap<SourceStopId, Vec<StopId>> {
    fn equivalent_stops(&self, id: SourceStopId) -> Vec<StopId> {
        self.get(&id).cloned().unwrap_or_default()
    }
}

/// Routing knobs; the defaults match common journey-planner practice.
#[derive(Debug, Clone)]
pub struct QueryOptions {
    /// Maximum number of vehicle changes; rounds run up to this plus one.
    pub max_transfers: usize,
    /// Dwell applied to transfers that carry no explicit minimum.
    pub min_transfer_time: Duration,
    /// Admitted transport modes; empty means all.
    pub transport_modes: Vec<RouteType>,
}

impl Default for QueryOptions {
    fn default() -> Self {
        QueryOptions {
            max_transfers: 4,
            min_transfer_time: Duration::from_minutes(2),
            transport_modes: Vec::new(),
        }
    }
}

/// One earliest-arrival question: from an origin, to one or more
/// destinations, leaving no earlier than `departure`.
#[derive(Debug, Clone)]
pub struct Query {
    pub from: SourceStopId,
    pub to: Vec<SourceStopId>,
    pub departure: Time,
    pub options: QueryOptions,
}

impl Query {
    pub fn new(from: SourceStopId, to: Vec<SourceStopId>, departure: Time) -> Self {
        Query {
            from,
            to,
            departure,
            options: QueryOptions::default(),
        }
    }
}
