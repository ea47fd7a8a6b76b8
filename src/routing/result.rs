//! Routing output: the per-round predecessor graph and journeys
//! reconstructed from it.

use std::fmt;

use hashbrown::HashMap;

use crate::model::time::{Duration, Time};
use crate::model::timetable::Timetable;
use crate::model::types::{
    RouteId, ServiceRouteId, StopId, StopRouteIndex, TransferType, TripRouteIndex,
};
use crate::routing::query::{SourceStopId, StopsIndex};

/// Stable handle of an edge inside one round's arena.
///
/// Continuation chains fan in, so edges reference each other by index
/// rather than ownership; a superseded edge stays addressable.
pub type EdgeId = usize;

/// How a stop was reached within one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutingEdge {
    /// The stop is an origin; `arrival` is the requested departure time.
    Origin { arrival: Time },
    /// Rode a trip from `from_index` to `to_index` of a route. When the ride
    /// continues an earlier vehicle edge of the same round without leaving
    /// the seat, `continuation_of` points at that edge.
    Vehicle {
        arrival: Time,
        from_index: StopRouteIndex,
        to_index: StopRouteIndex,
        route: RouteId,
        trip: TripRouteIndex,
        continuation_of: Option<EdgeId>,
    },
    /// Walked (or stayed seated, for IN_SEAT) from `from` to `to`.
    Transfer {
        arrival: Time,
        from: StopId,
        to: StopId,
        kind: TransferType,
        min_transfer_time: Option<Duration>,
    },
}

impl RoutingEdge {
    pub fn arrival(&self) -> Time {
        match *self {
            RoutingEdge::Origin { arrival }
            | RoutingEdge::Vehicle { arrival, .. }
            | RoutingEdge::Transfer { arrival, .. } => arrival,
        }
    }
}

/// One round's edges: an arena plus the surviving edge per stop.
///
/// A stop may be improved several times within a round; the map points at
/// the last improvement while the arena keeps earlier edges alive for
/// continuation back-references.
#[derive(Debug, Default)]
pub struct RoundEdges {
    arena: Vec<RoutingEdge>,
    by_stop: HashMap<StopId, EdgeId>,
}

impl RoundEdges {
    pub(crate) fn new() -> Self {
        RoundEdges::default()
    }

    pub(crate) fn record(&mut self, stop: StopId, edge: RoutingEdge) -> EdgeId {
        let id = self.arena.len();
        self.arena.push(edge);
        self.by_stop.insert(stop, id);
        id
    }

    pub fn get(&self, id: EdgeId) -> &RoutingEdge {
        &self.arena[id]
    }

    pub fn edge_at(&self, stop: StopId) -> Option<(EdgeId, &RoutingEdge)> {
        let id = *self.by_stop.get(&stop)?;
        Some((id, &self.arena[id]))
    }

    pub fn arrival_at(&self, stop: StopId) -> Option<Time> {
        self.edge_at(stop).map(|(_, edge)| edge.arrival())
    }

    /// Surviving edges of this round, one per reached stop.
    pub fn iter(&self) -> impl Iterator<Item = (StopId, &RoutingEdge)> {
        self.by_stop.iter().map(|(&stop, &id)| (stop, &self.arena[id]))
    }

    pub fn is_empty(&self) -> bool {
        self.by_stop.is_empty()
    }
}

/// Best reach of one stop across all rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arrival {
    pub arrival: Time,
    /// The round that produced this arrival; vehicle boardings used.
    pub leg_number: usize,
}

impl Arrival {
    pub(crate) const UNREACHED: Arrival = Arrival {
        arrival: Time::UNREACHED,
        leg_number: 0,
    };
}

/// One rider-visible step of a journey.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JourneyLeg {
    /// Stay on one vehicle, possibly across advertised route changes.
    Ride {
        route: RouteId,
        service_route: ServiceRouteId,
        trip: TripRouteIndex,
        from_stop: StopId,
        to_stop: StopId,
        departure: Time,
        arrival: Time,
    },
    /// Change stops outside a vehicle.
    Transfer {
        from_stop: StopId,
        to_stop: StopId,
        kind: TransferType,
        departure: Time,
        arrival: Time,
    },
}

/// A reconstructed journey, legs in travel order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Journey {
    pub legs: Vec<JourneyLeg>,
    pub departure: Time,
    pub arrival: Time,
    /// Vehicle changes: boardings minus one.
    pub transfers: usize,
}

impl Journey {
    /// Elapsed time from first departure to final arrival.
    pub fn duration(&self) -> Duration {
        Duration::from_minutes(self.arrival.minutes() - self.departure.minutes())
    }

    pub fn rides(&self) -> usize {
        self.legs
            .iter()
            .filter(|leg| matches!(leg, JourneyLeg::Ride { .. }))
            .count()
    }
}

impl fmt::Display for Journey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for leg in &self.legs {
            match *leg {
                JourneyLeg::Ride {
                    route,
                    from_stop,
                    to_stop,
                    departure,
                    arrival,
                    ..
                } => writeln!(
                    f,
                    "{departure} stop {from_stop} -> {arrival} stop {to_stop} (route {route})",
                )?,
                JourneyLeg::Transfer {
                    from_stop,
                    to_stop,
                    departure,
                    arrival,
                    ..
                } => writeln!(
                    f,
                    "{departure} stop {from_stop} -> {arrival} stop {to_stop} (walk)",
                )?,
            }
        }
        write!(f, "arrive {} after {}", self.arrival, self.duration())
    }
}

/// The output of one routing query.
///
/// Owns the earliest-arrival table and the predecessor graph; borrows the
/// timetable and stops index for reconstruction.
pub struct RoutingResult<'a, I: StopsIndex> {
    timetable: &'a Timetable,
    stops_index: &'a I,
    earliest: Vec<Arrival>,
    graph: Vec<RoundEdges>,
    destinations: Vec<StopId>,
}

impl<'a, I: StopsIndex> RoutingResult<'a, I> {
    pub(crate) fn new(
        timetable: &'a Timetable,
        stops_index: &'a I,
        earliest: Vec<Arrival>,
        graph: Vec<RoundEdges>,
        destinations: Vec<StopId>,
    ) -> Self {
        RoutingResult {
            timetable,
            stops_index,
            earliest,
            graph,
            destinations,
        }
    }

    /// The expanded destination stop set of the query.
    pub fn destinations(&self) -> &[StopId] {
        &self.destinations
    }

    /// Best reach of a timetable stop across all rounds.
    pub fn earliest_arrival(&self, stop: StopId) -> Option<Arrival> {
        let state = *self.earliest.get(stop)?;
        if state.arrival.is_unreached() {
            None
        } else {
            Some(state)
        }
    }

    /// The predecessor graph, indexed by round. Round 0 holds origin edges
    /// and initial transfers.
    pub fn graph(&self) -> &[RoundEdges] {
        &self.graph
    }

    /// Every reached stop with its best arrival, in stop-id order.
    pub fn reached_stops(&self) -> impl Iterator<Item = (StopId, Arrival)> + '_ {
        self.earliest
            .iter()
            .enumerate()
            .filter(|(_, state)| !state.arrival.is_unreached())
            .map(|(stop, &state)| (stop, state))
    }

    /// Earliest arrival at a caller-facing stop, optionally bounded to a
    /// number of vehicle changes.
    ///
    /// With a bound, rounds are scanned downward from `bound + 1`; edges are
    /// only ever recorded on strict improvement, so the highest round holding
    /// an edge for an equivalent stop carries the best arrival within the
    /// bound.
    pub fn arrival_at(&self, stop: SourceStopId, max_transfers: Option<usize>) -> Option<Arrival> {
        let equivalents = self.stops_index.equivalent_stops(stop);
        match max_transfers {
            None => equivalents
                .iter()
                .filter_map(|&s| self.earliest_arrival(s))
                .min_by_key(|arrival| arrival.arrival),
            Some(bound) => {
                let top = (bound + 1).min(self.graph.len().saturating_sub(1));
                for round in (0..=top).rev() {
                    let best = equivalents
                        .iter()
                        .filter_map(|&s| self.graph[round].arrival_at(s))
                        .min();
                    if let Some(arrival) = best {
                        return Some(Arrival {
                            arrival,
                            leg_number: round,
                        });
                    }
                }
                None
            }
        }
    }

    /// Reconstruct the best journey to `to`, or to the query's destination
    /// set when `to` is `None`.
    ///
    /// Among equivalent stops the smallest arrival wins; ties break toward
    /// the smaller stop id. Returns `None` when nothing was reached.
    ///
    /// # Panics
    /// If the predecessor graph is inconsistent (an edge missing at a
    /// non-zero round); the router never produces such a graph.
    pub fn best_journey(&self, to: Option<SourceStopId>) -> Option<Journey> {
        let candidates = match to {
            Some(id) => self.stops_index.equivalent_stops(id),
            None => self.destinations.clone(),
        };
        let mut best: Option<(Time, StopId)> = None;
        for &stop in &candidates {
            if let Some(state) = self.earliest_arrival(stop) {
                let key = (state.arrival, stop);
                if best.is_none_or(|current| key < current) {
                    best = Some(key);
                }
            }
        }
        let (arrival, target) = best?;

        let mut legs = Vec::new();
        let mut current = target;
        let mut round = self.earliest[target].leg_number;
        while round > 0 {
            let Some((_, edge)) = self.graph[round].edge_at(current) else {
                panic!("no routing edge for stop {current} at round {round}");
            };
            match *edge {
                RoutingEdge::Origin { .. } => {
                    panic!("origin edge for stop {current} at non-zero round {round}");
                }
                RoutingEdge::Vehicle { arrival, .. } => {
                    // Collapse a continuation chain into one rider-visible
                    // leg: board where the first edge of the chain boarded.
                    let mut first = edge;
                    while let RoutingEdge::Vehicle {
                        continuation_of: Some(prev),
                        ..
                    } = *first
                    {
                        first = self.graph[round].get(prev);
                    }
                    let RoutingEdge::Vehicle {
                        route, trip, from_index, ..
                    } = *first
                    else {
                        panic!("continuation of a non-vehicle edge at round {round}");
                    };
                    let boarded = self.timetable.get_route(route).unwrap_or_else(|| {
                        panic!("vehicle edge references unknown route {route}")
                    });
                    let from_stop = boarded.stop_at(from_index);
                    legs.push(JourneyLeg::Ride {
                        route,
                        service_route: boarded.service_route(),
                        trip,
                        from_stop,
                        to_stop: current,
                        departure: boarded.departure_from(from_index, trip),
                        arrival,
                    });
                    current = from_stop;
                    round -= 1;
                }
                RoutingEdge::Transfer {
                    arrival,
                    from,
                    kind,
                    ..
                } => {
                    // Transfers never chain; the predecessor in this round
                    // must be a vehicle edge.
                    let Some(departure) = self.graph[round].arrival_at(from) else {
                        panic!("transfer from unreached stop {from} at round {round}");
                    };
                    legs.push(JourneyLeg::Transfer {
                        from_stop: from,
                        to_stop: current,
                        kind,
                        departure,
                        arrival,
                    });
                    current = from;
                }
            }
        }
        legs.reverse();

        let rides = legs
            .iter()
            .filter(|leg| matches!(leg, JourneyLeg::Ride { .. }))
            .count();
        let departure = match legs.first() {
            Some(JourneyLeg::Ride { departure, .. } | JourneyLeg::Transfer { departure, .. }) => {
                *departure
            }
            None => arrival,
        };
        Some(Journey {
            legs,
            departure,
            arrival,
            transfers: rides.saturating_sub(1),
        })
    }
}
