//! The round-based earliest-arrival scan.
//!
//! Round k explores everything reachable with exactly k vehicle boardings.
//! Each round scans the routes touched by the previous round's marked stops,
//! chases in-seat continuations to a fixpoint, then relaxes walking
//! transfers. Two prunes keep the scan tight: a stop is only improved
//! strictly (local pruning), and nothing at or past the best known
//! destination arrival is recorded (target pruning).

mod state;

use log::{debug, trace};

use crate::model::time::{Duration, Time};
use crate::model::timetable::Timetable;
use crate::model::types::{
    PickupDropOffType, RouteId, StopId, StopRouteIndex, TransferType, TripBoarding,
    TripRouteIndex,
};
use crate::routing::query::{Query, StopsIndex};
use crate::routing::result::{EdgeId, RoundEdges, RoutingEdge, RoutingResult};
use state::RouterState;

/// The trip currently ridden while walking a route's stops, and where it
/// was boarded.
struct ActiveTrip {
    trip: TripRouteIndex,
    hop_on: StopRouteIndex,
}

/// Answer a query against a timetable.
///
/// Always returns a result; unreached destinations simply have no arrival
/// and [`RoutingResult::best_journey`] returns `None` for them. An unknown
/// origin expands to an empty set and reaches nothing.
pub fn route<'a, I: StopsIndex>(
    timetable: &'a Timetable,
    stops_index: &'a I,
    query: &Query,
) -> RoutingResult<'a, I> {
    let stop_count = timetable.stop_count();
    let origins: Vec<StopId> = stops_index
        .equivalent_stops(query.from)
        .into_iter()
        .filter(|&stop| stop < stop_count)
        .collect();
    let mut destinations: Vec<StopId> = query
        .to
        .iter()
        .flat_map(|&id| stops_index.equivalent_stops(id))
        .filter(|&stop| stop < stop_count)
        .collect();
    destinations.sort_unstable();
    destinations.dedup();

    debug!(
        "routing from {} origin stops to {} destination stops, departing {}",
        origins.len(),
        destinations.len(),
        query.departure,
    );

    let mut state = RouterState::new(stop_count);
    state.graph.push(RoundEdges::new());
    for &origin in &origins {
        state.graph[0].record(origin, RoutingEdge::Origin {
            arrival: query.departure,
        });
        state.improve(origin, query.departure, 0);
        state.marked.insert(origin);
    }
    // Initial transfers count as reached without any leg, so routes serving
    // a walkable sibling of the origin can board in round one.
    relax_transfers(
        timetable,
        &mut state,
        0,
        &destinations,
        query.options.min_transfer_time,
    );

    let max_rounds = query.options.max_transfers + 1;
    let mut rounds_run = 0;
    for round in 1..=max_rounds {
        if state.marked.is_clear() {
            break;
        }
        state.graph.push(RoundEdges::new());

        let mut reachable: Vec<(RouteId, StopRouteIndex)> = timetable
            .find_reachable_routes(state.marked_stops(), &query.options.transport_modes)
            .into_iter()
            .collect();
        reachable.sort_unstable();
        state.marked.clear();
        trace!("round {round}: {} reachable routes", reachable.len());

        // Vehicle edges recorded this round, in recording order; the
        // continuation pass consumes this as a queue and appends to it.
        let mut vehicle_edges: Vec<(StopId, EdgeId)> = Vec::new();
        for &(route_id, hop_on) in &reachable {
            scan_route(
                timetable,
                &mut state,
                round,
                route_id,
                hop_on,
                &destinations,
                &mut vehicle_edges,
            );
        }

        let mut next = 0;
        while next < vehicle_edges.len() {
            let (_, edge_id) = vehicle_edges[next];
            next += 1;
            let RoutingEdge::Vehicle {
                to_index, route, trip, ..
            } = *state.graph[round].get(edge_id)
            else {
                continue;
            };
            for &boarding in timetable.get_continuous_trips(to_index, route, trip) {
                scan_continuation(
                    timetable,
                    &mut state,
                    round,
                    boarding,
                    edge_id,
                    &destinations,
                    &mut vehicle_edges,
                );
            }
        }

        relax_transfers(
            timetable,
            &mut state,
            round,
            &destinations,
            query.options.min_transfer_time,
        );
        rounds_run = round;
    }

    debug!("finished after {rounds_run} rounds");
    RoutingResult::new(timetable, stops_index, state.earliest, state.graph, destinations)
}

fn best_target_arrival(state: &RouterState, destinations: &[StopId]) -> Time {
    destinations
        .iter()
        .map(|&destination| state.best_arrival(destination))
        .fold(Time::UNREACHED, Time::min)
}

/// Walk one route from its hop-on stop, riding the active trip and trying
/// to catch an earlier one at every stop.
///
/// The order is update-then-board: arrivals recorded in this round are
/// compared against the previous round's edges, so a trip never feeds its
/// own boarding, and the active trip only ever moves to an earlier index.
fn scan_route(
    timetable: &Timetable,
    state: &mut RouterState,
    round: usize,
    route_id: RouteId,
    hop_on: StopRouteIndex,
    destinations: &[StopId],
    vehicle_edges: &mut Vec<(StopId, EdgeId)>,
) {
    let route = timetable.route(route_id);
    let best_target = best_target_arrival(state, destinations);
    let mut active: Option<ActiveTrip> = None;

    for j in hop_on..route.stop_count() {
        let stop = route.stop_at(j);

        if let Some(ref riding) = active {
            let arrival = route.arrival_at(j, riding.trip);
            if route.drop_off_type_at(j, riding.trip) != PickupDropOffType::NotAvailable
                && arrival < state.best_arrival(stop)
                && arrival < best_target
            {
                let id = state.graph[round].record(stop, RoutingEdge::Vehicle {
                    arrival,
                    from_index: riding.hop_on,
                    to_index: j,
                    route: route_id,
                    trip: riding.trip,
                    continuation_of: None,
                });
                state.improve(stop, arrival, round);
                state.marked.insert(stop);
                vehicle_edges.push((stop, id));
            }
        }

        if let Some(reached) = state.graph[round - 1].arrival_at(stop) {
            let boardable = match active {
                None => true,
                Some(ref riding) => reached <= route.departure_from(j, riding.trip),
            };
            if boardable {
                let earlier =
                    route.find_earliest_trip(j, reached, active.as_ref().map(|t| t.trip));
                if let Some(trip) = earlier {
                    active = Some(ActiveTrip { trip, hop_on: j });
                }
            }
        }
    }
}

/// Ride a continuation trip from its boarding point onward. The trip is
/// already chosen, so there is no catch-an-earlier-trip step; every edge
/// recorded here chains back to the vehicle edge it continues.
fn scan_continuation(
    timetable: &Timetable,
    state: &mut RouterState,
    round: usize,
    boarding: TripBoarding,
    continues: EdgeId,
    destinations: &[StopId],
    vehicle_edges: &mut Vec<(StopId, EdgeId)>,
) {
    let route = timetable.route(boarding.route);
    let best_target = best_target_arrival(state, destinations);

    // The boarding stop itself is where the rider already sits; only stops
    // past it can be alighted at.
    for j in (boarding.hop_on_stop_index + 1)..route.stop_count() {
        let stop = route.stop_at(j);
        let arrival = route.arrival_at(j, boarding.trip_index);
        if route.drop_off_type_at(j, boarding.trip_index) != PickupDropOffType::NotAvailable
            && arrival < state.best_arrival(stop)
            && arrival < best_target
        {
            let id = state.graph[round].record(stop, RoutingEdge::Vehicle {
                arrival,
                from_index: boarding.hop_on_stop_index,
                to_index: j,
                route: boarding.route,
                trip: boarding.trip_index,
                continuation_of: Some(continues),
            });
            state.improve(stop, arrival, round);
            state.marked.insert(stop);
            vehicle_edges.push((stop, id));
        }
    }
}

/// Extend this round's vehicle reaches (and, at round zero, the origins)
/// by walking transfers. Sources are snapshotted first: a stop reached by
/// transfer never feeds another transfer in the same round.
fn relax_transfers(
    timetable: &Timetable,
    state: &mut RouterState,
    round: usize,
    destinations: &[StopId],
    default_dwell: Duration,
) {
    let sources = state.marked_stops();
    let best_target = best_target_arrival(state, destinations);

    for stop in sources {
        let reached = match state.graph[round].edge_at(stop) {
            Some((_, RoutingEdge::Transfer { .. })) | None => continue,
            Some((_, edge)) => edge.arrival(),
        };
        for transfer in timetable.get_transfers(stop) {
            let dwell = transfer.min_transfer_time.unwrap_or(
                if transfer.kind == TransferType::InSeat {
                    Duration::ZERO
                } else {
                    default_dwell
                },
            );
            let arrival = reached.plus(dwell);
            if arrival >= best_target {
                continue;
            }
            let current = state.graph[round].arrival_at(transfer.destination);
            if current.is_none_or(|existing| arrival < existing) {
                state.graph[round].record(transfer.destination, RoutingEdge::Transfer {
                    arrival,
                    from: stop,
                    to: transfer.destination,
                    kind: transfer.kind,
                    min_transfer_time: transfer.min_transfer_time,
                });
                state.improve(transfer.destination, arrival, round);
                state.marked.insert(transfer.destination);
            }
        }
    }
}
