//! The read-only transit network a router scans: routes, per-stop adjacency,
//! transfers and in-seat continuations.

use hashbrown::HashMap;

use crate::model::route::Route;
use crate::model::types::{
    RouteId, RouteType, ServiceRoute, StopId, StopRouteIndex, Transfer, TripBoarding,
    TripRouteIndex, TripStopId,
};

/// What a single stop connects to: the routes serving it and the walking
/// transfers leaving it.
#[derive(Debug, Clone, Default)]
pub struct StopAdjacency {
    pub(crate) routes: Vec<RouteId>,
    pub(crate) transfers: Vec<Transfer>,
}

/// The complete network, built once by an ingester and consumed read-only.
///
/// Routing queries share a timetable freely across threads; nothing in it is
/// mutated after construction.
#[derive(Debug, Clone)]
pub struct Timetable {
    stops: Vec<StopAdjacency>,
    routes: Vec<Route>,
    service_routes: Vec<ServiceRoute>,
    continuations: HashMap<TripStopId, Vec<TripBoarding>>,
}

impl Timetable {
    pub(crate) fn new(
        stops: Vec<StopAdjacency>,
        routes: Vec<Route>,
        service_routes: Vec<ServiceRoute>,
        continuations: HashMap<TripStopId, Vec<TripBoarding>>,
    ) -> Self {
        Timetable {
            stops,
            routes,
            service_routes,
            continuations,
        }
    }

    /// Number of stop ids the timetable covers, including inactive ones.
    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    pub fn get_route(&self, route: RouteId) -> Option<&Route> {
        self.routes.get(route)
    }

    /// Indexing access for ids the timetable itself produced.
    ///
    /// # Panics
    /// If `route` is out of range.
    pub(crate) fn route(&self, route: RouteId) -> &Route {
        &self.routes[route]
    }

    /// Walking transfers leaving a stop; empty for stops without any.
    pub fn get_transfers(&self, stop: StopId) -> &[Transfer] {
        self.stops.get(stop).map_or(&[], |adj| adj.transfers.as_slice())
    }

    /// The in-seat continuations available to a passenger alighting from
    /// `trip_index` of `route` at `stop_index`.
    pub fn get_continuous_trips(
        &self,
        stop_index: StopRouteIndex,
        route: RouteId,
        trip_index: TripRouteIndex,
    ) -> &[TripBoarding] {
        // Assembly validated every continuation key; an unencodable triple
        // cannot have continuations.
        TripStopId::new(stop_index, route, trip_index)
            .ok()
            .and_then(|key| self.continuations.get(&key))
            .map_or(&[], Vec::as_slice)
    }

    /// Line metadata for a route.
    ///
    /// # Panics
    /// If the route references a service route the timetable does not hold;
    /// assembly guarantees it does.
    pub fn get_service_route_info(&self, route: &Route) -> &ServiceRoute {
        &self.service_routes[route.service_route()]
    }

    pub fn routes_passing_through(
        &self,
        stop: StopId,
    ) -> impl Iterator<Item = (RouteId, &Route)> {
        self.stops
            .get(stop)
            .map_or(&[][..], |adj| adj.routes.as_slice())
            .iter()
            .map(|&route| (route, &self.routes[route]))
    }

    /// A stop participates in the network iff some route visits it or some
    /// transfer leaves it.
    pub fn is_active(&self, stop: StopId) -> bool {
        self.stops
            .get(stop)
            .is_some_and(|adj| !adj.routes.is_empty() || !adj.transfers.is_empty())
    }

    /// Every route serving any of `from_stops` whose mode is admitted,
    /// keyed to the smallest stop-route index over all occurrences of the
    /// marked stops. Scanning from the earliest boarding point dominates
    /// boarding the same route later. An empty `modes` admits every mode.
    pub fn find_reachable_routes(
        &self,
        from_stops: impl IntoIterator<Item = StopId>,
        modes: &[RouteType],
    ) -> HashMap<RouteId, StopRouteIndex> {
        let mut reachable: HashMap<RouteId, StopRouteIndex> = HashMap::new();
        for stop in from_stops {
            for (route_id, route) in self.routes_passing_through(stop) {
                if !modes.is_empty() {
                    let mode = self.service_routes[route.service_route()].route_type;
                    if !modes.contains(&mode) {
                        continue;
                    }
                }
                for index in route.stop_route_indices(stop) {
                    reachable
                        .entry(route_id)
                        .and_modify(|hop_on| *hop_on = (*hop_on).min(index))
                        .or_insert(index);
                }
            }
        }
        reachable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::builder::TimetableBuilder;
    use crate::model::time::{Duration, Time};
    use crate::model::types::TransferType;

    fn t(h: u32, m: u32) -> Time {
        Time::from_hm(h, m)
    }

    /// Route 0 (bus): 0 -> 1 -> 2, route 1 (rail): 3 -> 1 -> 4,
    /// transfer 2 -> 3.
    fn sample_timetable() -> Timetable {
        let mut builder = TimetableBuilder::new();
        let bus = builder.add_service_route("10", RouteType::Bus);
        let rail = builder.add_service_route("S1", RouteType::Rail);
        builder
            .add_route(
                bus,
                vec![0, 1, 2],
                vec![vec![(t(8, 0), t(8, 5)), (t(8, 20), t(8, 25)), (t(8, 40), t(8, 45))]],
            )
            .unwrap();
        builder
            .add_route(
                rail,
                vec![3, 1, 4],
                vec![vec![(t(9, 0), t(9, 5)), (t(9, 20), t(9, 25)), (t(9, 40), t(9, 45))]],
            )
            .unwrap();
        builder.add_transfer(
            2,
            Transfer {
                destination: 3,
                kind: TransferType::RequiresMinimalTime,
                min_transfer_time: Some(Duration::from_minutes(4)),
            },
        );
        builder.build()
    }

    #[test]
    fn transfers_lookup_never_fails() {
        let timetable = sample_timetable();
        assert_eq!(timetable.get_transfers(2).len(), 1);
        assert!(timetable.get_transfers(0).is_empty());
        assert!(timetable.get_transfers(9999).is_empty());
    }

    #[test]
    fn active_stops() {
        let timetable = sample_timetable();
        for stop in 0..5 {
            assert!(timetable.is_active(stop), "stop {stop}");
        }
        assert!(!timetable.is_active(9999));
    }

    #[test]
    fn service_route_info() {
        let timetable = sample_timetable();
        let route = timetable.get_route(1).unwrap();
        let info = timetable.get_service_route_info(route);
        assert_eq!(info.name, "S1");
        assert_eq!(info.route_type, RouteType::Rail);
    }

    #[test]
    fn reachable_routes_keep_the_earliest_hop_on() {
        let timetable = sample_timetable();
        // Stops 1 and 2 both sit on route 0; index 1 dominates index 2.
        let reachable = timetable.find_reachable_routes([1, 2], &[]);
        assert_eq!(reachable[&0], 1);
        assert_eq!(reachable[&1], 1);

        let reachable = timetable.find_reachable_routes([2], &[]);
        assert_eq!(reachable[&0], 2);
        assert!(!reachable.contains_key(&1));
    }

    #[test]
    fn reachable_routes_filter_by_mode() {
        let timetable = sample_timetable();
        let reachable = timetable.find_reachable_routes([1], &[RouteType::Rail]);
        assert!(!reachable.contains_key(&0));
        assert_eq!(reachable[&1], 1);

        // Empty mode set admits everything.
        let reachable = timetable.find_reachable_routes([1], &[]);
        assert_eq!(reachable.len(), 2);
    }

    #[test]
    fn reachable_routes_on_a_revisiting_route() {
        let mut builder = TimetableBuilder::new();
        let loop_line = builder.add_service_route("loop", RouteType::Tram);
        builder
            .add_route(
                loop_line,
                vec![0, 1, 0, 2],
                vec![vec![
                    (t(7, 0), t(7, 1)),
                    (t(7, 10), t(7, 11)),
                    (t(7, 20), t(7, 21)),
                    (t(7, 30), t(7, 31)),
                ]],
            )
            .unwrap();
        let timetable = builder.build();
        let reachable = timetable.find_reachable_routes([0], &[]);
        assert_eq!(reachable[&0], 0);
    }

    #[test]
    fn continuations_lookup() {
        let mut builder = TimetableBuilder::new();
        let line = builder.add_service_route("A", RouteType::Bus);
        builder
            .add_route(line, vec![0, 1], vec![vec![(t(8, 0), t(8, 1)), (t(8, 10), t(8, 11))]])
            .unwrap();
        builder
            .add_route(line, vec![1, 2], vec![vec![(t(8, 11), t(8, 12)), (t(8, 20), t(8, 21))]])
            .unwrap();
        builder
            .add_continuation(
                0,
                1,
                0,
                TripBoarding {
                    route: 1,
                    hop_on_stop_index: 0,
                    trip_index: 0,
                },
            )
            .unwrap();
        let timetable = builder.build();

        let continuations = timetable.get_continuous_trips(1, 0, 0);
        assert_eq!(continuations.len(), 1);
        assert_eq!(continuations[0].route, 1);
        assert!(timetable.get_continuous_trips(0, 0, 0).is_empty());
        assert!(timetable.get_continuous_trips(1, 0, 7).is_empty());
    }
}
