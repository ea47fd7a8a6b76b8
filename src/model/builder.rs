//! Assembly of a [`Timetable`] from per-route stop lists and trip times.
//!
//! Feed ingestion lives outside this crate; ingesters (and the tests) hand
//! already-resolved dense ids to this builder, which lays the data out in
//! the columnar form the router scans.

use hashbrown::HashMap;
use log::info;

use crate::error::ModelError;
use crate::model::route::{Route, pack_pickup_drop_off};
use crate::model::time::Time;
use crate::model::timetable::{StopAdjacency, Timetable};
use crate::model::types::{
    PickupDropOffType, RouteId, RouteType, ServiceRoute, ServiceRouteId, StopId,
    StopRouteIndex, Transfer, TripBoarding, TripRouteIndex, TripStopId,
};

/// One trip's stop times as (arrival, departure) pairs, one per route stop.
pub type TripTimes = Vec<(Time, Time)>;
/// One trip's (pickup, drop-off) availability, one pair per route stop.
pub type TripAccess = Vec<(PickupDropOffType, PickupDropOffType)>;

#[derive(Debug, Default)]
pub struct TimetableBuilder {
    service_routes: Vec<ServiceRoute>,
    routes: Vec<Route>,
    transfers: HashMap<StopId, Vec<Transfer>>,
    continuations: HashMap<TripStopId, Vec<TripBoarding>>,
    stop_count: usize,
}

impl TimetableBuilder {
    pub fn new() -> Self {
        TimetableBuilder::default()
    }

    pub fn add_service_route(&mut self, name: &str, route_type: RouteType) -> ServiceRouteId {
        self.service_routes.push(ServiceRoute {
            name: name.to_string(),
            route_type,
        });
        self.service_routes.len() - 1
    }

    /// Add a route whose every stop allows regular pickup and drop-off.
    pub fn add_route(
        &mut self,
        service_route: ServiceRouteId,
        stops: Vec<StopId>,
        trips: Vec<TripTimes>,
    ) -> Result<RouteId, ModelError> {
        let access = vec![
            vec![(PickupDropOffType::Regular, PickupDropOffType::Regular); stops.len()];
            trips.len()
        ];
        self.add_route_with_access(service_route, stops, trips, access)
    }

    /// Add a route with explicit per-trip-stop boarding attributes.
    ///
    /// Trips are stored sorted by their first departure so the router can
    /// binary-search them.
    pub fn add_route_with_access(
        &mut self,
        service_route: ServiceRouteId,
        stops: Vec<StopId>,
        trips: Vec<TripTimes>,
        access: Vec<TripAccess>,
    ) -> Result<RouteId, ModelError> {
        if service_route >= self.service_routes.len() {
            return Err(ModelError::UnknownServiceRoute(service_route));
        }
        if access.len() != trips.len() {
            return Err(ModelError::TripLengthMismatch {
                expected: trips.len(),
                got: access.len(),
            });
        }
        for trip in &trips {
            if trip.len() != stops.len() {
                return Err(ModelError::TripLengthMismatch {
                    expected: stops.len(),
                    got: trip.len(),
                });
            }
        }
        for row in &access {
            if row.len() != stops.len() {
                return Err(ModelError::TripLengthMismatch {
                    expected: stops.len(),
                    got: row.len(),
                });
            }
        }

        let mut ordered: Vec<(TripTimes, TripAccess)> = trips.into_iter().zip(access).collect();
        ordered.sort_by_key(|(times, _)| times.first().map_or(0, |&(_, dep)| dep.minutes()));

        let mut stop_times = Vec::with_capacity(2 * stops.len() * ordered.len());
        let mut pairs = Vec::with_capacity(stops.len() * ordered.len());
        for (times, row) in ordered {
            for (arrival, departure) in times {
                stop_times.push(minutes_u16(arrival)?);
                stop_times.push(minutes_u16(departure)?);
            }
            pairs.extend(row);
        }

        for &stop in &stops {
            self.touch_stop(stop);
        }
        self.routes.push(Route::new(
            service_route,
            stops,
            stop_times,
            pack_pickup_drop_off(&pairs),
        ));
        Ok(self.routes.len() - 1)
    }

    pub fn add_transfer(&mut self, from: StopId, transfer: Transfer) {
        self.touch_stop(from);
        self.touch_stop(transfer.destination);
        self.transfers.entry(from).or_default().push(transfer);
    }

    /// Declare that a passenger alighting from `trip_index` of `route` at
    /// `stop_index` may stay seated into `boarding`.
    pub fn add_continuation(
        &mut self,
        route: RouteId,
        stop_index: StopRouteIndex,
        trip_index: TripRouteIndex,
        boarding: TripBoarding,
    ) -> Result<(), ModelError> {
        self.check_boarding(route, stop_index, trip_index)?;
        self.check_boarding(boarding.route, boarding.hop_on_stop_index, boarding.trip_index)?;
        let key = TripStopId::new(stop_index, route, trip_index)?;
        self.continuations.entry(key).or_default().push(boarding);
        Ok(())
    }

    /// Reserve a stop id known to the wider system even if nothing in this
    /// timetable serves it.
    pub fn ensure_stop(&mut self, stop: StopId) {
        self.touch_stop(stop);
    }

    pub fn build(self) -> Timetable {
        let mut stops = vec![StopAdjacency::default(); self.stop_count];
        for (route_id, route) in self.routes.iter().enumerate() {
            for &stop in route.stops() {
                let routes = &mut stops[stop].routes;
                if routes.last() != Some(&route_id) {
                    routes.push(route_id);
                }
            }
        }
        for (stop, transfers) in self.transfers {
            stops[stop].transfers = transfers;
        }
        info!(
            "assembled timetable: {} stops, {} routes, {} service routes, {} continuation points",
            stops.len(),
            self.routes.len(),
            self.service_routes.len(),
            self.continuations.len(),
        );
        Timetable::new(stops, self.routes, self.service_routes, self.continuations)
    }

    fn touch_stop(&mut self, stop: StopId) {
        self.stop_count = self.stop_count.max(stop + 1);
    }

    fn check_boarding(
        &self,
        route: RouteId,
        stop_index: StopRouteIndex,
        trip_index: TripRouteIndex,
    ) -> Result<(), ModelError> {
        let target = self.routes.get(route).ok_or(ModelError::UnknownRoute(route))?;
        if stop_index >= target.stop_count() {
            return Err(ModelError::InvalidBoarding {
                route,
                index: stop_index,
            });
        }
        if trip_index >= target.trip_count() {
            return Err(ModelError::InvalidBoarding {
                route,
                index: trip_index,
            });
        }
        Ok(())
    }
}

fn minutes_u16(time: Time) -> Result<u16, ModelError> {
    u16::try_from(time.minutes()).map_err(|_| ModelError::StopTimeOverflow(time.minutes()))
}
