//! Columnar storage of one route: its ordered stops, packed stop times and
//! packed boarding attributes.

use hashbrown::HashMap;

use crate::model::time::Time;
use crate::model::types::{
    PickupDropOffType, ServiceRouteId, StopId, StopRouteIndex, TripRouteIndex,
};

/// One internal route: an equivalence class of trips sharing the same stop
/// sequence within a service route.
///
/// Stop times live in a flat array of `2 * stops * trips` minute values,
/// trips laid out contiguously and sorted by first departure: for any stop
/// index, a later trip never departs earlier. Pickup/drop-off attributes are
/// packed at 2 bits per value, two (pickup, drop-off) pairs per byte.
///
/// Immutable after construction. All accessors are total over valid indices
/// and panic on out-of-range input.
#[derive(Debug, Clone)]
pub struct Route {
    service_route: ServiceRouteId,
    stops: Vec<StopId>,
    stop_times: Vec<u16>,
    pickup_drop_off: Vec<u8>,
    stop_indices: HashMap<StopId, StopRouteIndex>,
}

impl Route {
    pub(crate) fn new(
        service_route: ServiceRouteId,
        stops: Vec<StopId>,
        stop_times: Vec<u16>,
        pickup_drop_off: Vec<u8>,
    ) -> Self {
        debug_assert!(stops.is_empty() || stop_times.len() % (2 * stops.len()) == 0);
        // First occurrence is the representative index for revisited stops.
        let mut stop_indices = HashMap::with_capacity(stops.len());
        for (index, &stop) in stops.iter().enumerate() {
            stop_indices.entry(stop).or_insert(index);
        }
        Route {
            service_route,
            stops,
            stop_times,
            pickup_drop_off,
            stop_indices,
        }
    }

    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    pub fn trip_count(&self) -> usize {
        if self.stops.is_empty() {
            0
        } else {
            self.stop_times.len() / (2 * self.stops.len())
        }
    }

    pub fn service_route(&self) -> ServiceRouteId {
        self.service_route
    }

    pub fn stops(&self) -> &[StopId] {
        &self.stops
    }

    /// The stop at a given position on the route.
    ///
    /// # Panics
    /// If `stop_index` is out of range.
    pub fn stop_at(&self, stop_index: StopRouteIndex) -> StopId {
        self.stops[stop_index]
    }

    /// Representative position of a stop on this route, if it is visited.
    pub fn stop_route_index(&self, stop: StopId) -> Option<StopRouteIndex> {
        self.stop_indices.get(&stop).copied()
    }

    /// Every position at which a stop occurs on this route. Routes may
    /// revisit a stop; the representative map keeps only the first index.
    pub fn stop_route_indices(&self, stop: StopId) -> Vec<StopRouteIndex> {
        self.stops
            .iter()
            .enumerate()
            .filter(|&(_, &s)| s == stop)
            .map(|(index, _)| index)
            .collect()
    }

    fn time_offset(&self, stop_index: StopRouteIndex, trip_index: TripRouteIndex) -> usize {
        assert!(
            stop_index < self.stop_count() && trip_index < self.trip_count(),
            "stop {stop_index}/trip {trip_index} out of range for route with \
             {} stops and {} trips",
            self.stop_count(),
            self.trip_count(),
        );
        (trip_index * self.stop_count() + stop_index) * 2
    }

    /// Arrival of a trip at a stop position.
    ///
    /// # Panics
    /// If either index is out of range.
    pub fn arrival_at(&self, stop_index: StopRouteIndex, trip_index: TripRouteIndex) -> Time {
        Time::from_minutes(u32::from(
            self.stop_times[self.time_offset(stop_index, trip_index)],
        ))
    }

    /// Departure of a trip from a stop position.
    ///
    /// # Panics
    /// If either index is out of range.
    pub fn departure_from(&self, stop_index: StopRouteIndex, trip_index: TripRouteIndex) -> Time {
        Time::from_minutes(u32::from(
            self.stop_times[self.time_offset(stop_index, trip_index) + 1],
        ))
    }

    /// Pickup availability of a trip at a stop position.
    ///
    /// # Panics
    /// If either index is out of range.
    pub fn pickup_type_from(
        &self,
        stop_index: StopRouteIndex,
        trip_index: TripRouteIndex,
    ) -> PickupDropOffType {
        self.unpack_pickup_drop_off(stop_index, trip_index).0
    }

    /// Drop-off availability of a trip at a stop position.
    ///
    /// # Panics
    /// If either index is out of range.
    pub fn drop_off_type_at(
        &self,
        stop_index: StopRouteIndex,
        trip_index: TripRouteIndex,
    ) -> PickupDropOffType {
        self.unpack_pickup_drop_off(stop_index, trip_index).1
    }

    // The only decoder of the packed attribute layout; `pack_pickup_drop_off`
    // is the only encoder. g = trip * stops + stop selects a pair; the lower
    // pair of a byte holds drop-off in bits 0..2 and pickup in bits 2..4, the
    // upper pair drop-off in bits 4..6 and pickup in bits 6..8.
    fn unpack_pickup_drop_off(
        &self,
        stop_index: StopRouteIndex,
        trip_index: TripRouteIndex,
    ) -> (PickupDropOffType, PickupDropOffType) {
        let _ = self.time_offset(stop_index, trip_index);
        let g = trip_index * self.stop_count() + stop_index;
        let byte = self.pickup_drop_off[g / 2];
        let shift = if g % 2 == 0 { 0 } else { 4 };
        let pickup = PickupDropOffType::from_bits(byte >> (shift + 2));
        let drop_off = PickupDropOffType::from_bits(byte >> shift);
        (pickup, drop_off)
    }

    /// The earliest trip departing from `stop_index` at or after `after`,
    /// strictly before `before_trip` when given, whose pickup is available.
    ///
    /// Trips are sorted by first departure and same-stop departures preserve
    /// that order, so the lower bound of `after` is found by binary search;
    /// the forward scan then skips trips that cannot be boarded at this stop.
    pub fn find_earliest_trip(
        &self,
        stop_index: StopRouteIndex,
        after: Time,
        before_trip: Option<TripRouteIndex>,
    ) -> Option<TripRouteIndex> {
        if self.stops.is_empty() {
            return None;
        }
        let upper = before_trip.unwrap_or_else(|| self.trip_count()).min(self.trip_count());
        if upper == 0 {
            return None;
        }

        let mut low = 0;
        let mut high = upper;
        while low < high {
            let mid = (low + high) / 2;
            if self.departure_from(stop_index, mid) >= after {
                high = mid;
            } else {
                low = mid + 1;
            }
        }

        (low..upper).find(|&trip| {
            self.pickup_type_from(stop_index, trip) != PickupDropOffType::NotAvailable
        })
    }
}

/// Pack per-trip-stop (pickup, drop-off) pairs into the 2-bit byte layout.
///
/// The inverse of the accessors on [`Route`]; round-trips bit-exactly.
pub(crate) fn pack_pickup_drop_off(
    pairs: &[(PickupDropOffType, PickupDropOffType)],
) -> Vec<u8> {
    let mut bytes = vec![0u8; pairs.len().div_ceil(2)];
    for (g, &(pickup, drop_off)) in pairs.iter().enumerate() {
        let shift = if g % 2 == 0 { 0 } else { 4 };
        bytes[g / 2] |= (pickup.to_bits() << (shift + 2)) | (drop_off.to_bits() << shift);
    }
    bytes
}
