//! Identifiers and attribute enums of the transit network.

use crate::error::ModelError;
use crate::model::time::Duration;

/// Global stop identifier, dense over the timetable.
pub type StopId = usize;
/// Internal route identifier. A route is the set of trips sharing one
/// ordered stop list within a service route.
pub type RouteId = usize;
/// Rider-visible line identifier; owns one or more routes.
pub type ServiceRouteId = usize;
/// Position of a stop within its route.
pub type StopRouteIndex = usize;
/// Position of a trip within its route.
pub type TripRouteIndex = usize;

const FIELD_BITS: u32 = 20;
const FIELD_LIMIT: usize = 1 << FIELD_BITS;
const FIELD_MASK: u64 = (1 << FIELD_BITS) - 1;

/// A (stop-in-route, route, trip-in-route) triple packed into 60 bits.
///
/// Keys the in-seat continuation map. Each field must fit in 20 bits;
/// encoding and extraction are exact inverses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TripStopId(u64);

impl TripStopId {
    pub fn new(
        stop_index: StopRouteIndex,
        route: RouteId,
        trip_index: TripRouteIndex,
    ) -> Result<Self, ModelError> {
        for value in [stop_index, route, trip_index] {
            if value >= FIELD_LIMIT {
                return Err(ModelError::IdFieldOverflow {
                    value,
                    bits: FIELD_BITS,
                });
            }
        }
        Ok(TripStopId(
            (stop_index as u64) << (2 * FIELD_BITS) | (route as u64) << FIELD_BITS | trip_index as u64,
        ))
    }

    pub fn stop_index(self) -> StopRouteIndex {
        (self.0 >> (2 * FIELD_BITS)) as StopRouteIndex
    }

    pub fn route(self) -> RouteId {
        ((self.0 >> FIELD_BITS) & FIELD_MASK) as RouteId
    }

    pub fn trip_index(self) -> TripRouteIndex {
        (self.0 & FIELD_MASK) as TripRouteIndex
    }
}

/// Transport mode of a service route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteType {
    Tram,
    Subway,
    Rail,
    Bus,
    Ferry,
    CableTram,
    AerialLift,
    Funicular,
    Trolleybus,
    Monorail,
}

/// Whether a rider may board or alight at a given trip stop.
///
/// Encoded at 2 bits per value in the packed attribute bytes of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PickupDropOffType {
    Regular = 0,
    NotAvailable = 1,
    MustPhoneAgency = 2,
    MustCoordinateWithDriver = 3,
}

impl PickupDropOffType {
    pub(crate) fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0 => PickupDropOffType::Regular,
            1 => PickupDropOffType::NotAvailable,
            2 => PickupDropOffType::MustPhoneAgency,
            _ => PickupDropOffType::MustCoordinateWithDriver,
        }
    }

    pub(crate) fn to_bits(self) -> u8 {
        self as u8
    }
}

/// How a walking or in-seat connection between two stops is advertised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferType {
    Recommended,
    Guaranteed,
    RequiresMinimalTime,
    InSeat,
}

/// A connection from one stop to another outside any vehicle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    pub destination: StopId,
    pub kind: TransferType,
    pub min_transfer_time: Option<Duration>,
}

/// "Board trip `trip_index` of route `route` at that route's
/// `hop_on_stop_index`" — the target of an in-seat continuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TripBoarding {
    pub route: RouteId,
    pub hop_on_stop_index: StopRouteIndex,
    pub trip_index: TripRouteIndex,
}

/// Rider-visible line metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRoute {
    pub name: String,
    pub route_type: RouteType,
}
