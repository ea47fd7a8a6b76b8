//! One-stop imports for typical use.

pub use crate::error::ModelError;
pub use crate::model::{
    Duration, PickupDropOffType, Route, RouteId, RouteType, ServiceRoute, ServiceRouteId,
    StopId, StopRouteIndex, Time, Timetable, TimetableBuilder, Transfer, TransferType,
    TripBoarding, TripRouteIndex, TripStopId,
};
pub use crate::routing::{
    Arrival, Journey, JourneyLeg, Query, QueryOptions, RoutingEdge, RoutingResult,
    SourceStopId, StopsIndex, route,
};
