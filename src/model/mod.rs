//! Data model of the transit network.
//!
//! Types and columnar structures the router scans; assembled once by an
//! external ingester through [`builder::TimetableBuilder`] and consumed
//! read-only.

pub mod builder;
pub mod route;
pub mod time;
pub mod timetable;
pub mod types;

pub use builder::TimetableBuilder;
pub use route::Route;
pub use time::{Duration, Time};
pub use timetable::{StopAdjacency, Timetable};
pub use types::{
    PickupDropOffType, RouteId, RouteType, ServiceRoute, ServiceRouteId, StopId,
    StopRouteIndex, Transfer, TransferType, TripBoarding, TripRouteIndex, TripStopId,
};
