use thiserror::Error;

use crate::model::types::{RouteId, ServiceRouteId};

/// Errors raised while assembling a timetable.
///
/// Routing itself never returns these: the timetable is the source of truth,
/// and out-of-range indices during a query are programmer errors that panic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("id field {value} does not fit in {bits} bits")]
    IdFieldOverflow { value: usize, bits: u32 },
    #[error("trip carries {got} stop times but its route has {expected} stops")]
    TripLengthMismatch { expected: usize, got: usize },
    #[error("unknown service route {0}")]
    UnknownServiceRoute(ServiceRouteId),
    #[error("unknown route {0}")]
    UnknownRoute(RouteId),
    #[error("stop time {0} minutes does not fit in 16 bits")]
    StopTimeOverflow(u32),
    #[error("continuation boarding index {index} is out of range for route {route}")]
    InvalidBoarding { route: RouteId, index: usize },
}
