//! Round-based earliest-arrival journey planning over a compact, read-only
//! timetable.
//!
//! The crate implements the RAPTOR algorithm: given an origin, one or more
//! destinations and a departure time, it answers when one can arrive and by
//! which sequence of vehicle rides and transfers, under a bounded number of
//! vehicle changes.
//!
//! The [`model`] module holds the columnar timetable an external ingester
//! assembles once through [`TimetableBuilder`]; the [`routing`] module runs
//! queries against it. A timetable is immutable after construction, so any
//! number of queries may run against it in parallel; all per-query state
//! lives in the [`RoutingResult`].
//!
//! ```
//! use raptor_core::prelude::*;
//! use hashbrown::HashMap;
//!
//! let mut builder = TimetableBuilder::new();
//! let line = builder.add_service_route("10", RouteType::Bus);
//! builder
//!     .add_route(
//!         line,
//!         vec![0, 1],
//!         vec![vec![
//!             (Time::from_hm(8, 0), Time::from_hm(8, 10)),
//!             (Time::from_hm(8, 35), Time::from_hm(8, 45)),
//!         ]],
//!     )
//!     .unwrap();
//! let timetable = builder.build();
//!
//! let stops: HashMap<SourceStopId, Vec<StopId>> =
//!     [(SourceStopId(0), vec![0]), (SourceStopId(1), vec![1])]
//!         .into_iter()
//!         .collect();
//! let query = Query::new(SourceStopId(0), vec![SourceStopId(1)], Time::from_hm(8, 0));
//! let result = route(&timetable, &stops, &query);
//! let journey = result.best_journey(None).unwrap();
//! assert_eq!(journey.arrival, Time::from_hm(8, 35));
//! ```

pub mod error;
pub mod model;
pub mod prelude;
pub mod routing;

pub use error::ModelError;
pub use model::{
    Duration, PickupDropOffType, Route, RouteId, RouteType, ServiceRoute, ServiceRouteId,
    StopAdjacency, StopId, StopRouteIndex, Time, Timetable, TimetableBuilder, Transfer,
    TransferType, TripBoarding, TripRouteIndex, TripStopId,
};
pub use routing::{
    Arrival, EdgeId, Journey, JourneyLeg, Query, QueryOptions, RoundEdges, RoutingEdge,
    RoutingResult, SourceStopId, StopsIndex, route,
};
