//! Query-time machinery: parameters, the round-based scan, and results.

pub mod query;
pub mod raptor;
pub mod result;

pub use query::{Query, QueryOptions, SourceStopId, StopsIndex};
pub use raptor::route;
pub use result::{Arrival, EdgeId, Journey, JourneyLeg, RoundEdges, RoutingEdge, RoutingResult};
