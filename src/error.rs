//! Error types for the navigation kernel.
//!
//! Every failure surfaces as one of the typed reasons below, never a
//! generic error. No reason is substituted for another, nothing is retried
//! internally, and there are no partial results: a call returns a complete
//! renderable route or an error.

use thiserror::Error;

/// Navigation kernel error type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavError {
    /// The floor has no corridors at all.
    #[error("floor has no corridors")]
    NoCorridors,

    /// The floor has corridors but no doors.
    #[error("floor has no doors")]
    NoDoors,

    /// Rasterizing the floor's corridors produced zero walkable cells.
    #[error("floor has no walkable corridor cells")]
    NoWalkableCorridors,

    /// No feasible door pair connects the start and end points.
    #[error("no path found between start and end")]
    PathNotFound,

    /// No connection chain bridges the requested floors under the
    /// transition-type filter, or no chain had routable legs.
    #[error("no route found between the requested floors")]
    RouteNotFound,

    /// The building has no door flagged both emergency and external.
    #[error("building has no emergency exit doors")]
    NoEmergencyExit,

    /// Emergency exits exist but no route to any of them was computable.
    #[error("no escape route could be computed")]
    EscapeRouteNotFound,

    /// A caller-supplied floor id is not part of the snapshot.
    #[error("unknown floor id: {0}")]
    UnknownFloor(String),
}

/// Convenience result alias for kernel operations.
pub type Result<T> = std::result::Result<T, NavError>;
