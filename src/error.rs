//! Error definitions.
use thiserror::Error;

/// Errors reported by map construction.
///
/// Lookups, removals and resizes never fail: misses yield `None` and rejected resize targets
/// are ignored.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapError {
    /// A map was requested with zero capacity. Capacities must be positive.
    #[error("Requested capacity must be positive.")]
    ZeroCapacity,
    /// No prime capacity at least as large as the requested one fits in a `usize`.
    #[error("No prime capacity of at least {0} is representable.")]
    CapacityOverflow(usize),
}
