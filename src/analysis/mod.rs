// The in-memory pipeline: pure functions from the latest snapshot and the
// current filter/threshold values to the served views.

pub mod aggregate;
pub mod alerts;
pub mod filter;
pub mod projection;
