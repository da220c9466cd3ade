//! Month-by-month FIRE projection: asset trajectory, months to depletion,
//! months to a savings target and a bounded safety score.

pub mod api;
pub mod core;
