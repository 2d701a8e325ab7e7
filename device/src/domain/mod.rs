//! Domain types for CTD acquisitions.

pub mod depth;
pub mod reading;
pub mod units;

pub use reading::{CtdReading, Measurements, Status, Timestamp, FIXED_POINT_SCALE};
