//! Per-channel conversion trend reporting.
//!
//! Groups weekly web-traffic observations by their channel combination
//! (site, visit country, entry page, subtype, device), accumulates running
//! conversion ratios per channel, and fits a least-squares trend line to
//! each cumulative series.

pub mod aggregate;
pub mod intake;
pub mod models;
pub mod report;
pub mod trend;
