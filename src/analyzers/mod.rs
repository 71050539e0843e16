//! Monthly aggregation and report ordering.
//!
//! Records are grouped per (border, measure) series and calendar month,
//! carried through a running-average chain, then flattened into report
//! rows sorted newest first.

pub mod aggregate;
pub mod report;
pub mod types;
pub mod utility;
