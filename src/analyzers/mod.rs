//! Fleet-wide trip-data analysis.
//!
//! This module fans out per-vehicle trip fetches, collects the per-vehicle
//! analyses, orders them deterministically, and produces the summary verdict
//! on whether the fleet's trip data is synthetic or real.

pub mod aggregate;
pub mod analyzer;
pub mod types;
pub mod verdict;
