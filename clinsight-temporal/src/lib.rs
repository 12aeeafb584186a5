//! # clinsight-temporal
//!
//! Propagates per-instance cutoff times along a resolved entity path so that
//! every downstream aggregation sees only records that existed at or before
//! each instance's reference time.

pub mod propagate;
pub mod reduction;
pub mod window;

pub use propagate::propagate_cutoff_times;
pub use reduction::Reduction;
pub use window::observable_rows;
