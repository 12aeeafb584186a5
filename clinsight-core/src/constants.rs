//! Shared numeric defaults. Overridable through [`crate::config`].

/// z-score bounding the reference interval (95% under a normal approximation).
pub const REFERENCE_INTERVAL_Z: f64 = 1.96;

/// Null-fraction above which a feature column is dropped (default preset).
pub const DEFAULT_NULL_THRESHOLD: f64 = 0.95;

/// Null-fraction above which a feature column is dropped (permissive preset).
pub const PERMISSIVE_NULL_THRESHOLD: f64 = 0.99;

/// Absolute Pearson correlation at or above which the later column is dropped.
pub const DEFAULT_CORRELATION_THRESHOLD: f64 = 0.95;

/// Upper bound on distinct item-index values expanded into WHERE variants
/// per source entity; plain aggregates are not counted against it.
pub const DEFAULT_MAX_FEATURES: usize = 100;

/// Maximum relationship hops considered during generation.
pub const DEFAULT_MAX_DEPTH: usize = 2;

/// Bound on simultaneous prediction/attribution calls per explanation batch.
pub const DEFAULT_MAX_CONCURRENT_CALLS: usize = 8;
