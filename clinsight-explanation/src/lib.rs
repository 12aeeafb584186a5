//! # clinsight-explanation
//!
//! Flags feature values that sit outside a population reference interval and
//! reports how the model's prediction would move if each value were clamped
//! to the nearest interval boundary, one feature at a time.

pub mod counterfactual;
pub mod reference;

pub use counterfactual::CounterfactualEngine;
pub use reference::{reference_intervals, reference_values_by_item};
