//! Shared fixtures for integration tests across the workspace: an in-memory
//! tabular store, a small synthetic hospital dataset, a scripted prediction
//! model, and a static item dictionary.

pub mod dataset;
pub mod dictionary;
pub mod model;
pub mod store;

pub use dataset::{admission_cutoffs, base_admit_time, hospital_demo_store, hours_after};
pub use dictionary::StaticItemDictionary;
pub use model::ScriptedModel;
pub use store::InMemoryStore;
