//! Collaborator contracts. The core computes; these supply data and models.

mod labels;
mod predictor;
mod store;

pub use labels::IItemDictionary;
pub use predictor::IPredictor;
pub use store::ITabularStore;
