pub mod selector;
pub mod weight_store;

pub use selector::AdaptiveSelector;
pub use weight_store::{CharacterWeight, WeightPolicy, WeightStore, DEFAULT_WEIGHT};
