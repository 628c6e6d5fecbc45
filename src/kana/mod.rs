pub mod core;
pub mod pool;

pub use core::{KanaGroup, KanaPair, KanaSet, Script};
pub use pool::{describe_groups, Pool, ALL_GROUPS};
