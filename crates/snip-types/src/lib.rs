mod region;
pub mod types;

pub use region::{MIN_SELECTION, Point, Region};
pub use types::*;
