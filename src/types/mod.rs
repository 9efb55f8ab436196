//! Value types shared across the grid engine.

mod block;
mod coord;
mod style;

pub use block::*;
pub use coord::*;
pub use style::*;
