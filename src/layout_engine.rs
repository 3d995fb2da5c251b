pub mod engine;
pub mod geometry;
pub(crate) mod systems;
pub mod utils;

pub use engine::{PositionMap, TilingEngine};
pub use geometry::{IsWithin, SameAs, Viewport, WindowPosition};
pub use systems::Orientation;

#[cfg(test)]
mod tests;
