pub mod geometry;
pub mod wrap;
