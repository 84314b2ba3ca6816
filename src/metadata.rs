pub mod limits;
pub mod writer;
