pub mod compositor;
pub mod raster;
