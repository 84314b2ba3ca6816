pub mod face;
pub mod resolver;
pub mod system;
