pub mod image;
pub mod policy;
pub mod sort;

pub use image::*;
pub use policy::*;
pub use sort::*;
