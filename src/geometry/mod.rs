pub mod bbox;
pub mod convert;

pub use bbox::{BoundingBox, Extent};
pub use convert::element_geometry;
