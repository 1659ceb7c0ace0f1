pub mod category;
pub mod collection;
pub mod feature;

pub use category::{Bucket, Category};
pub use collection::AirportCollection;
pub use feature::{AirportFeature, build_feature};
