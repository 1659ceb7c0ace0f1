pub mod parser;

pub use parser::{CategorizedCollections, build_categorized_geojson};
