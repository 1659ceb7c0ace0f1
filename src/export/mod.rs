pub mod writer;

pub use writer::{ExportSummary, WrittenFile, write_airport_data};
