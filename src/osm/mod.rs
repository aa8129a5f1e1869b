pub mod parser;
pub mod store;

pub use parser::{GeoBounds, load_file, parse_document, parse_document_within};
pub use store::FeatureStore;
