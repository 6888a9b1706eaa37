mod cluster_source;
mod csv;
mod source;

pub use cluster_source::ClusterSource;
pub use csv::{CsvFrameSource, read_examples};
pub use source::FeatureSource;
