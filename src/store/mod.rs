mod example_store;
mod prediction;
mod snapshot;

pub use example_store::LabelledExampleStore;
pub use prediction::PredictionResult;
pub use snapshot::{ClassSnapshot, DatasetSnapshot};
