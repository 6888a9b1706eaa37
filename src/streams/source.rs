use crate::core::FeatureVector;
use std::io::Error;

/// Anything that yields feature frames for classification: file-backed
/// streams, synthetic generators, in-memory test sources.
pub trait FeatureSource {
    /// Dimensionality of emitted frames, when the source knows it up front.
    fn dimensions(&self) -> Option<usize>;

    fn has_more_frames(&self) -> bool;

    /// Next frame, or `None` once the source is exhausted.
    fn next_frame(&mut self) -> Option<FeatureVector>;

    /// Rewind to the first frame.
    fn restart(&mut self) -> Result<(), Error>;
}
