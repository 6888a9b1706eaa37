use crate::core::FeatureVector;
use crate::streams::FeatureSource;
use std::io::Error;

/// In-memory frame source: yields the given vectors in order. The
/// test-double counterpart of the file-backed sources.
pub struct VecSource {
    frames: Vec<FeatureVector>,
    position: usize,
}

impl VecSource {
    pub fn new(frames: Vec<FeatureVector>) -> Self {
        Self {
            frames,
            position: 0,
        }
    }
}

impl FeatureSource for VecSource {
    fn dimensions(&self) -> Option<usize> {
        self.frames.first().map(FeatureVector::len)
    }

    fn has_more_frames(&self) -> bool {
        self.position < self.frames.len()
    }

    fn next_frame(&mut self) -> Option<FeatureVector> {
        let frame = self.frames.get(self.position).cloned()?;
        self.position += 1;
        Some(frame)
    }

    fn restart(&mut self) -> Result<(), Error> {
        self.position = 0;
        Ok(())
    }
}
