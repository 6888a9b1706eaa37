use crate::core::FeatureVector;
use crate::streams::source::FeatureSource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::Error;

/// Seeded synthetic feature source standing in for the webcam feature
/// extractor: each label owns a centroid and frames are drawn by cycling
/// labels in order, adding uniform noise per coordinate. The same seed
/// always reproduces the same sequence.
pub struct ClusterSource {
    centroids: Vec<(String, FeatureVector)>,
    noise: f64,
    seed: u64,
    rng: StdRng,
    emitted: u64,
    max_frames: Option<u64>,
}

impl ClusterSource {
    pub fn new(
        centroids: Vec<(String, FeatureVector)>,
        noise: f64,
        seed: u64,
        max_frames: Option<u64>,
    ) -> Self {
        Self {
            centroids,
            noise,
            seed,
            rng: StdRng::seed_from_u64(seed),
            emitted: 0,
            max_frames,
        }
    }

    /// Draws one random centroid per label inside the `[0, spread)` cube.
    /// `spread` must be positive.
    pub fn with_random_centroids(
        labels: &[&str],
        dimensions: usize,
        spread: f64,
        noise: f64,
        seed: u64,
        max_frames: Option<u64>,
    ) -> Self {
        debug_assert!(spread > 0.0);
        let mut rng = StdRng::seed_from_u64(seed);
        let centroids = labels
            .iter()
            .map(|label| {
                let centroid: FeatureVector =
                    (0..dimensions).map(|_| rng.random_range(0.0..spread)).collect();
                (label.to_string(), centroid)
            })
            .collect();
        Self::new(centroids, noise, seed, max_frames)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.centroids.iter().map(|(label, _)| label.as_str())
    }

    /// The label whose centroid produces frame number `index` (0-based).
    pub fn label_for_frame(&self, index: u64) -> &str {
        let slot = (index % self.centroids.len() as u64) as usize;
        &self.centroids[slot].0
    }

    /// `per_label` noisy draws around each centroid, in centroid order.
    /// Feed these to a store before streaming frames.
    pub fn training_examples(&mut self, per_label: usize) -> Vec<(String, FeatureVector)> {
        let mut examples = Vec::with_capacity(per_label * self.centroids.len());
        for (label, centroid) in &self.centroids {
            for _ in 0..per_label {
                let vector = jitter(centroid, self.noise, &mut self.rng);
                examples.push((label.clone(), vector));
            }
        }
        examples
    }
}

fn jitter(centroid: &FeatureVector, noise: f64, rng: &mut StdRng) -> FeatureVector {
    if noise <= 0.0 {
        return centroid.clone();
    }
    centroid
        .values()
        .iter()
        .map(|v| v + rng.random_range(-noise..=noise))
        .collect()
}

impl FeatureSource for ClusterSource {
    fn dimensions(&self) -> Option<usize> {
        self.centroids.first().map(|(_, centroid)| centroid.len())
    }

    fn has_more_frames(&self) -> bool {
        !self.centroids.is_empty()
            && match self.max_frames {
                Some(n) => self.emitted < n,
                None => true,
            }
    }

    fn next_frame(&mut self) -> Option<FeatureVector> {
        if !self.has_more_frames() {
            return None;
        }
        let slot = (self.emitted % self.centroids.len() as u64) as usize;
        let frame = jitter(&self.centroids[slot].1, self.noise, &mut self.rng);
        self.emitted += 1;
        Some(frame)
    }

    fn restart(&mut self) -> Result<(), Error> {
        self.rng = StdRng::seed_from_u64(self.seed);
        self.emitted = 0;
        Ok(())
    }
}
