use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::mem::size_of;

/// Fixed-length numeric embedding produced by an external feature extractor.
///
/// Opaque to the classifier except for its length and the distance between
/// two vectors of equal length. Serializes transparently as a plain array so
/// persisted datasets stay human-inspectable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn new(values: Vec<f64>) -> Self {
        FeatureVector(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    /// Squared Euclidean distance to `other`. Squared values rank neighbors
    /// the same as true distances. Both vectors must have the same length;
    /// the store validates lengths before any distance is computed.
    pub fn squared_distance_to(&self, other: &FeatureVector) -> f64 {
        debug_assert_eq!(self.0.len(), other.0.len());
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum()
    }

    pub fn distance_to(&self, other: &FeatureVector) -> f64 {
        self.squared_distance_to(other).sqrt()
    }

    pub fn memory_size(&self) -> usize {
        size_of::<Self>() + self.0.capacity() * size_of::<f64>()
    }
}

impl From<Vec<f64>> for FeatureVector {
    fn from(values: Vec<f64>) -> Self {
        FeatureVector(values)
    }
}

impl FromIterator<f64> for FeatureVector {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        FeatureVector(iter.into_iter().collect())
    }
}
