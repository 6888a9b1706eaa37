use crate::core::FeatureVector;
use crate::error::StoreError;
use crate::store::prediction::{self, PredictionResult};
use crate::store::snapshot::{ClassSnapshot, DatasetSnapshot};
use std::collections::{BTreeMap, BTreeSet};
use std::mem::size_of;

/// One stored training example. Examples are only ever added or removed
/// wholesale; nothing mutates a vector in place after insertion.
#[derive(Debug, Clone)]
pub(crate) struct LabelledExample {
    pub(crate) label: String,
    pub(crate) vector: FeatureVector,
}

/// In-memory, mutable collection of (feature vector, label) examples with
/// nearest-neighbor label prediction.
///
/// Examples live in one flat sequence in global insertion order; that order
/// breaks exact-distance ties during prediction, which keeps repeated
/// predictions on an unchanged store deterministic. Dimensionality is fixed
/// by the first inserted example (or a non-empty snapshot import) and
/// released only by `clear_all` or importing an unconstrained snapshot.
#[derive(Debug, Clone, Default)]
pub struct LabelledExampleStore {
    examples: Vec<LabelledExample>,
    dimensions: Option<usize>,
}

impl LabelledExampleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The established dimensionality, or `None` while the store is
    /// unconstrained.
    pub fn dimensions(&self) -> Option<usize> {
        self.dimensions
    }

    pub fn total_examples(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// Appends one example under `label`, establishing the store's
    /// dimensionality if this is the first example.
    pub fn add_example(
        &mut self,
        vector: FeatureVector,
        label: impl Into<String>,
    ) -> Result<(), StoreError> {
        let label = label.into();
        if label.is_empty() {
            return Err(StoreError::InvalidLabel);
        }
        self.check_dimensions(&vector)?;

        self.dimensions = Some(vector.len());
        self.examples.push(LabelledExample { label, vector });
        Ok(())
    }

    /// Number of distinct labels currently holding at least one example.
    pub fn class_count(&self) -> usize {
        self.examples
            .iter()
            .map(|example| example.label.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Example count per label. Labels never inserted (or since cleared) are
    /// absent from the map; display layers default them to zero.
    pub fn class_example_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for example in &self.examples {
            *counts.entry(example.label.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Removes all examples under `label`. A label that was never present is
    /// a no-op, not an error. The dimensionality constraint stays in place
    /// even if this empties the store; only `clear_all` releases it.
    pub fn clear_class(&mut self, label: &str) {
        self.examples.retain(|example| example.label != label);
    }

    /// Empties the store and releases the dimensionality constraint, so the
    /// next `add_example` may establish a new one.
    pub fn clear_all(&mut self) {
        self.examples.clear();
        self.dimensions = None;
    }

    /// Labels `vector` by majority vote among its `k` nearest stored
    /// examples (all of them when fewer than `k` exist).
    pub fn predict(
        &self,
        vector: &FeatureVector,
        k: usize,
    ) -> Result<PredictionResult, StoreError> {
        if k == 0 {
            return Err(StoreError::InvalidNeighborCount);
        }
        if self.examples.is_empty() {
            return Err(StoreError::EmptyStore);
        }
        let Some(expected) = self.dimensions else {
            return Err(StoreError::EmptyStore);
        };
        if vector.len() != expected {
            return Err(StoreError::DimensionMismatch {
                expected,
                found: vector.len(),
            });
        }

        Ok(prediction::classify(&self.examples, vector, k))
    }

    /// Full structural copy of the store's contents; later mutation of the
    /// store never changes a previously exported snapshot.
    pub fn export_snapshot(&self) -> DatasetSnapshot {
        let mut classes: Vec<ClassSnapshot> = Vec::new();
        for example in &self.examples {
            match classes
                .iter_mut()
                .find(|class| class.label == example.label)
            {
                Some(class) => class.examples.push(example.vector.clone()),
                None => classes.push(ClassSnapshot {
                    label: example.label.clone(),
                    examples: vec![example.vector.clone()],
                }),
            }
        }

        DatasetSnapshot {
            dimensions: self.dimensions,
            total_examples: self.examples.len(),
            classes,
        }
    }

    /// Replaces the store's entire contents with `snapshot`. Not a merge:
    /// existing examples are discarded. The snapshot is validated in full
    /// before the store is touched, so a rejected import leaves the previous
    /// contents intact.
    pub fn import_snapshot(&mut self, snapshot: DatasetSnapshot) -> Result<(), StoreError> {
        snapshot.validate()?;

        self.examples.clear();
        self.dimensions = snapshot.dimensions;
        for class in snapshot.classes {
            for vector in class.examples {
                self.examples.push(LabelledExample {
                    label: class.label.clone(),
                    vector,
                });
            }
        }
        Ok(())
    }

    /// Estimated bytes held by the model: the example sequence plus every
    /// label and vector heap buffer.
    pub fn memory_size(&self) -> usize {
        let mut total = size_of::<Self>();
        total += self.examples.capacity() * size_of::<LabelledExample>();
        for example in &self.examples {
            total += example.label.capacity();
            total += example.vector.memory_size() - size_of::<FeatureVector>();
        }
        total
    }

    fn check_dimensions(&self, vector: &FeatureVector) -> Result<(), StoreError> {
        match self.dimensions {
            Some(expected) if expected != vector.len() => Err(StoreError::DimensionMismatch {
                expected,
                found: vector.len(),
            }),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vec2(x: f64, y: f64) -> FeatureVector {
        FeatureVector::new(vec![x, y])
    }

    fn approx(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }
    const EPS: f64 = 1e-12;

    #[test]
    fn counts_track_insertions_per_label() {
        let mut store = LabelledExampleStore::new();
        store.add_example(vec2(0.0, 0.0), "Left").unwrap();
        store.add_example(vec2(0.1, 0.0), "Left").unwrap();
        store.add_example(vec2(9.0, 9.0), "Right").unwrap();

        assert_eq!(store.class_count(), 2);
        assert_eq!(store.total_examples(), 3);

        let counts = store.class_example_counts();
        assert_eq!(counts.get("Left"), Some(&2));
        assert_eq!(counts.get("Right"), Some(&1));
        assert_eq!(counts.get("Up"), None);
    }

    #[test]
    fn duplicate_vectors_are_kept() {
        let mut store = LabelledExampleStore::new();
        store.add_example(vec2(1.0, 1.0), "A").unwrap();
        store.add_example(vec2(1.0, 1.0), "A").unwrap();
        assert_eq!(store.class_example_counts()["A"], 2);
    }

    #[test]
    fn empty_label_is_rejected() {
        let mut store = LabelledExampleStore::new();
        let err = store.add_example(vec2(0.0, 0.0), "").unwrap_err();
        assert_eq!(err, StoreError::InvalidLabel);
        assert!(store.is_empty());
        assert_eq!(store.dimensions(), None);
    }

    #[test]
    fn mismatched_dimensionality_is_rejected_and_store_unmodified() {
        let mut store = LabelledExampleStore::new();
        store.add_example(vec2(0.0, 0.0), "A").unwrap();

        let err = store
            .add_example(FeatureVector::new(vec![1.0, 2.0, 3.0]), "A")
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::DimensionMismatch {
                expected: 2,
                found: 3
            }
        );
        assert_eq!(store.total_examples(), 1);
    }

    #[test]
    fn clear_class_removes_the_label_entirely() {
        let mut store = LabelledExampleStore::new();
        store.add_example(vec2(0.0, 0.0), "Left").unwrap();
        store.add_example(vec2(1.0, 1.0), "Right").unwrap();

        store.clear_class("Left");
        let counts = store.class_example_counts();
        assert!(!counts.contains_key("Left"));
        assert_eq!(counts.get("Right"), Some(&1));
        assert_eq!(store.class_count(), 1);
    }

    #[test]
    fn clear_class_on_absent_label_is_idempotent() {
        let mut store = LabelledExampleStore::new();
        store.add_example(vec2(0.0, 0.0), "A").unwrap();

        store.clear_class("never-added");
        store.clear_class("never-added");
        assert_eq!(store.total_examples(), 1);
    }

    #[test]
    fn clear_class_keeps_dimensionality_even_when_store_empties() {
        let mut store = LabelledExampleStore::new();
        store.add_example(vec2(0.0, 0.0), "A").unwrap();
        store.clear_class("A");

        assert!(store.is_empty());
        assert_eq!(store.dimensions(), Some(2));

        let err = store
            .add_example(FeatureVector::new(vec![1.0, 2.0, 3.0]), "B")
            .unwrap_err();
        assert!(matches!(err, StoreError::DimensionMismatch { .. }));
    }

    #[test]
    fn clear_all_releases_the_dimensionality_constraint() {
        let mut store = LabelledExampleStore::new();
        store.add_example(vec2(0.0, 0.0), "A").unwrap();

        store.clear_all();
        assert_eq!(store.dimensions(), None);

        store
            .add_example(FeatureVector::new(vec![1.0, 2.0, 3.0]), "B")
            .unwrap();
        assert_eq!(store.dimensions(), Some(3));
    }

    #[test]
    fn predict_on_empty_store_reports_empty_store() {
        let store = LabelledExampleStore::new();
        let err = store.predict(&vec2(0.0, 0.0), 3).unwrap_err();
        assert_eq!(err, StoreError::EmptyStore);
    }

    #[test]
    fn predict_rejects_zero_neighbors() {
        let mut store = LabelledExampleStore::new();
        store.add_example(vec2(0.0, 0.0), "A").unwrap();
        let err = store.predict(&vec2(0.0, 0.0), 0).unwrap_err();
        assert_eq!(err, StoreError::InvalidNeighborCount);
    }

    #[test]
    fn predict_rejects_mismatched_query_dimensions() {
        let mut store = LabelledExampleStore::new();
        store.add_example(vec2(0.0, 0.0), "A").unwrap();
        let err = store
            .predict(&FeatureVector::new(vec![1.0]), 1)
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::DimensionMismatch {
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn single_neighbor_prediction_is_certain() {
        let mut store = LabelledExampleStore::new();
        store.add_example(vec2(0.0, 0.0), "Left").unwrap();
        store.add_example(vec2(10.0, 10.0), "Right").unwrap();

        let result = store.predict(&vec2(1.0, 1.0), 1).unwrap();
        assert_eq!(result.label, "Left");
        assert!(approx(result.confidence("Left"), 1.0, EPS));
        assert!(approx(result.confidence("Right"), 0.0, EPS));
        assert_eq!(result.confidence_by_label.len(), 1);
    }

    #[test]
    fn repeated_predictions_on_unchanged_store_are_identical() {
        let mut store = LabelledExampleStore::new();
        store.add_example(vec2(1.0, 0.0), "L1").unwrap();
        store.add_example(vec2(2.0, 0.0), "L1").unwrap();
        store.add_example(vec2(0.0, 1.0), "L2").unwrap();

        // Nearest two are the first "L1" example and the "L2" example, both
        // at distance 1; the 1/1 vote split resolves to the earlier-inserted
        // neighbor's label.
        let query = vec2(0.0, 0.0);
        let first = store.predict(&query, 2).unwrap();
        let second = store.predict(&query, 2).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.label, "L1");
    }

    #[test]
    fn snapshot_round_trip_preserves_counts_and_vectors() {
        let mut store = LabelledExampleStore::new();
        store.add_example(vec2(0.0, 0.0), "Left").unwrap();
        store.add_example(vec2(5.0, 5.0), "Right").unwrap();
        store.add_example(vec2(0.5, 0.5), "Left").unwrap();

        let snapshot = store.export_snapshot();
        let counts_before = store.class_example_counts();

        store.import_snapshot(snapshot.clone()).unwrap();
        assert_eq!(store.class_example_counts(), counts_before);
        assert_eq!(store.export_snapshot(), snapshot);
    }

    #[test]
    fn exported_snapshot_is_a_structural_copy() {
        let mut store = LabelledExampleStore::new();
        store.add_example(vec2(0.0, 0.0), "A").unwrap();

        let snapshot = store.export_snapshot();
        store.add_example(vec2(1.0, 1.0), "B").unwrap();
        store.clear_class("A");

        assert_eq!(snapshot.total_examples, 1);
        assert_eq!(snapshot.classes.len(), 1);
        assert_eq!(snapshot.classes[0].label, "A");
    }

    #[test]
    fn import_replaces_rather_than_merges() {
        let mut store = LabelledExampleStore::new();
        store.add_example(vec2(0.0, 0.0), "Old").unwrap();

        let mut other = LabelledExampleStore::new();
        other.add_example(vec2(9.0, 9.0), "New").unwrap();

        store.import_snapshot(other.export_snapshot()).unwrap();
        let counts = store.class_example_counts();
        assert!(!counts.contains_key("Old"));
        assert_eq!(counts.get("New"), Some(&1));
    }

    #[test]
    fn rejected_import_leaves_previous_contents_intact() {
        let mut store = LabelledExampleStore::new();
        store.add_example(vec2(0.0, 0.0), "Keep").unwrap();

        let bad = DatasetSnapshot {
            dimensions: Some(2),
            total_examples: 2,
            classes: vec![ClassSnapshot {
                label: "New".into(),
                examples: vec![
                    FeatureVector::new(vec![1.0, 2.0]),
                    FeatureVector::new(vec![1.0, 2.0, 3.0]),
                ],
            }],
        };
        let err = store.import_snapshot(bad).unwrap_err();
        assert_eq!(
            err,
            StoreError::DimensionMismatch {
                expected: 2,
                found: 3
            }
        );
        assert_eq!(store.class_example_counts().get("Keep"), Some(&1));
    }

    #[test]
    fn importing_an_unconstrained_snapshot_releases_dimensionality() {
        let mut store = LabelledExampleStore::new();
        store.add_example(vec2(0.0, 0.0), "A").unwrap();

        store.import_snapshot(DatasetSnapshot::default()).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.dimensions(), None);
    }

    #[test]
    fn memory_size_grows_with_examples() {
        let mut store = LabelledExampleStore::new();
        let empty = store.memory_size();
        for _ in 0..16 {
            store
                .add_example(FeatureVector::new(vec![0.0; 64]), "A")
                .unwrap();
        }
        assert!(store.memory_size() > empty + 16 * 64 * size_of::<f64>());
    }
}
