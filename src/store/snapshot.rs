use crate::core::FeatureVector;
use crate::error::StoreError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One label's ordered examples inside a [`DatasetSnapshot`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ClassSnapshot {
    pub label: String,
    pub examples: Vec<FeatureVector>,
}

/// Full, label-keyed dump of a store: the persisted dataset form.
///
/// Classes appear in first-insertion order and each class lists its vectors
/// in insertion order, so exporting the same store twice yields an identical
/// document. The snapshot is a plain value; reading and writing it to disk
/// belongs to the `persistence` module.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DatasetSnapshot {
    /// Dimensionality shared by every stored vector; `null` when the
    /// snapshot carries no constraint.
    pub dimensions: Option<usize>,
    /// Total number of examples across all classes.
    pub total_examples: usize,
    pub classes: Vec<ClassSnapshot>,
}

impl DatasetSnapshot {
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Example count per label, in document order folded into a sorted map.
    pub fn class_counts(&self) -> BTreeMap<String, usize> {
        self.classes
            .iter()
            .map(|class| (class.label.clone(), class.examples.len()))
            .collect()
    }

    /// Checks the document's internal consistency. Import refuses the whole
    /// snapshot on the first violation, so a store never absorbs part of a
    /// corrupt dataset.
    pub fn validate(&self) -> Result<(), StoreError> {
        let mut seen = BTreeSet::new();
        let mut actual = 0usize;

        for class in &self.classes {
            if class.label.is_empty() {
                return Err(StoreError::InvalidLabel);
            }
            if !seen.insert(class.label.as_str()) {
                return Err(StoreError::DuplicateClass(class.label.clone()));
            }
            if class.examples.is_empty() {
                return Err(StoreError::EmptyClass(class.label.clone()));
            }

            actual += class.examples.len();
            for vector in &class.examples {
                match self.dimensions {
                    None => return Err(StoreError::UndeclaredDimensions),
                    Some(expected) if expected != vector.len() => {
                        return Err(StoreError::DimensionMismatch {
                            expected,
                            found: vector.len(),
                        });
                    }
                    Some(_) => {}
                }
            }
        }

        if actual != self.total_examples {
            return Err(StoreError::CountMismatch {
                declared: self.total_examples,
                actual,
            });
        }
        Ok(())
    }
}
