use crate::core::FeatureVector;
use crate::store::example_store::LabelledExample;
use std::collections::BTreeMap;

/// Outcome of one k-nearest-neighbor vote.
///
/// `confidence_by_label` holds only labels represented among the neighbors
/// that actually voted; every other label is an implicit zero, which display
/// layers read through [`PredictionResult::confidence`].
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    /// The label with the highest vote weight.
    pub label: String,
    /// Vote weight per represented label, in [0, 1] and summing to 1.
    pub confidence_by_label: BTreeMap<String, f64>,
}

impl PredictionResult {
    /// Confidence for `label`, defaulting to 0.0 when it was not among the
    /// selected neighbors.
    pub fn confidence(&self, label: &str) -> f64 {
        self.confidence_by_label.get(label).copied().unwrap_or(0.0)
    }

    pub fn winning_confidence(&self) -> f64 {
        self.confidence(&self.label)
    }
}

/// Ranks every stored example by (squared distance, insertion index), votes
/// among the k closest, and breaks vote-weight ties with the label of the
/// nearest selected neighbor. Callers guarantee a non-empty example list and
/// length-checked vectors.
pub(crate) fn classify(
    examples: &[LabelledExample],
    query: &FeatureVector,
    k: usize,
) -> PredictionResult {
    let mut ranked: Vec<(f64, usize)> = examples
        .iter()
        .enumerate()
        .map(|(index, example)| (query.squared_distance_to(&example.vector), index))
        .collect();
    // total_cmp gives a total order even for non-finite inputs; the
    // insertion index settles exact-distance ties.
    ranked.sort_unstable_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

    let used = k.min(ranked.len());
    let neighbors = &ranked[..used];

    let mut votes: BTreeMap<&str, usize> = BTreeMap::new();
    for (_, index) in neighbors {
        *votes.entry(examples[*index].label.as_str()).or_insert(0) += 1;
    }

    // Walk neighbors in rank order so that on equal vote weights the label
    // of the nearest neighbor wins.
    let mut winner = examples[neighbors[0].1].label.as_str();
    for (_, index) in neighbors {
        let label = examples[*index].label.as_str();
        if votes[label] > votes[winner] {
            winner = label;
        }
    }

    let confidence_by_label = votes
        .into_iter()
        .map(|(label, count)| (label.to_string(), count as f64 / used as f64))
        .collect();

    PredictionResult {
        label: winner.to_string(),
        confidence_by_label,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example(label: &str, values: Vec<f64>) -> LabelledExample {
        LabelledExample {
            label: label.to_string(),
            vector: FeatureVector::new(values),
        }
    }

    fn approx(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }
    const EPS: f64 = 1e-12;

    #[test]
    fn majority_among_k_neighbors_wins() {
        let examples = vec![
            example("A", vec![0.0]),
            example("A", vec![1.0]),
            example("B", vec![10.0]),
        ];
        let result = classify(&examples, &FeatureVector::new(vec![0.5]), 3);
        assert_eq!(result.label, "A");
        assert!(approx(result.confidence("A"), 2.0 / 3.0, EPS));
        assert!(approx(result.confidence("B"), 1.0 / 3.0, EPS));
    }

    #[test]
    fn confidences_sum_to_one_over_represented_labels() {
        let examples = vec![
            example("A", vec![0.0]),
            example("B", vec![1.0]),
            example("C", vec![2.0]),
        ];
        let result = classify(&examples, &FeatureVector::new(vec![1.0]), 3);
        let sum: f64 = result.confidence_by_label.values().sum();
        assert!(approx(sum, 1.0, EPS));
    }

    #[test]
    fn fewer_examples_than_k_uses_all_of_them() {
        let examples = vec![example("A", vec![0.0]), example("B", vec![1.0])];
        let result = classify(&examples, &FeatureVector::new(vec![0.0]), 10);
        // k' = 2, one vote each.
        assert!(approx(result.confidence("A"), 0.5, EPS));
        assert!(approx(result.confidence("B"), 0.5, EPS));
    }

    #[test]
    fn vote_weight_tie_goes_to_the_nearest_neighbor_label() {
        let examples = vec![
            example("Far", vec![4.0]),
            example("Near", vec![1.0]),
            example("Far", vec![5.0]),
            example("Near", vec![6.0]),
        ];
        // Neighbors at k=4 split 2/2; "Near" owns the closest one.
        let result = classify(&examples, &FeatureVector::new(vec![0.0]), 4);
        assert_eq!(result.label, "Near");
    }

    #[test]
    fn exact_distance_ties_rank_earlier_insertions_first() {
        // Both examples sit at distance 1 from the query; insertion order
        // decides which one fills the single neighbor slot.
        let examples = vec![example("First", vec![1.0]), example("Second", vec![-1.0])];
        let result = classify(&examples, &FeatureVector::new(vec![0.0]), 1);
        assert_eq!(result.label, "First");
        assert!(approx(result.confidence("First"), 1.0, EPS));
    }

    #[test]
    fn unrepresented_labels_are_absent_from_the_confidence_map() {
        let examples = vec![
            example("A", vec![0.0]),
            example("A", vec![0.1]),
            example("B", vec![100.0]),
        ];
        let result = classify(&examples, &FeatureVector::new(vec![0.0]), 2);
        assert_eq!(result.label, "A");
        assert!(!result.confidence_by_label.contains_key("B"));
        assert!(approx(result.confidence("B"), 0.0, EPS));
    }

    #[test]
    fn winning_confidence_reads_the_winner_entry() {
        let examples = vec![example("A", vec![0.0]), example("B", vec![5.0])];
        let result = classify(&examples, &FeatureVector::new(vec![0.1]), 1);
        assert!(approx(result.winning_confidence(), 1.0, EPS));
    }
}
