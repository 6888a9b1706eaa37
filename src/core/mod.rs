mod feature_vector;

pub use feature_vector::FeatureVector;
