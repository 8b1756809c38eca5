pub mod city_scorer;

pub use city_scorer::{assess_all, expansion_candidates, CityAssessment, FeasibilityWeights};
