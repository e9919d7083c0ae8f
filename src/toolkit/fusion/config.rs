

use crate::core::config::FusionSettings;
use crate::core::error::{NarrankError, Result};


/// Validated ranker names and weights for linear fusion.
#[derive(Debug, Clone, PartialEq)]
pub struct FusionConfig {
    ranker_names: Vec<String>,
    weights: Vec<f64>,
}

impl FusionConfig {
    /// Rejects mismatched lengths and weight sums further than `tolerance`
    /// from 1.0. A tolerance of 0.0 demands exact equality.
    pub fn new(ranker_names: Vec<String>, weights: Vec<f64>, tolerance: f64) -> Result<Self> {
        if ranker_names.is_empty() {
            return Err(NarrankError::Configuration("Fusion needs at least one ranker".to_string()));
        }
        if ranker_names.len() != weights.len() {
            return Err(NarrankError::Configuration(format!(
                "Expected an equal number of weights and rankers, but got {} and {}",
                weights.len(),
                ranker_names.len()
            )));
        }
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(NarrankError::Configuration(format!(
                "Fusion weights must be finite and non-negative: {:?}",
                weights
            )));
        }

        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > tolerance {
            return Err(NarrankError::Configuration(format!(
                "Expected sum of weights to be 1.0 but got {}",
                sum
            )));
        }

        Ok(Self { ranker_names, weights })
    }

    pub fn from_settings(settings: &FusionSettings, tolerance: f64) -> Result<Self> {
        Self::new(settings.rankers.clone(), settings.weights.clone(), tolerance)
    }

    pub fn ranker_names(&self) -> &[String] {
        &self.ranker_names
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.ranker_names
            .iter()
            .map(String::as_str)
            .zip(self.weights.iter().copied())
    }

    /// Run tag for the fused output, e.g. `weighted-0.5-0.25-0.25`.
    pub fn label(&self) -> String {
        std::iter::once("weighted".to_string())
            .chain(self.weights.iter().map(|w| w.to_string()))
            .collect::<Vec<_>>()
            .join("-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("r{}", i)).collect()
    }

    #[test]
    fn test_valid_config_and_label() {
        let config = FusionConfig::new(names(3), vec![0.5, 0.25, 0.25], 0.0).unwrap();
        assert_eq!(config.label(), "weighted-0.5-0.25-0.25");
        assert_eq!(config.iter().count(), 3);
        assert_eq!(config.weights()[0], 0.5);
    }

    #[test]
    fn test_length_mismatch_is_configuration_error() {
        let result = FusionConfig::new(names(2), vec![1.0], 0.0);
        assert!(matches!(result, Err(NarrankError::Configuration(_))));
    }

    #[test]
    fn test_sum_must_be_exact_without_tolerance() {
        assert!(FusionConfig::new(names(2), vec![0.5, 0.4], 0.0).is_err());
        // 0.7 + 0.2 + 0.1 accumulates to 0.9999999999999999
        assert!(FusionConfig::new(names(3), vec![0.7, 0.2, 0.1], 0.0).is_err());
        assert!(FusionConfig::new(names(3), vec![0.7, 0.2, 0.1], 1e-9).is_ok());
    }

    #[test]
    fn test_rejects_negative_weights() {
        assert!(FusionConfig::new(names(2), vec![1.5, -0.5], 0.0).is_err());
        assert!(FusionConfig::new(Vec::new(), Vec::new(), 0.0).is_err());
    }

    #[test]
    fn test_from_settings() {
        let settings = FusionSettings {
            rankers: names(2),
            weights: vec![0.75, 0.25],
        };
        assert!(FusionConfig::from_settings(&settings, 0.0).is_ok());
    }
}
