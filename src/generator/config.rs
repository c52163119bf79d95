// Configuration for the synthetic control-error generator
//
// Default parameters emulate measured behaviour of the three controllers:
// MPC has the lowest mean error, PID the highest mean and the widest spread.

use crate::algorithm::Algorithm;
use crate::error::{AnovaError, Result};
use serde::{Deserialize, Serialize};

/// Normal distribution parameters for one algorithm group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupDistribution {
    pub algorithm: Algorithm,
    /// Mean control error (mm)
    pub mean: f64,
    /// Standard deviation of control error (mm), must be positive
    pub std_dev: f64,
}

impl GroupDistribution {
    pub fn new(algorithm: Algorithm, mean: f64, std_dev: f64) -> Self {
        Self {
            algorithm,
            mean,
            std_dev,
        }
    }

    /// Validate distribution parameters
    pub fn validate(&self) -> Result<()> {
        if !self.mean.is_finite() {
            return Err(AnovaError::InvalidDistributionParameter {
                algorithm: self.algorithm.to_string(),
                reason: format!("mean must be finite, got {}", self.mean),
            });
        }

        if !self.std_dev.is_finite() || self.std_dev <= 0.0 {
            return Err(AnovaError::InvalidDistributionParameter {
                algorithm: self.algorithm.to_string(),
                reason: format!("std_dev must be positive, got {}", self.std_dev),
            });
        }

        Ok(())
    }
}

/// Configuration for dataset generation
///
/// # Example
/// ```
/// use ctrl_anova::generator::GeneratorConfig;
///
/// let config = GeneratorConfig::default();
/// assert_eq!(config.samples_per_group, 30);
/// assert_eq!(config.seed, 42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Number of samples drawn for every algorithm
    pub samples_per_group: usize,

    /// Seed for the random number generator; identical seeds reproduce
    /// identical datasets
    pub seed: u64,

    /// Per-algorithm distributions, in output order
    pub groups: Vec<GroupDistribution>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            samples_per_group: 30,
            seed: 42,
            groups: vec![
                GroupDistribution::new(Algorithm::Pid, 15.0, 4.0),
                GroupDistribution::new(Algorithm::Lqr, 10.0, 3.0),
                GroupDistribution::new(Algorithm::Mpc, 7.0, 2.5),
            ],
        }
    }
}

impl GeneratorConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.samples_per_group == 0 {
            return Err(AnovaError::Config(
                "samples_per_group must be at least 1".to_string(),
            ));
        }

        if self.groups.is_empty() {
            return Err(AnovaError::Config(
                "at least one algorithm group is required".to_string(),
            ));
        }

        for (idx, group) in self.groups.iter().enumerate() {
            if self.groups[..idx]
                .iter()
                .any(|g| g.algorithm == group.algorithm)
            {
                return Err(AnovaError::Config(format!(
                    "algorithm {} is configured more than once",
                    group.algorithm
                )));
            }
            group.validate()?;
        }

        Ok(())
    }
}
