// Configuration for the one-way ANOVA test
//
// The significance level is the only knob that changes the verdict; the
// remaining fields control validation and which supplementary analyses run.

use crate::error::{AnovaError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for ANOVA hypothesis testing
///
/// # Example
/// ```
/// use ctrl_anova::anova::AnalysisConfig;
///
/// let config = AnalysisConfig::default();
/// assert_eq!(config.alpha, 0.05); // 95% confidence
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Significance level (alpha); H₀ is rejected when p < alpha
    ///
    /// - 0.05 (default): 95% confidence level
    /// - 0.01: stricter, fewer false positives
    /// - 0.10: looser, fewer false negatives
    pub alpha: f64,

    /// Minimum samples per group
    ///
    /// Within-group variance is undefined below 2 samples, so values below 2
    /// are rejected by `validate`.
    pub min_group_size: usize,

    /// Run pairwise Welch t-tests (Bonferroni-adjusted) after the omnibus test
    pub posthoc: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            alpha: 0.05,
            min_group_size: 2,
            posthoc: true,
        }
    }
}

impl AnalysisConfig {
    /// 99% confidence
    pub fn strict() -> Self {
        Self {
            alpha: 0.01,
            ..Self::default()
        }
    }

    /// 90% confidence
    pub fn permissive() -> Self {
        Self {
            alpha: 0.10,
            ..Self::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(AnovaError::InvalidAlpha(self.alpha));
        }

        if self.min_group_size < 2 {
            return Err(AnovaError::Config(format!(
                "min_group_size must be >= 2 for within-group variance, got {}",
                self.min_group_size
            )));
        }

        Ok(())
    }
}
