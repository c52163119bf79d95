// One-way ANOVA sum-of-squares decomposition
//
// SS_total   = Σᵢ Σⱼ (xᵢⱼ - x̄)²
// SS_within  = Σᵢ Σⱼ (xᵢⱼ - x̄ᵢ)²
// SS_between = Σᵢ nᵢ (x̄ᵢ - x̄)²
//
// All three are computed directly from the data rather than by subtraction,
// so SS_within + SS_between == SS_total holds only up to rounding.

use crate::algorithm::Algorithm;
use crate::dataset::Group;
use crate::error::{AnovaError, Result};
use serde::{Deserialize, Serialize};

/// Sample size and mean of one group
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupMean {
    pub algorithm: Algorithm,
    pub count: usize,
    pub mean: f64,
}

/// One-way ANOVA table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnovaTable {
    pub grand_mean: f64,
    /// Per-group means, in group iteration order
    pub group_means: Vec<GroupMean>,
    pub total_count: usize,

    pub ss_between: f64,
    pub ss_within: f64,
    pub ss_total: f64,

    /// k - 1
    pub df_between: usize,
    /// N - k
    pub df_within: usize,
    /// N - 1
    pub df_total: usize,

    pub ms_between: f64,
    pub ms_within: f64,

    /// MS_between / MS_within
    pub f_statistic: f64,
}

impl AnovaTable {
    /// Compute the ANOVA table for the given groups
    ///
    /// Fails with `InsufficientData` when there are fewer than two groups,
    /// when any group has fewer than `min_group_size` samples, or when the
    /// within-group variance is zero (F undefined).
    pub fn compute(groups: &[Group], min_group_size: usize) -> Result<Self> {
        let min_group_size = min_group_size.max(2);

        if groups.len() < 2 {
            return Err(AnovaError::insufficient(format!(
                "need at least 2 algorithm groups, got {}",
                groups.len()
            )));
        }

        for group in groups {
            if group.len() < min_group_size {
                return Err(AnovaError::insufficient(format!(
                    "group {} has {} sample(s), need at least {}",
                    group.algorithm,
                    group.len(),
                    min_group_size
                )));
            }
        }

        let k = groups.len();
        let total_count: usize = groups.iter().map(Group::len).sum();
        let grand_mean =
            groups.iter().flat_map(|g| g.values.iter()).sum::<f64>() / total_count as f64;

        let group_means: Vec<GroupMean> = groups
            .iter()
            .map(|g| GroupMean {
                algorithm: g.algorithm,
                count: g.len(),
                mean: g.values.iter().sum::<f64>() / g.len() as f64,
            })
            .collect();

        let ss_total: f64 = groups
            .iter()
            .flat_map(|g| g.values.iter())
            .map(|x| (x - grand_mean).powi(2))
            .sum();

        let ss_within: f64 = groups
            .iter()
            .zip(&group_means)
            .map(|(g, gm)| g.values.iter().map(|x| (x - gm.mean).powi(2)).sum::<f64>())
            .sum();

        let ss_between: f64 = group_means
            .iter()
            .map(|gm| gm.count as f64 * (gm.mean - grand_mean).powi(2))
            .sum();

        if ss_within <= 0.0 {
            return Err(AnovaError::insufficient(
                "within-group variance is zero; every group is constant and F is undefined",
            ));
        }

        let df_between = k - 1;
        let df_within = total_count - k;
        let ms_between = ss_between / df_between as f64;
        let ms_within = ss_within / df_within as f64;

        Ok(Self {
            grand_mean,
            group_means,
            total_count,
            ss_between,
            ss_within,
            ss_total,
            df_between,
            df_within,
            df_total: total_count - 1,
            ms_between,
            ms_within,
            f_statistic: ms_between / ms_within,
        })
    }

    /// Effect size η² = SS_between / SS_total
    pub fn eta_squared(&self) -> f64 {
        if self.ss_total > 0.0 {
            self.ss_between / self.ss_total
        } else {
            0.0
        }
    }
}
