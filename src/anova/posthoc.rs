// Post-hoc pairwise comparisons after a one-way ANOVA
//
// The omnibus F test only says that some mean differs. Each pair of groups is
// then compared with Welch's t-test (aprender's ttest_ind with unequal
// variances) and the p-values are Bonferroni-adjusted: p_adj = min(1, p·m)
// for m pairs. When both groups of a pair are constant the test is decided
// directly: p = 0 if their means differ, p = 1 otherwise.

use crate::algorithm::Algorithm;
use crate::dataset::Group;
use crate::error::{AnovaError, Result};
use serde::{Deserialize, Serialize};

/// Welch's t-test result for one pair of groups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairwiseComparison {
    pub first: Algorithm,
    pub second: Algorithm,
    /// mean(first) - mean(second)
    pub mean_difference: f64,
    /// `None` when both groups are constant with different means (t is ±∞)
    pub t_statistic: Option<f64>,
    /// Welch-Satterthwaite degrees of freedom
    pub df: f64,
    /// Unadjusted two-tailed p-value
    pub p_value: f64,
    /// Bonferroni-adjusted p-value
    pub adjusted_p_value: f64,
    /// adjusted_p_value < alpha
    pub significant: bool,
}

/// Bonferroni correction: p_adj = min(1, p·m)
pub fn bonferroni(p_values: &[f64]) -> Vec<f64> {
    let m = p_values.len() as f64;
    p_values.iter().map(|&p| (p * m).min(1.0)).collect()
}

/// Compare every pair of groups, in group order (0-1, 0-2, ..., 1-2, ...)
pub fn pairwise_welch(groups: &[Group], alpha: f64) -> Result<Vec<PairwiseComparison>> {
    let mut raw = Vec::new();

    for (i, first) in groups.iter().enumerate() {
        for second in &groups[i + 1..] {
            raw.push(welch_pair(first, second)?);
        }
    }

    let p_values: Vec<f64> = raw.iter().map(|c| c.p_value).collect();
    let adjusted = bonferroni(&p_values);

    Ok(raw
        .into_iter()
        .zip(adjusted)
        .map(|(comparison, adjusted_p_value)| PairwiseComparison {
            adjusted_p_value,
            significant: adjusted_p_value < alpha,
            ..comparison
        })
        .collect())
}

fn sample_variance(values: &[f64], mean: f64) -> f64 {
    values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64
}

fn welch_pair(first: &Group, second: &Group) -> Result<PairwiseComparison> {
    if first.len() < 2 || second.len() < 2 {
        return Err(AnovaError::insufficient(format!(
            "need at least 2 samples per group for t-test ({}={}, {}={})",
            first.algorithm,
            first.len(),
            second.algorithm,
            second.len()
        )));
    }

    let mean_first = first.values.iter().sum::<f64>() / first.len() as f64;
    let mean_second = second.values.iter().sum::<f64>() / second.len() as f64;
    let mean_difference = mean_first - mean_second;

    let comparison = |t_statistic: Option<f64>, df: f64, p_value: f64| PairwiseComparison {
        first: first.algorithm,
        second: second.algorithm,
        mean_difference,
        t_statistic,
        df,
        p_value,
        adjusted_p_value: p_value,
        significant: false,
    };

    // Both groups constant: the t statistic degenerates
    if sample_variance(&first.values, mean_first) == 0.0
        && sample_variance(&second.values, mean_second) == 0.0
    {
        let df = (first.len() + second.len() - 2) as f64;
        return Ok(if mean_difference == 0.0 {
            comparison(Some(0.0), df, 1.0)
        } else {
            comparison(None, df, 0.0)
        });
    }

    // Center on the pooled mean so the f32 cast keeps the differences
    let center = (first.values.iter().sum::<f64>() + second.values.iter().sum::<f64>())
        / (first.len() + second.len()) as f64;
    let a: Vec<f32> = first.values.iter().map(|&v| (v - center) as f32).collect();
    let b: Vec<f32> = second.values.iter().map(|&v| (v - center) as f32).collect();

    let ttest = aprender::stats::hypothesis::ttest_ind(&a, &b, false).map_err(|e| {
        AnovaError::Distribution(format!(
            "t-test {} vs {} failed: {}",
            first.algorithm, second.algorithm, e
        ))
    })?;

    let (t, df, p) = (
        f64::from(ttest.statistic),
        f64::from(ttest.df),
        f64::from(ttest.pvalue),
    );
    if !(t.is_finite() && df.is_finite() && p.is_finite()) {
        return Err(AnovaError::Distribution(format!(
            "t-test {} vs {} is undefined (t={}, df={}, p={})",
            first.algorithm, second.algorithm, t, df, p
        )));
    }

    Ok(comparison(Some(t), df, p.clamp(0.0, 1.0)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(algorithm: Algorithm, values: &[f64]) -> Group {
        Group {
            algorithm,
            values: values.to_vec(),
        }
    }

    #[test]
    fn test_bonferroni_scales_and_caps() {
        let adjusted = bonferroni(&[0.01, 0.02, 0.5]);
        assert!((adjusted[0] - 0.03).abs() < 1e-12);
        assert!((adjusted[1] - 0.06).abs() < 1e-12);
        assert_eq!(adjusted[2], 1.0);
    }

    #[test]
    fn test_pair_order_and_count() {
        let groups = vec![
            group(Algorithm::Pid, &[15.0, 16.0, 14.0, 15.5, 14.5]),
            group(Algorithm::Lqr, &[10.0, 11.0, 9.0, 10.5, 9.5]),
            group(Algorithm::Mpc, &[7.0, 8.0, 6.0, 7.5, 6.5]),
        ];

        let comparisons = pairwise_welch(&groups, 0.05).unwrap();

        let pairs: Vec<(Algorithm, Algorithm)> =
            comparisons.iter().map(|c| (c.first, c.second)).collect();
        assert_eq!(
            pairs,
            vec![
                (Algorithm::Pid, Algorithm::Lqr),
                (Algorithm::Pid, Algorithm::Mpc),
                (Algorithm::Lqr, Algorithm::Mpc),
            ]
        );
    }

    #[test]
    fn test_well_separated_groups_significant() {
        let groups = vec![
            group(Algorithm::Pid, &[15.0, 16.0, 14.0, 15.5, 14.5]),
            group(Algorithm::Mpc, &[7.0, 8.0, 6.0, 7.5, 6.5]),
        ];

        let comparisons = pairwise_welch(&groups, 0.05).unwrap();

        assert_eq!(comparisons.len(), 1);
        let c = &comparisons[0];
        assert!((c.mean_difference - 8.0).abs() < 1e-9);
        assert!(c.t_statistic.unwrap() > 0.0);
        assert!(c.significant, "adjusted p = {}", c.adjusted_p_value);
    }

    #[test]
    fn test_overlapping_groups_not_significant() {
        let groups = vec![
            group(Algorithm::Lqr, &[10.0, 12.0, 11.0, 13.0, 10.0]),
            group(Algorithm::Mpc, &[11.0, 13.0, 10.0, 12.0, 11.0]),
        ];

        let comparisons = pairwise_welch(&groups, 0.05).unwrap();
        assert!(!comparisons[0].significant);
        assert!(comparisons[0].adjusted_p_value >= comparisons[0].p_value);
    }

    #[test]
    fn test_single_sample_group_rejected() {
        let groups = vec![
            group(Algorithm::Lqr, &[10.0]),
            group(Algorithm::Mpc, &[11.0, 13.0]),
        ];
        assert!(pairwise_welch(&groups, 0.05).is_err());
    }

    #[test]
    fn test_constant_groups_with_different_means() {
        let groups = vec![
            group(Algorithm::Pid, &[3.0, 3.0]),
            group(Algorithm::Mpc, &[5.0, 5.0]),
        ];

        let c = &pairwise_welch(&groups, 0.05).unwrap()[0];
        assert_eq!(c.t_statistic, None);
        assert_eq!(c.p_value, 0.0);
        assert_eq!(c.df, 2.0);
        assert!((c.mean_difference + 2.0).abs() < 1e-12);
        assert!(c.significant);
    }

    #[test]
    fn test_constant_groups_with_equal_means() {
        let groups = vec![
            group(Algorithm::Lqr, &[4.0, 4.0, 4.0]),
            group(Algorithm::Mpc, &[4.0, 4.0]),
        ];

        let c = &pairwise_welch(&groups, 0.05).unwrap()[0];
        assert_eq!(c.t_statistic, Some(0.0));
        assert_eq!(c.p_value, 1.0);
        assert_eq!(c.df, 3.0);
        assert!(!c.significant);
    }

    #[test]
    fn test_large_offset_keeps_precision() {
        let groups = vec![
            group(Algorithm::Pid, &[1e8 + 1.0, 1e8 + 2.0, 1e8 + 3.0]),
            group(Algorithm::Mpc, &[1e8 + 4.0, 1e8 + 5.0, 1e8 + 6.0]),
        ];

        let c = &pairwise_welch(&groups, 0.05).unwrap()[0];
        let t = c.t_statistic.unwrap();
        // t = -3 / sqrt(1/3 + 1/3)
        assert!((t + 3.674).abs() < 1e-2, "t = {}", t);
        assert!(c.p_value > 0.01 && c.p_value < 0.05, "p = {}", c.p_value);
        assert!((c.mean_difference + 3.0).abs() < 1e-9);
    }
}
