// Descriptive statistics per algorithm group
//
// Mean, standard deviation and extremes are computed in f64 so they match the
// ANOVA table exactly. Quartiles come from aprender's DescriptiveStats
// (R-7 interpolation over a trueno vector) on mean-centered values, so the
// f32 path keeps small spreads around large magnitudes.

use crate::algorithm::Algorithm;
use crate::dataset::Group;
use crate::error::{AnovaError, Result};
use aprender::stats::DescriptiveStats;
use serde::{Deserialize, Serialize};
use trueno::Vector;

/// Summary statistics for one group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub algorithm: Algorithm,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator)
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
}

impl GroupSummary {
    /// Summarize a non-empty group
    pub fn from_group(group: &Group) -> Result<Self> {
        if group.is_empty() {
            return Err(AnovaError::insufficient(format!(
                "cannot summarize empty group {}",
                group.algorithm
            )));
        }

        let n = group.len() as f64;
        let mean = group.values.iter().sum::<f64>() / n;
        let std_dev = if group.len() > 1 {
            (group.values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt()
        } else {
            0.0
        };
        let min = group.values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = group.values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let (q1, median, q3) = if group.len() == 1 {
            (min, min, min)
        } else {
            quartiles(group, mean)?
        };

        Ok(Self {
            algorithm: group.algorithm,
            count: group.len(),
            mean,
            std_dev,
            min,
            max,
            q1,
            median,
            q3,
        })
    }

    /// Interquartile range Q3 - Q1
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

/// Quartiles computed on values centered at `center`, then shifted back
fn quartiles(group: &Group, center: f64) -> Result<(f64, f64, f64)> {
    let values_f32: Vec<f32> = group.values.iter().map(|&v| (v - center) as f32).collect();
    let vector = Vector::from_slice(&values_f32);
    let stats = DescriptiveStats::new(&vector);

    let q1 = stats.quantile(0.25).map_err(|e| quantile_error(group, "Q1", e))?;
    let median = stats.quantile(0.5).map_err(|e| quantile_error(group, "median", e))?;
    let q3 = stats.quantile(0.75).map_err(|e| quantile_error(group, "Q3", e))?;

    Ok((
        center + f64::from(q1),
        center + f64::from(median),
        center + f64::from(q3),
    ))
}

fn quantile_error(group: &Group, which: &str, e: impl std::fmt::Display) -> AnovaError {
    AnovaError::insufficient(format!(
        "failed to compute {} for {}: {}",
        which, group.algorithm, e
    ))
}

/// Summarize every group, preserving group order
pub fn summarize(groups: &[Group]) -> Result<Vec<GroupSummary>> {
    groups.iter().map(GroupSummary::from_group).collect()
}
