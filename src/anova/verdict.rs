// ANOVA verdict: hypothesis decision, recommendation and persistence
//
// The result is computed once by the analyze stage, written as JSON, and
// consumed read-only by the report stage.

use crate::algorithm::Algorithm;
use crate::anova::posthoc::PairwiseComparison;
use crate::anova::summary::GroupSummary;
use crate::anova::table::{AnovaTable, GroupMean};
use crate::error::{AnovaError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Complete one-way ANOVA result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnovaResult {
    /// Significance level used for the decision
    pub alpha: f64,

    pub f_statistic: f64,

    /// F(1 - alpha; k - 1, N - k)
    pub critical_value: f64,

    /// Upper-tail probability of the F statistic, in [0, 1]
    pub p_value: f64,

    /// H₀ rejected: p_value < alpha
    pub significant: bool,

    /// Group with the minimum mean control error (first in group order on ties)
    pub recommended_algorithm: Algorithm,

    /// η² = SS_between / SS_total
    pub effect_size: f64,

    pub table: AnovaTable,

    pub summaries: Vec<GroupSummary>,

    /// Empty when post-hoc comparisons are disabled
    #[serde(default)]
    pub posthoc: Vec<PairwiseComparison>,

    /// Dataset the result was computed from, when it came from a file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
}

impl AnovaResult {
    /// Per-group means, in group order
    pub fn group_means(&self) -> &[GroupMean] {
        &self.table.group_means
    }

    /// Mean control error of one algorithm, if it was present in the data
    pub fn mean_of(&self, algorithm: Algorithm) -> Option<f64> {
        self.group_means()
            .iter()
            .find(|gm| gm.algorithm == algorithm)
            .map(|gm| gm.mean)
    }

    pub fn summary_of(&self, algorithm: Algorithm) -> Option<&GroupSummary> {
        self.summaries.iter().find(|s| s.algorithm == algorithm)
    }

    /// Groups sorted by ascending mean; ties keep group order
    pub fn ranking(&self) -> Vec<GroupMean> {
        let mut ranked = self.table.group_means.clone();
        ranked.sort_by(|a, b| a.mean.total_cmp(&b.mean));
        ranked
    }

    /// Group with the largest mean control error
    pub fn worst_algorithm(&self) -> Option<Algorithm> {
        self.ranking().last().map(|gm| gm.algorithm)
    }

    /// Record the dataset file this result was computed from
    pub fn with_data_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_file = Some(path.into());
        self
    }

    /// Write the result as pretty-printed JSON
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|e| AnovaError::file_io(path, e))?;
        tracing::debug!("Wrote ANOVA result to {}", path.display());
        Ok(())
    }

    /// Load a result previously written by `save_json`
    pub fn load_json(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|e| AnovaError::file_io(path, e))?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Generate human-readable console summary
    pub fn to_report_string(&self) -> String {
        let mut report = String::new();

        if self.significant {
            report.push_str("✅ SIGNIFICANT DIFFERENCE DETECTED (reject H₀)\n\n");
        } else {
            report.push_str("❌ NO SIGNIFICANT DIFFERENCE (cannot reject H₀)\n\n");
        }

        report.push_str(&format!(
            "Groups: {}   Total samples: {}\n",
            self.table.group_means.len(),
            self.table.total_count
        ));
        report.push_str(&format!(
            "SS total: {:.4}   SS within: {:.4}   SS between: {:.4}\n",
            self.table.ss_total, self.table.ss_within, self.table.ss_between
        ));
        report.push_str(&format!("Effect size (η²): {:.4}\n\n", self.effect_size));

        report.push_str(&format!(
            "F statistic:            {:.4}  (df = {}, {})\n",
            self.f_statistic, self.table.df_between, self.table.df_within
        ));
        report.push_str(&format!(
            "Critical value (α={}): {:.4}\n",
            self.alpha, self.critical_value
        ));
        report.push_str(&format!("p-value:                {:.4}\n", self.p_value));

        report.push_str("\n📊 Group means:\n");
        for gm in self.group_means() {
            report.push_str(&format!(
                "  {:<4} n={:<4} mean={:.2} mm\n",
                gm.algorithm, gm.count, gm.mean
            ));
        }

        if !self.posthoc.is_empty() {
            report.push_str("\n🔍 Pairwise comparisons (Welch, Bonferroni):\n");
            for c in &self.posthoc {
                report.push_str(&format!(
                    "  {} vs {}: diff={:+.2} mm, p_adj={:.4}{}\n",
                    c.first,
                    c.second,
                    c.mean_difference,
                    c.adjusted_p_value,
                    if c.significant { " *" } else { "" }
                ));
            }
        }

        report.push_str(&format!(
            "\n🏆 Recommended algorithm: {}",
            self.recommended_algorithm
        ));
        if let Some(mean) = self.mean_of(self.recommended_algorithm) {
            report.push_str(&format!(" (mean control error {:.2} mm)", mean));
        }
        report.push('\n');

        report
    }
}

/// First group with the minimum mean
pub(crate) fn recommend(group_means: &[GroupMean]) -> Option<Algorithm> {
    let mut best: Option<&GroupMean> = None;
    for gm in group_means {
        match best {
            Some(current) if gm.mean >= current.mean => {}
            _ => best = Some(gm),
        }
    }
    best.map(|gm| gm.algorithm)
}
