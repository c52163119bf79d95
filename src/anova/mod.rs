// One-way ANOVA across control algorithms
//
// H₀: every algorithm has the same mean control error.
// H₁: at least one algorithm's mean control error differs.
//
// The F statistic compares between-group variance to within-group variance;
// H₀ is rejected when the upper-tail p-value of F(k - 1, N - k) falls below
// the significance level, equivalently when F exceeds the critical value.
//
// Implementation:
// - Sum-of-squares decomposition in f64 (table.rs)
// - statrs FisherSnedecor for the p-value and critical value (distribution.rs)
// - aprender DescriptiveStats over trueno vectors for quartiles (summary.rs)
// - aprender Welch t-tests with Bonferroni correction for post-hoc (posthoc.rs)

mod config;
mod distribution;
mod posthoc;
mod summary;
mod table;
mod verdict;

pub use config::AnalysisConfig;
pub use distribution::{f_critical_value, f_p_value};
pub use posthoc::{bonferroni, pairwise_welch, PairwiseComparison};
pub use summary::{summarize, GroupSummary};
pub use table::{AnovaTable, GroupMean};
pub use verdict::AnovaResult;

use crate::dataset::Dataset;
use crate::error::{AnovaError, Result};

/// Run the full one-way ANOVA on a dataset
///
/// # Example
/// ```
/// use ctrl_anova::algorithm::Algorithm;
/// use ctrl_anova::anova::{analyze, AnalysisConfig};
/// use ctrl_anova::dataset::{Dataset, Sample};
///
/// let dataset: Dataset = [
///     (Algorithm::Pid, 15.0), (Algorithm::Pid, 16.0), (Algorithm::Pid, 14.0),
///     (Algorithm::Mpc, 7.0), (Algorithm::Mpc, 8.0), (Algorithm::Mpc, 6.0),
/// ]
/// .into_iter()
/// .map(|(algorithm, control_error)| Sample { algorithm, control_error })
/// .collect();
///
/// let result = analyze(&dataset, &AnalysisConfig::default()).unwrap();
/// assert!(result.significant);
/// assert_eq!(result.recommended_algorithm, Algorithm::Mpc);
/// ```
pub fn analyze(dataset: &Dataset, config: &AnalysisConfig) -> Result<AnovaResult> {
    config.validate()?;

    let groups = dataset.groups();
    let table = AnovaTable::compute(&groups, config.min_group_size)?;

    let p_value = f_p_value(table.f_statistic, table.df_between, table.df_within)?;
    let critical_value = f_critical_value(config.alpha, table.df_between, table.df_within)?;
    let significant = p_value < config.alpha;

    let recommended_algorithm = verdict::recommend(&table.group_means)
        .ok_or_else(|| AnovaError::insufficient("dataset has no groups"))?;

    let summaries = summarize(&groups)?;

    let posthoc = if config.posthoc {
        pairwise_welch(&groups, config.alpha)?
    } else {
        Vec::new()
    };

    tracing::info!(
        "ANOVA: F={:.4} crit={:.4} p={:.4} significant={} recommended={}",
        table.f_statistic,
        critical_value,
        p_value,
        significant,
        recommended_algorithm
    );

    Ok(AnovaResult {
        alpha: config.alpha,
        f_statistic: table.f_statistic,
        critical_value,
        p_value,
        significant,
        recommended_algorithm,
        effect_size: table.eta_squared(),
        table,
        summaries,
        posthoc,
        data_file: None,
    })
}
