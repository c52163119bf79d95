//! Markdown report generation
//!
//! Formats an `AnovaResult` into a human-readable document: hypotheses, data
//! overview, ANOVA table, verdict, post-hoc comparisons and a recommendation.
//! No statistics are computed here beyond ordering what the analysis
//! produced.

use crate::anova::AnovaResult;
use crate::error::{AnovaError, Result};
use std::fmt;
use std::fs;
use std::path::Path;

/// Markdown report for one ANOVA run
#[derive(Debug, Clone)]
pub struct MarkdownReport<'a> {
    result: &'a AnovaResult,
    data_file: String,
    plot_file: Option<String>,
    generated_at: String,
}

impl<'a> MarkdownReport<'a> {
    /// Create a report stamped with the current local time
    pub fn new(result: &'a AnovaResult, data_file: impl Into<String>) -> Self {
        Self {
            result,
            data_file: data_file.into(),
            plot_file: None,
            generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    /// Embed a link to the visualization image
    pub fn with_plot(mut self, plot_file: impl Into<String>) -> Self {
        self.plot_file = Some(plot_file.into());
        self
    }

    /// Override the generation timestamp
    pub fn with_timestamp(mut self, generated_at: impl Into<String>) -> Self {
        self.generated_at = generated_at.into();
        self
    }

    /// Render the full Markdown document
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Render and write the report to `path`
    pub fn write(&self, path: &Path) -> Result<()> {
        fs::write(path, self.render()).map_err(|e| AnovaError::file_io(path, e))?;
        tracing::debug!("Wrote report to {}", path.display());
        Ok(())
    }

    fn write_document<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        let r = self.result;
        let labels: Vec<String> = r
            .group_means()
            .iter()
            .map(|gm| gm.algorithm.to_string())
            .collect();
        let count_word = match labels.len() {
            2 => "two".to_string(),
            3 => "three".to_string(),
            n => n.to_string(),
        };

        writeln!(out, "# Robotic Control Algorithm ANOVA Report")?;
        writeln!(out)?;
        writeln!(out, "**Generated**: {}  ", self.generated_at)?;
        writeln!(out, "**Method**: One-way analysis of variance (ANOVA)  ")?;
        writeln!(out, "**Significance level**: α = {}", r.alpha)?;
        writeln!(out)?;
        writeln!(out, "---")?;
        writeln!(out)?;

        writeln!(out, "## 1. Objective")?;
        writeln!(out)?;
        writeln!(
            out,
            "Compare the control accuracy of {} robotic control algorithms ({}) \
             to support algorithm selection with data.",
            count_word,
            labels.join(", ")
        )?;
        writeln!(out)?;

        writeln!(out, "## 2. Hypotheses")?;
        writeln!(out)?;
        writeln!(
            out,
            "- **Null hypothesis (H₀)**: the mean control error is the same for every algorithm"
        )?;
        writeln!(
            out,
            "- **Alternative hypothesis (H₁)**: at least one algorithm has a different mean control error"
        )?;
        writeln!(out)?;

        writeln!(out, "## 3. Data Overview")?;
        writeln!(out)?;
        writeln!(
            out,
            "| Algorithm | Samples | Mean (mm) | Std Dev (mm) | Min (mm) | Median (mm) | Max (mm) |"
        )?;
        writeln!(
            out,
            "|-----------|---------|-----------|--------------|----------|-------------|----------|"
        )?;
        for s in &r.summaries {
            writeln!(
                out,
                "| {} | {} | {:.2} | {:.2} | {:.2} | {:.2} | {:.2} |",
                s.algorithm, s.count, s.mean, s.std_dev, s.min, s.median, s.max
            )?;
        }
        writeln!(out)?;

        writeln!(out, "## 4. ANOVA Results")?;
        writeln!(out)?;
        writeln!(out, "| Statistic | Value |")?;
        writeln!(out, "|-----------|-------|")?;
        writeln!(out, "| F statistic | {:.4} |", r.f_statistic)?;
        writeln!(out, "| Critical value (α = {}) | {:.4} |", r.alpha, r.critical_value)?;
        writeln!(out, "| p-value | {} |", format_p(r.p_value))?;
        writeln!(out, "| Effect size (η²) | {:.4} |", r.effect_size)?;
        writeln!(
            out,
            "| **Result** | **{}** |",
            if r.significant {
                "Significant ✓"
            } else {
                "Not significant ✗"
            }
        )?;
        writeln!(out)?;

        let t = &r.table;
        writeln!(out, "| Source | SS | df | MS | F |")?;
        writeln!(out, "|--------|----|----|----|---|")?;
        writeln!(
            out,
            "| Between groups | {:.4} | {} | {:.4} | {:.4} |",
            t.ss_between, t.df_between, t.ms_between, t.f_statistic
        )?;
        writeln!(
            out,
            "| Within groups | {:.4} | {} | {:.4} | |",
            t.ss_within, t.df_within, t.ms_within
        )?;
        writeln!(out, "| Total | {:.4} | {} | | |", t.ss_total, t.df_total)?;
        writeln!(out)?;

        writeln!(out, "## 5. Interpretation")?;
        writeln!(out)?;
        if r.significant {
            writeln!(out, "### ✓ Reject the null hypothesis")?;
            writeln!(out)?;
            writeln!(
                out,
                "At α = {}, the F statistic ({:.4}) exceeds the critical value ({:.4}) \
                 and the p-value ({}) is below {}.",
                r.alpha,
                r.f_statistic,
                r.critical_value,
                format_p(r.p_value),
                r.alpha
            )?;
            writeln!(out)?;
            writeln!(
                out,
                "**Conclusion**: the control errors of the algorithms differ significantly."
            )?;
        } else {
            writeln!(out, "### ✗ Cannot reject the null hypothesis")?;
            writeln!(out)?;
            writeln!(
                out,
                "At α = {}, the F statistic ({:.4}) does not exceed the critical value ({:.4}) \
                 and the p-value ({}) is not below {}.",
                r.alpha,
                r.f_statistic,
                r.critical_value,
                format_p(r.p_value),
                r.alpha
            )?;
            writeln!(out)?;
            writeln!(
                out,
                "**Conclusion**: there is no statistically significant difference in control error."
            )?;
        }
        writeln!(out)?;

        let mut section = 6;
        if !r.posthoc.is_empty() {
            writeln!(out, "## {}. Post-hoc Comparisons", section)?;
            writeln!(out)?;
            writeln!(
                out,
                "Pairwise Welch t-tests with Bonferroni correction ({} comparisons).",
                r.posthoc.len()
            )?;
            writeln!(out)?;
            writeln!(
                out,
                "| Comparison | Mean difference (mm) | t | p | Adjusted p | Significant |"
            )?;
            writeln!(
                out,
                "|------------|----------------------|---|---|------------|-------------|"
            )?;
            for c in &r.posthoc {
                writeln!(
                    out,
                    "| {} vs {} | {:+.2} | {} | {} | {} | {} |",
                    c.first,
                    c.second,
                    c.mean_difference,
                    format_t(c.t_statistic, c.mean_difference),
                    format_p(c.p_value),
                    format_p(c.adjusted_p_value),
                    if c.significant { "yes" } else { "no" }
                )?;
            }
            writeln!(out)?;
            section += 1;
        }

        writeln!(out, "## {}. Recommendation", section)?;
        writeln!(out)?;
        self.write_recommendation(out)?;
        writeln!(out)?;
        section += 1;

        if let Some(plot) = &self.plot_file {
            writeln!(out, "## {}. Visualization", section)?;
            writeln!(out)?;
            writeln!(out, "![ANOVA visualization]({})", plot)?;
            writeln!(out)?;
        }

        writeln!(out, "---")?;
        writeln!(out)?;
        writeln!(out, "**Data file**: {}", self.data_file)?;
        Ok(())
    }

    fn write_recommendation<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        let r = self.result;
        let ranking = r.ranking();

        if r.significant {
            writeln!(out, "### Algorithm selection")?;
            writeln!(out)?;
            writeln!(out, "1. **Recommended**: {}", r.recommended_algorithm)?;
            if let Some(mean) = r.mean_of(r.recommended_algorithm) {
                writeln!(out, "   - Lowest mean control error: {:.2} mm", mean)?;
            }
            writeln!(out, "   - Best accuracy, suited to high-precision control")?;

            let mut item = 2;
            if ranking.len() > 2 {
                let alternative = &ranking[1];
                writeln!(out)?;
                writeln!(out, "{}. **Alternative**: {}", item, alternative.algorithm)?;
                writeln!(out, "   - Mean control error: {:.2} mm", alternative.mean)?;
                writeln!(out, "   - Adequate for general precision requirements")?;
                item += 1;
            }

            if let Some(worst) = ranking.last().filter(|w| w.algorithm != r.recommended_algorithm)
            {
                writeln!(out)?;
                writeln!(out, "{}. **Not recommended**: {}", item, worst.algorithm)?;
                writeln!(out, "   - Highest mean control error: {:.2} mm", worst.mean)?;
                writeln!(out, "   - Needs parameter tuning or redesign")?;
            }
        } else {
            writeln!(out, "### Selection considerations")?;
            writeln!(out)?;
            writeln!(
                out,
                "The algorithms perform comparably. Lowest observed mean: {} \
                 (not statistically distinguishable). Choose based on:",
                r.recommended_algorithm
            )?;
            writeln!(out)?;
            writeln!(out, "1. Computational complexity and real-time requirements")?;
            writeln!(out, "2. Implementation effort and maintenance cost")?;
            writeln!(out, "3. Robustness to changes in system parameters")?;
            writeln!(out, "4. Team experience with each approach")?;
        }

        Ok(())
    }
}

impl fmt::Display for MarkdownReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_document(f)
    }
}

/// Format a t statistic; an undefined t takes the sign of the mean difference
fn format_t(t: Option<f64>, mean_difference: f64) -> String {
    match t {
        Some(t) => format!("{:.3}", t),
        None if mean_difference < 0.0 => "-∞".to_string(),
        None => "+∞".to_string(),
    }
}

/// Format a p-value with four decimals, collapsing tiny values
pub fn format_p(p: f64) -> String {
    if p < 0.0001 {
        "< 0.0001".to_string()
    } else {
        format!("{:.4}", p)
    }
}
