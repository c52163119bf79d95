//! Pipeline configuration
//!
//! A single TOML file can configure every stage. All sections and fields are
//! optional; anything omitted keeps its default, so an empty file is valid.
//!
//! ```toml
//! [generator]
//! samples_per_group = 30
//! seed = 42
//!
//! [analysis]
//! alpha = 0.05
//!
//! [paths]
//! data = "algorithm_performance_data.csv"
//! ```

use crate::anova::AnalysisConfig;
use crate::error::{AnovaError, Result};
use crate::generator::GeneratorConfig;
use crate::visualize::PlotConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File locations shared by the stages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Dataset CSV written by `generate`, read by `analyze`
    pub data: PathBuf,
    /// Visualization image written by `analyze`
    pub plot: PathBuf,
    /// ANOVA result JSON written by `analyze`, read by `report`
    pub result: PathBuf,
    /// Markdown report written by `report`
    pub report: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data: PathBuf::from("algorithm_performance_data.csv"),
            plot: PathBuf::from("algorithm_anova_visualization.png"),
            result: PathBuf::from("anova_result.json"),
            report: PathBuf::from("ANOVA_Analysis_Report.md"),
        }
    }
}

/// Configuration for the whole generate → analyze → report pipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub generator: GeneratorConfig,
    pub analysis: AnalysisConfig,
    pub plot: PlotConfig,
    pub paths: PathsConfig,
}

impl PipelineConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| AnovaError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| AnovaError::file_io(path, e))?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load from `path` when given, otherwise use defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Validate every section
    pub fn validate(&self) -> Result<()> {
        self.generator.validate()?;
        self.analysis.validate()?;
        if self.plot.width == 0 || self.plot.height == 0 {
            return Err(AnovaError::Config(format!(
                "plot size must be non-zero, got {}x{}",
                self.plot.width, self.plot.height
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::Algorithm;

    #[test]
    fn test_default_paths() {
        let config = PipelineConfig::default();
        assert_eq!(
            config.paths.data,
            PathBuf::from("algorithm_performance_data.csv")
        );
        assert_eq!(
            config.paths.plot,
            PathBuf::from("algorithm_anova_visualization.png")
        );
        assert_eq!(config.paths.report, PathBuf::from("ANOVA_Analysis_Report.md"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = PipelineConfig::from_toml_str("").unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn test_partial_toml() {
        let toml = r#"
[generator]
seed = 7

[[generator.groups]]
algorithm = "PID"
mean = 12.0
std_dev = 2.0

[[generator.groups]]
algorithm = "MPC"
mean = 7.0
std_dev = 1.0

[analysis]
alpha = 0.01

[paths]
report = "out/report.md"
"#;
        let config = PipelineConfig::from_toml_str(toml).unwrap();

        assert_eq!(config.generator.seed, 7);
        assert_eq!(config.generator.samples_per_group, 30);
        assert_eq!(config.generator.groups.len(), 2);
        assert_eq!(config.generator.groups[1].algorithm, Algorithm::Mpc);
        assert_eq!(config.analysis.alpha, 0.01);
        assert!(config.analysis.posthoc);
        assert_eq!(config.paths.report, PathBuf::from("out/report.md"));
        assert_eq!(
            config.paths.data,
            PathBuf::from("algorithm_performance_data.csv")
        );
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = PipelineConfig::from_toml_str("[analysis]\nalpha = \"high\"").unwrap_err();
        assert!(matches!(err, AnovaError::Config(_)));
    }

    #[test]
    fn test_validate_rejects_bad_spread() {
        let toml = r#"
[[generator.groups]]
algorithm = "LQR"
mean = 9.0
std_dev = -1.5
"#;
        let config = PipelineConfig::from_toml_str(toml).unwrap();
        assert!(matches!(
            config.validate(),
            Err(AnovaError::InvalidDistributionParameter { .. })
        ));
    }

    #[test]
    fn test_load_without_path_is_default() {
        assert_eq!(PipelineConfig::load(None).unwrap(), PipelineConfig::default());
    }

    #[test]
    fn test_load_missing_file() {
        let err = PipelineConfig::load(Some(Path::new("/nonexistent/ctrl-anova.toml")))
            .unwrap_err();
        assert!(matches!(err, AnovaError::FileIo { .. }));
    }
}
