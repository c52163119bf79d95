//! CLI argument parsing for ctrl-anova

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ctrl-anova")]
#[command(version)]
#[command(
    about = "Compare PID, LQR and MPC control error with one-way ANOVA",
    long_about = None
)]
pub struct Cli {
    /// Enable debug tracing on stderr
    #[arg(long, global = true)]
    pub debug: bool,

    /// Pipeline configuration file (TOML)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate synthetic control-error samples and write them to CSV
    Generate(GenerateArgs),
    /// Run the ANOVA test, print the verdict, write the result and plot
    Analyze(AnalyzeArgs),
    /// Write the Markdown report from the analysis result
    Report(ReportArgs),
    /// Run generate, analyze and report in sequence
    Run(RunArgs),
}

#[derive(Args, Debug, Default)]
pub struct GenerateArgs {
    /// Samples per algorithm
    #[arg(short = 'n', long, value_name = "N")]
    pub samples: Option<usize>,

    /// Random seed
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Output CSV path
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub struct AnalyzeArgs {
    /// Input CSV path
    #[arg(short, long, value_name = "PATH")]
    pub data: Option<PathBuf>,

    /// Significance level
    #[arg(short, long, value_name = "ALPHA")]
    pub alpha: Option<f64>,

    /// Output image path (.png or .svg)
    #[arg(long, value_name = "PATH")]
    pub plot: Option<PathBuf>,

    /// Do not render the visualization
    #[arg(long)]
    pub skip_plot: bool,

    /// Output JSON result path
    #[arg(long, value_name = "PATH")]
    pub result: Option<PathBuf>,

    /// Skip pairwise post-hoc comparisons
    #[arg(long)]
    pub no_posthoc: bool,
}

#[derive(Args, Debug, Default)]
pub struct ReportArgs {
    /// Dataset CSV path, used when no result file exists
    #[arg(short, long, value_name = "PATH")]
    pub data: Option<PathBuf>,

    /// ANOVA result JSON path
    #[arg(long, value_name = "PATH")]
    pub result: Option<PathBuf>,

    /// Image path linked from the report
    #[arg(long, value_name = "PATH")]
    pub plot: Option<PathBuf>,

    /// Output Markdown path
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Do not render the visualization
    #[arg(long)]
    pub skip_plot: bool,
}
