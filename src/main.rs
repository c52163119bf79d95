use anyhow::{Context, Result};
use clap::Parser;
use ctrl_anova::anova::{self, AnovaResult};
use ctrl_anova::cli::{AnalyzeArgs, Cli, Command, GenerateArgs, ReportArgs, RunArgs};
use ctrl_anova::config::PipelineConfig;
use ctrl_anova::dataset::Dataset;
use ctrl_anova::generator;
use ctrl_anova::report::MarkdownReport;
use ctrl_anova::visualize;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    } else if std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }
}

fn run_generate(config: &mut PipelineConfig, args: GenerateArgs) -> Result<()> {
    if let Some(samples) = args.samples {
        config.generator.samples_per_group = samples;
    }
    if let Some(seed) = args.seed {
        config.generator.seed = seed;
    }
    if let Some(output) = args.output {
        config.paths.data = output;
    }

    let dataset = generator::generate(&config.generator).context("Failed to generate data")?;
    dataset
        .write_csv(&config.paths.data)
        .with_context(|| format!("Failed to write {}", config.paths.data.display()))?;

    println!(
        "Generated {} samples ({} per algorithm, seed {})",
        dataset.len(),
        config.generator.samples_per_group,
        config.generator.seed
    );
    for (algorithm, count) in dataset.group_counts() {
        println!("  {}: {} samples", algorithm, count);
    }
    println!("Data saved to {}", config.paths.data.display());
    Ok(())
}

fn load_dataset(config: &PipelineConfig) -> Result<Dataset> {
    Dataset::read_csv(&config.paths.data).with_context(|| {
        format!(
            "Failed to load data from {} (run `ctrl-anova generate` first)",
            config.paths.data.display()
        )
    })
}

fn run_analyze(config: &mut PipelineConfig, args: AnalyzeArgs) -> Result<AnovaResult> {
    if let Some(data) = args.data {
        config.paths.data = data;
    }
    if let Some(alpha) = args.alpha {
        config.analysis.alpha = alpha;
    }
    if let Some(plot) = args.plot {
        config.paths.plot = plot;
    }
    if let Some(result) = args.result {
        config.paths.result = result;
    }
    if args.no_posthoc {
        config.analysis.posthoc = false;
    }

    let dataset = load_dataset(config)?;
    println!(
        "Loaded {} samples from {}",
        dataset.len(),
        config.paths.data.display()
    );

    let result = anova::analyze(&dataset, &config.analysis)
        .context("ANOVA failed")?
        .with_data_file(config.paths.data.clone());
    println!("{}", result.to_report_string());

    result
        .save_json(&config.paths.result)
        .with_context(|| format!("Failed to write {}", config.paths.result.display()))?;
    println!("Result saved to {}", config.paths.result.display());

    if args.skip_plot {
        tracing::info!("Skipping visualization");
    } else {
        visualize::render_comparison(&dataset, &config.paths.plot, &config.plot)
            .with_context(|| format!("Failed to render {}", config.paths.plot.display()))?;
        println!("Visualization saved to {}", config.paths.plot.display());
    }

    Ok(result)
}

fn run_report(config: &mut PipelineConfig, args: ReportArgs) -> Result<()> {
    // An explicit dataset always wins over a saved result
    let explicit_data = args.data.is_some();
    if let Some(data) = args.data {
        config.paths.data = data;
    }
    if let Some(result) = args.result {
        config.paths.result = result;
    }
    if let Some(plot) = args.plot {
        config.paths.plot = plot;
    }
    if let Some(output) = args.output {
        config.paths.report = output;
    }

    let result = if !explicit_data && config.paths.result.exists() {
        AnovaResult::load_json(&config.paths.result)
            .with_context(|| format!("Failed to read {}", config.paths.result.display()))?
    } else {
        if explicit_data {
            tracing::info!("Analyzing {}", config.paths.data.display());
        } else {
            tracing::warn!(
                "{} not found, recomputing from {}",
                config.paths.result.display(),
                config.paths.data.display()
            );
        }
        let dataset = load_dataset(config)?;
        anova::analyze(&dataset, &config.analysis)
            .context("ANOVA failed")?
            .with_data_file(config.paths.data.clone())
    };

    let data_file = result
        .data_file
        .clone()
        .unwrap_or_else(|| config.paths.data.clone());
    let mut report = MarkdownReport::new(&result, data_file.display().to_string());
    if config.paths.plot.exists() {
        report = report.with_plot(config.paths.plot.display().to_string());
    }
    report
        .write(&config.paths.report)
        .with_context(|| format!("Failed to write {}", config.paths.report.display()))?;

    println!("Report saved to {}", config.paths.report.display());
    Ok(())
}

fn run_pipeline(config: &mut PipelineConfig, args: RunArgs) -> Result<()> {
    println!("[1/3] Generating data");
    run_generate(config, GenerateArgs::default())?;

    println!("\n[2/3] Analyzing");
    run_analyze(
        config,
        AnalyzeArgs {
            skip_plot: args.skip_plot,
            ..AnalyzeArgs::default()
        },
    )?;

    println!("\n[3/3] Writing report");
    run_report(config, ReportArgs::default())
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    let mut config = PipelineConfig::load(args.config.as_deref()).with_context(|| {
        format!(
            "Failed to load configuration{}",
            args.config
                .as_ref()
                .map(|p| format!(" from {}", p.display()))
                .unwrap_or_default()
        )
    })?;
    config.validate().context("Invalid configuration")?;

    match args.command {
        Command::Generate(generate) => run_generate(&mut config, generate)?,
        Command::Analyze(analyze) => {
            run_analyze(&mut config, analyze)?;
        }
        Command::Report(report) => run_report(&mut config, report)?,
        Command::Run(run) => run_pipeline(&mut config, run)?,
    }

    Ok(())
}
