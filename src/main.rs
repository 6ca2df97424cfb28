// SPDX-License-Identifier: PMPL-1.0-or-later
//! a11y-engine CLI - run the accessibility rule engine over local files

use a11y_engine::model::{Severity, WcagLevel};
use a11y_engine::report::{generate_report, OutputFormat};
use a11y_engine::{filter_by_severity, load_config, DocumentModel, RuleCategory, RuleRegistry};
use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// WCAG accessibility rule engine
#[derive(Parser)]
#[command(name = "a11y-engine")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate an HTML file with optional stylesheets and scripts
    Check {
        /// HTML file to evaluate
        html: PathBuf,

        /// Extra stylesheet files
        #[arg(long = "css", num_args = 1..)]
        css: Vec<PathBuf>,

        /// Extra script files
        #[arg(long = "js", num_args = 1..)]
        js: Vec<PathBuf>,

        /// URL recorded in the result (defaults to the file path)
        #[arg(long)]
        url: Option<String>,

        /// WCAG conformance level (overrides the config file)
        #[arg(long)]
        level: Option<WcagLevelArg>,

        /// Output format
        #[arg(long, default_value = "text")]
        format: FormatArg,

        /// Comma-separated rule ids to run instead of the full catalog
        #[arg(long, value_delimiter = ',')]
        rules: Vec<String>,

        /// Only run rules of this category (wcag, css, js)
        #[arg(long, conflicts_with = "rules")]
        category: Option<String>,

        /// Comma-separated severities that fail the run (default: any violation)
        #[arg(long, value_delimiter = ',')]
        severity: Vec<String>,

        /// Configuration file
        #[arg(long, default_value = "a11y-engine.toml")]
        config: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// List the registered rules
    Rules {
        /// Configuration file
        #[arg(long, default_value = "a11y-engine.toml")]
        config: PathBuf,
    },
}

/// WCAG conformance level CLI argument
#[derive(Debug, Clone, Copy, ValueEnum)]
enum WcagLevelArg {
    /// Level A - minimum
    A,
    /// Level AA - standard
    Aa,
    /// Level AAA - enhanced
    Aaa,
}

impl From<WcagLevelArg> for WcagLevel {
    fn from(arg: WcagLevelArg) -> Self {
        match arg {
            WcagLevelArg::A => WcagLevel::A,
            WcagLevelArg::Aa => WcagLevel::AA,
            WcagLevelArg::Aaa => WcagLevel::AAA,
        }
    }
}

/// Output format CLI argument
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Human-readable text
    Text,
    /// Structured JSON
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("a11y_engine=debug")
    } else {
        EnvFilter::new("a11y_engine=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Check {
            html,
            css,
            js,
            url,
            level,
            format,
            rules,
            category,
            severity,
            config,
            output,
        } => {
            let mut engine_config = load_config(&config)?;
            if let Some(level) = level {
                engine_config.target_level = level.into();
            }
            engine_config.validate()?;

            let markup = read_source(&html)?;
            let stylesheets = css.iter().map(|p| read_source(p)).collect::<anyhow::Result<Vec<_>>>()?;
            let scripts = js.iter().map(|p| read_source(p)).collect::<anyhow::Result<Vec<_>>>()?;
            let url = url.unwrap_or_else(|| html.display().to_string());
            let doc = DocumentModel::from_html(url, &markup, &stylesheets, &scripts)?;

            let registry = RuleRegistry::with_default_rules(&engine_config)?;
            let result = if !rules.is_empty() {
                let ids: Vec<&str> = rules.iter().map(String::as_str).collect();
                registry.run_subset(&doc, &ids)?
            } else if let Some(category) = category {
                let category: RuleCategory = category.parse().map_err(anyhow::Error::msg)?;
                registry.run_category(&doc, category)?
            } else {
                registry.run_all(&doc)?
            };

            let report = generate_report(&result, format.into());
            write_output(&report, output.as_deref())?;

            if !severity.is_empty() {
                let keep = severity
                    .iter()
                    .map(|s| s.parse::<Severity>())
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(anyhow::Error::msg)?;
                let kept = filter_by_severity(result.violations(), &keep);
                if !kept.is_empty() {
                    std::process::exit(1);
                }
            } else if !result.violations().is_empty() {
                std::process::exit(1);
            }
        }

        Commands::Rules { config } => {
            let engine_config = load_config(&config)?;
            let registry = RuleRegistry::with_default_rules(&engine_config)?;
            for rule in registry.descriptors() {
                println!(
                    "{:<22} {:<5} {:<9} {}",
                    rule.id,
                    rule.category.to_string(),
                    rule.default_severity.to_string(),
                    rule.wcag_criteria.join(", ")
                );
            }
        }
    }

    Ok(())
}

fn read_source(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Write output to file or stdout
fn write_output(content: &str, path: Option<&Path>) -> anyhow::Result<()> {
    match path {
        Some(p) => {
            std::fs::write(p, content)?;
            eprintln!("Report written to {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
