//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use gazette_core::intake::{self, DocumentInput};
use gazette_core::{
    Analyzer, BatchResult, ProgressReporter, ReportFormat, RuleSet, write_report,
};
use gazette_registry::Registry;
use gazette_shared::{
    AnalyzeConfig, AppConfig, DATE_FORMAT, GazetteError, HIGH_INTEREST_KINDS, NOISE_KINDS,
    init_config, load_config, registry_candidates,
};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Gazette: company-notice analyzer for Monitorul Oficial Partea a IV-a.
#[derive(Parser)]
#[command(
    name = "gazette",
    version,
    about = "Classify company notices in gazette issues and rank them against the top-companies registry.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Registry snapshot (JSON). Overrides the configured search paths.
    #[arg(long, env = "GAZETTE_REGISTRY", global = true)]
    pub registry: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Build one report over one or more gazette issues.
    Report {
        /// HTML files of the gazette issues.
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output file or directory (defaults to the configured output_dir).
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Report format: html or json (defaults to the configured format).
        #[arg(short, long)]
        format: Option<String>,

        /// Publication date (DD.MM.YYYY) applied to every issue.
        #[arg(long)]
        date: Option<String>,
    },

    /// Print the alert summary for a single gazette issue as JSON.
    Alerts {
        /// HTML file of the gazette issue.
        file: PathBuf,

        /// Monitor number (inferred from file name or content if omitted).
        #[arg(short, long)]
        monitor: Option<u32>,
    },

    /// Show which operation a piece of notice text is classified as.
    Classify {
        /// Notice text.
        text: String,
    },

    /// Show analyzer and registry statistics.
    Stats,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "gazette=info",
        1 => "gazette=debug",
        _ => "gazette=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let registry_flag = cli.registry.as_deref();
    match cli.command {
        Command::Report {
            files,
            out,
            format,
            date,
        } => cmd_report(
            registry_flag,
            &files,
            out.as_deref(),
            format.as_deref(),
            date.as_deref(),
        ),
        Command::Alerts { file, monitor } => cmd_alerts(registry_flag, &file, monitor),
        Command::Classify { text } => cmd_classify(&text),
        Command::Stats => cmd_stats(registry_flag),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

/// Open the registry named on the command line, or discover one from config.
fn open_registry(flag: Option<&Path>, config: &AppConfig) -> Result<Registry> {
    let registry = match flag {
        Some(path) => Registry::open(path)?,
        None => Registry::discover(&registry_candidates(config))?,
    };
    Ok(registry)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_report(
    registry_flag: Option<&Path>,
    files: &[PathBuf],
    out: Option<&Path>,
    format: Option<&str>,
    date: Option<&str>,
) -> Result<()> {
    let config = load_config()?;
    let format: ReportFormat = format.unwrap_or(config.defaults.format.as_str()).parse()?;
    let published = date
        .map(|d| {
            NaiveDate::parse_from_str(d, DATE_FORMAT)
                .map_err(|e| eyre!("invalid date '{d}': expected DD.MM.YYYY ({e})"))
        })
        .transpose()?;
    let target = out.map_or_else(|| PathBuf::from(&config.defaults.output_dir), Path::to_path_buf);

    let registry = open_registry(registry_flag, &config)?;
    let analyzer = Analyzer::new(&registry, AnalyzeConfig::from(&config));

    info!(files = files.len(), format = format.extension(), "building report");

    let reporter = CliProgress::new();
    let result = match analyzer.process_files(files, published, &reporter) {
        Ok(result) => result,
        Err(GazetteError::NothingUsable { issues }) => {
            reporter.spinner.finish_and_clear();
            for issue in &issues {
                eprintln!("  ! {issue}");
            }
            return Err(eyre!(
                "no relevant records in {} file(s); nothing to report",
                files.len()
            ));
        }
        Err(e) => {
            reporter.spinner.finish_and_clear();
            return Err(e.into());
        }
    };

    let path = write_report(&result.report, format, &target)?;
    print_summary(&result, &path, registry.is_available());

    Ok(())
}

fn print_summary(result: &BatchResult, path: &Path, registry_available: bool) {
    let report = &result.report;
    let s = &report.stats;

    println!();
    println!("  Report written!");
    println!("  ID:            {}", report.id);
    println!(
        "  Monitors:      {} ({}-{})",
        s.monitors,
        report.first_monitor.unwrap_or(0),
        report.last_monitor.unwrap_or(0)
    );
    println!("  Records:       {}", s.total);
    println!("  Relevant:      {}", s.relevant);
    println!("  Noise:         {}", s.noise);
    if registry_available {
        println!("  Top companies: {}", s.registry_matched);
        println!("  High interest: {}", s.high_interest_matched);
    } else {
        println!("  Top companies: - (registry unavailable)");
    }
    println!("  Path:          {}", path.display());
    println!("  Time:          {:.1}s", result.elapsed.as_secs_f64());

    if !result.issues.is_empty() {
        println!();
        println!("  Issues:");
        for issue in &result.issues {
            println!("    - {issue}");
        }
    }
    println!();
}

fn cmd_alerts(registry_flag: Option<&Path>, file: &Path, monitor: Option<u32>) -> Result<()> {
    let config = load_config()?;
    let doc = DocumentInput::from_path(file)?;
    let content = intake::decode(&doc.bytes)?;
    let monitor = monitor
        .or_else(|| intake::infer_monitor(&doc.label, &content))
        .unwrap_or(0);

    let registry = open_registry(registry_flag, &config)?;
    let analyzer = Analyzer::new(&registry, AnalyzeConfig::from(&config));

    info!(file = %file.display(), monitor, "building alerts");
    let summary = analyzer.alerts(&content, monitor);

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn cmd_classify(text: &str) -> Result<()> {
    let (kind, rule) = RuleSet::default().explain(text);

    println!("  Operation: {} ({})", kind.display_name(), kind.id());
    println!("  Category:  {}", kind.category());
    println!("  Rule:      {}", rule.unwrap_or("-"));
    if kind.is_noise() {
        println!("  Flag:      noise");
    } else if kind.is_high_interest() {
        println!("  Flag:      high interest");
    }
    Ok(())
}

fn cmd_stats(registry_flag: Option<&Path>) -> Result<()> {
    let config = load_config()?;
    let registry = open_registry(registry_flag, &config)?;

    let stats = serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "registry": {
            "available": registry.is_available(),
            "source": registry.source().map(|p| p.display().to_string()),
            "companies": registry.len(),
        },
        "rules": RuleSet::default().rules().len(),
        "noise_operations": NOISE_KINDS.iter().map(|k| k.id()).collect::<Vec<_>>(),
        "high_interest_operations": HIGH_INTEREST_KINDS.iter().map(|k| k.id()).collect::<Vec<_>>(),
    });

    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn document_done(&self, label: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Analyzed [{current}/{total}] {label}"));
    }

    fn done(&self, _result: &BatchResult) {
        self.spinner.finish_and_clear();
    }
}
