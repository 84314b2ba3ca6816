use std::{path::PathBuf, process::ExitCode};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use appshots::{BatchReport, ConfigStore, GeneratorSettings, MetadataWriter, Orchestrator};

#[derive(Parser, Debug)]
#[command(name = "appshots", version)]
struct Cli {
    /// Project root holding `resources/` and receiving outputs.
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Debug-level logging (overridden by RUST_LOG).
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate preview images.
    Previews(Selection),
    /// Write store metadata text files.
    Metadata(Selection),
    /// Check store character limits of a config file.
    CheckLimits {
        /// Config JSON to check.
        config: PathBuf,
    },
    /// List configured apps.
    List,
}

#[derive(Args, Debug)]
struct Selection {
    /// App name (case-insensitive) or 1-based index from `list`.
    #[arg(required_unless_present = "all", conflicts_with = "all")]
    app: Option<String>,

    /// Run every configured app.
    #[arg(long, default_value_t = false)]
    all: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // Ignore a second init (e.g. when a subscriber is already installed).
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init();
}

fn run(cli: Cli) -> anyhow::Result<bool> {
    let settings = GeneratorSettings::from_root(&cli.root);
    match cli.cmd {
        Command::Previews(sel) => cmd_previews(settings, sel),
        Command::Metadata(sel) => cmd_metadata(settings, sel),
        Command::CheckLimits { config } => cmd_check_limits(&config),
        Command::List => cmd_list(&settings),
    }
}

fn selected_apps(store: &ConfigStore, sel: &Selection) -> anyhow::Result<Vec<String>> {
    if sel.all {
        return Ok(store.available_apps()?);
    }
    let selector = sel.app.as_deref().context("no app selected")?;
    Ok(vec![store.resolve_app(selector)?])
}

fn cmd_previews(settings: GeneratorSettings, sel: Selection) -> anyhow::Result<bool> {
    let orch = Orchestrator::new(settings);
    let apps = selected_apps(orch.store(), &sel)?;
    let batch = orch.generate_apps(&apps);
    print_batch(&batch);
    Ok(batch.is_success())
}

fn print_batch(batch: &BatchReport) {
    for report in batch.succeeded() {
        eprintln!(
            "{}: {} written, {} skipped",
            report.app, report.stats.slots_written, report.stats.slots_skipped
        );
        for path in report.written() {
            eprintln!("  - {}", path.display());
        }
    }
    for (app, err) in batch.failed() {
        let kind = if err.is_config_level() {
            "invalid config"
        } else {
            "failed"
        };
        eprintln!("{app}: {kind}: {err}");
    }
}

fn cmd_metadata(settings: GeneratorSettings, sel: Selection) -> anyhow::Result<bool> {
    let store = ConfigStore::new(&settings.config_dir);
    let apps = selected_apps(&store, &sel)?;
    let mut ok = true;
    for app in apps {
        let result = store.load(&app).and_then(|config| {
            MetadataWriter::new(settings.output_base(&config)).write_all(&config)
        });
        match result {
            Ok(report) => eprintln!(
                "{}: {} metadata files in {}",
                report.app_title,
                report.total_files(),
                report.output_dir.display()
            ),
            Err(e) => {
                tracing::error!(app = %app, error = %e, "metadata generation failed");
                ok = false;
            }
        }
    }
    Ok(ok)
}

fn cmd_check_limits(path: &std::path::Path) -> anyhow::Result<bool> {
    let config = appshots::load_config_file(path)?;
    let violations = appshots::check_limits(&config);
    if violations.is_empty() {
        eprintln!("{}: all fields within limits", config.app_name);
        return Ok(true);
    }
    eprintln!("{}: {} field(s) over limit", config.app_name, violations.len());
    for v in &violations {
        eprintln!(
            "  {}.{}: {}/{} ({} over)",
            v.language,
            v.field,
            v.current,
            v.limit,
            v.excess()
        );
    }
    Ok(false)
}

fn cmd_list(settings: &GeneratorSettings) -> anyhow::Result<bool> {
    let store = ConfigStore::new(&settings.config_dir);
    let apps = store.available_apps()?;
    for (idx, app) in apps.iter().enumerate() {
        println!("{}. {app}", idx + 1);
    }
    Ok(true)
}
