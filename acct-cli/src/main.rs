use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::debug;

use acct_cli::{App, Console, Settings, logging};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Interactive managerial-accounting calculator.
///
/// Break-even point, units to sell for a desired profit, Cost-Volume-Profit
/// scenarios, and sales, production and raw-material budgets.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory exported workbooks are written under.
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Decimal places shown and exported.
    #[arg(long)]
    precision: Option<u32>,

    /// Log filter: a level (`warn`, `debug`) or an `EnvFilter` directive.
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Also append log records to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Config file values with command-line overrides applied.
    fn settings(&self) -> anyhow::Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        if let Some(dir) = &self.export_dir {
            settings.export.directory = dir.clone();
        }
        if let Some(precision) = self.precision {
            settings.format.precision = precision;
        }
        settings.validate()?;
        Ok(settings)
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level, cli.log_file.as_deref())?;

    let settings = cli.settings().context("invalid configuration")?;
    debug!(?settings, "starting");

    let style = settings.style(io::stdout().is_terminal());
    let format = settings.format.clone();

    let mut input = io::stdin().lock();
    let mut output = io::stdout().lock();
    let mut console = Console::new(&mut input, &mut output, format, style);

    App::new(settings).run(&mut console)
}
