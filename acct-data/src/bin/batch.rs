use std::path::PathBuf;

use acct_core::FormatConfig;
use acct_core::calculations::{
    MultiLineBreakEven, MultiLineTargetUnits, TargetUnitsInput, TaxTreatment,
};
use acct_data::{ProductLoader, WorkbookWriter};
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Run multi-line calculations on a products CSV file without the menu.
///
/// The CSV file should have the following columns:
/// - name: Product name (unique)
/// - weight: Participation percentage (0-100)
/// - unit_price: Unit sale price
/// - unit_variable_cost: Unit variable cost
#[derive(Parser, Debug)]
#[command(name = "acct-batch")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing product lines
    #[arg(short, long)]
    products: PathBuf,

    /// Directory the workbook is written to
    #[arg(short, long, default_value = "exports")]
    out: PathBuf,

    /// Decimal places shown and exported
    #[arg(long, default_value_t = 2)]
    precision: u32,

    /// Fail instead of warning when product weights add up to more than 100
    #[arg(long, default_value_t = false)]
    reject_overweight: bool,

    /// Skip writing the workbook
    #[arg(long, default_value_t = false)]
    no_export: bool,

    /// Log filter (e.g. `info`, `debug`, `acct_core=debug`)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Multi-line break-even point
    BreakEven {
        /// Total fixed cost
        #[arg(long)]
        fixed_cost: Decimal,
    },

    /// Units to sell for a desired profit, allocated by product weight
    TargetUnits {
        /// Total fixed cost
        #[arg(long)]
        fixed_cost: Decimal,

        /// Desired profit
        #[arg(long)]
        desired_profit: Decimal,

        /// Income tax rate (0-100); the desired profit is after tax when set
        #[arg(long)]
        tax_rate: Option<Decimal>,
    },
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let format = FormatConfig {
        precision: args.precision,
        ..FormatConfig::default()
    };

    let products = ProductLoader::load_path(&args.products)
        .with_context(|| format!("Failed to load products: {}", args.products.display()))?;

    println!(
        "Loaded {} products from {}",
        products.len(),
        args.products.display()
    );

    let weight_total = products.weight_total();
    if weight_total > Decimal::ONE_HUNDRED {
        if args.reject_overweight {
            bail!("product weights add up to {weight_total}%, more than 100%");
        }
        warn!(%weight_total, "product weights add up to more than 100%; continuing");
    }

    let workbook = match args.command {
        Command::BreakEven { fixed_cost } => {
            let result = MultiLineBreakEven::new(&products)
                .calculate(fixed_cost)
                .context("Break-even calculation failed")?;
            println!(
                "Break-even point in units: {}",
                format.number(result.units)
            );
            println!(
                "Break-even point in revenue: {}",
                format.currency(result.revenue)
            );
            result.workbook(&products)
        }
        Command::TargetUnits {
            fixed_cost,
            desired_profit,
            tax_rate,
        } => {
            let tax = match tax_rate {
                Some(rate_percent) => TaxTreatment::PostTax { rate_percent },
                None => TaxTreatment::PreTax,
            };
            let input = TargetUnitsInput {
                fixed_cost,
                desired_profit,
                tax,
            };
            let result = MultiLineTargetUnits::new(&products)
                .calculate(&input)
                .context("Target units calculation failed")?;
            println!(
                "Units to sell {}: {}",
                tax.label(),
                format.number(result.target.units)
            );
            println!("Revenue at target: {}", format.currency(result.revenue));
            result.workbook(&products)
        }
    };

    if args.no_export {
        return Ok(());
    }

    let report = WorkbookWriter::new(&args.out, format)
        .write(&workbook)
        .context("Failed to export workbook")?;
    println!(
        "Wrote {} sheets to {}",
        report.sheets,
        report.path.display()
    );

    Ok(())
}
