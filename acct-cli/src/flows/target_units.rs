use acct_core::calculations::{MultiLineTargetUnits, TargetUnits, TargetUnitsInput, TaxTreatment};
use tracing::warn;

use crate::display::BoxLine;
use crate::flows::{before_results, export::offer_export, finish, products::collect_products};
use crate::prompt::{Bounds, Console, PromptResult};
use crate::settings::Settings;

const OPTIONS: [&str; 5] = [
    "Units to sell before taxes",
    "Units to sell before taxes (multiple product lines)",
    "Units to sell after taxes",
    "Units to sell after taxes (multiple product lines)",
    "Return to the main menu",
];

pub fn menu(
    console: &mut Console<'_>,
    settings: &Settings,
) -> PromptResult<()> {
    loop {
        match console.menu("Units to sell for a desired profit", &OPTIONS)? {
            1 => normal(console, settings, false)?,
            2 => multi_line(console, settings, false)?,
            3 => normal(console, settings, true)?,
            4 => multi_line(console, settings, true)?,
            _ => return Ok(()),
        }
    }
}

/// Prompts for the figures shared by every variant; the contribution margin
/// is asked for only by the single-product ones.
fn read_input(
    console: &mut Console<'_>,
    post_tax: bool,
) -> PromptResult<TargetUnitsInput> {
    let fixed_cost = console.number("Enter the total fixed cost: ", Bounds::NON_NEGATIVE)?;
    let desired_profit = console.number("Enter the desired profit: ", Bounds::ANY)?;
    let tax = if post_tax {
        TaxTreatment::PostTax {
            rate_percent: console.number("Enter the tax rate (0-100): ", Bounds::PERCENT)?,
        }
    } else {
        TaxTreatment::PreTax
    };
    Ok(TargetUnitsInput {
        fixed_cost,
        desired_profit,
        tax,
    })
}

pub fn normal(
    console: &mut Console<'_>,
    settings: &Settings,
    post_tax: bool,
) -> PromptResult<()> {
    console.rule()?;
    let input = read_input(console, post_tax)?;
    let margin = console.number("Enter the unit contribution margin: ", Bounds::NON_NEGATIVE)?;

    before_results(console, settings)?;
    match TargetUnits::calculate(&input, margin) {
        Ok(result) => {
            let fmt = console.format().clone();
            let mut lines = vec![BoxLine::title("Units to sell"), BoxLine::Separator];
            if post_tax {
                lines.push(BoxLine::text(format!(
                    "Required profit before taxes: {}",
                    fmt.currency(result.required_pre_tax_profit)
                )));
            }
            lines.push(BoxLine::text(format!(
                "Units to sell {}: {}",
                input.tax.label(),
                fmt.number(result.units)
            )));
            console.banner(&lines)?;
        }
        Err(e) => {
            warn!(error = %e, "target units calculation failed");
            console.error(&e.to_string())?;
        }
    }

    finish(console)
}

pub fn multi_line(
    console: &mut Console<'_>,
    settings: &Settings,
    post_tax: bool,
) -> PromptResult<()> {
    console.rule()?;
    let products = collect_products(console)?;
    let input = read_input(console, post_tax)?;

    before_results(console, settings)?;
    match MultiLineTargetUnits::new(&products).calculate(&input) {
        Ok(result) => {
            let workbook = result.workbook(&products);
            for sheet in workbook.sheets() {
                console.table(sheet)?;
            }
            let fmt = console.format().clone();
            let mut lines = vec![
                BoxLine::title("Units to sell"),
                BoxLine::Separator,
                BoxLine::text(format!(
                    "Weighted contribution margin: {}",
                    fmt.currency(result.blended_margin())
                )),
            ];
            if post_tax {
                lines.push(BoxLine::text(format!(
                    "Required profit before taxes: {}",
                    fmt.currency(result.target.required_pre_tax_profit)
                )));
            }
            lines.push(BoxLine::text(format!(
                "Units to sell {}: {}",
                input.tax.label(),
                fmt.number(result.target.units)
            )));
            lines.push(BoxLine::text(format!(
                "Revenue at target: {}",
                fmt.currency(result.revenue)
            )));
            console.banner(&lines)?;
            offer_export(console, settings, &workbook)?;
        }
        Err(e) => {
            warn!(error = %e, "multi-line target units calculation failed");
            console.error(&e.to_string())?;
        }
    }

    finish(console)
}
