use acct_core::calculations::{BreakEven, BreakEvenInput, MultiLineBreakEven};
use tracing::warn;

use crate::display::BoxLine;
use crate::flows::{before_results, export::offer_export, finish, products::collect_products};
use crate::prompt::{Bounds, Console, PromptResult};
use crate::settings::Settings;

const OPTIONS: [&str; 3] = [
    "Break-even point (single product)",
    "Break-even point (multiple product lines)",
    "Return to the main menu",
];

/// The break-even submenu; loops until the user picks return.
pub fn menu(
    console: &mut Console<'_>,
    settings: &Settings,
) -> PromptResult<()> {
    loop {
        match console.menu("Break-even point", &OPTIONS)? {
            1 => normal(console, settings)?,
            2 => multi_line(console, settings)?,
            _ => return Ok(()),
        }
    }
}

pub fn normal(
    console: &mut Console<'_>,
    settings: &Settings,
) -> PromptResult<()> {
    console.rule()?;
    let input = BreakEvenInput {
        unit_price: console.number("1. Enter the unit sale price: ", Bounds::NON_NEGATIVE)?,
        unit_variable_cost: console
            .number("2. Enter the unit variable cost: ", Bounds::NON_NEGATIVE)?,
        fixed_cost: console.number("3. Enter the fixed cost: ", Bounds::NON_NEGATIVE)?,
    };

    before_results(console, settings)?;
    match BreakEven::calculate(&input) {
        Ok(result) => {
            let fmt = console.format().clone();
            console.banner(&[
                BoxLine::title("Break-even point"),
                BoxLine::Separator,
                BoxLine::text(format!(
                    "Unit contribution margin: {}",
                    fmt.currency(result.unit_contribution_margin)
                )),
                BoxLine::text(format!("Break-even point in units: {}", fmt.number(result.units))),
                BoxLine::text(format!(
                    "Break-even point in revenue: {}",
                    fmt.currency(result.revenue)
                )),
            ])?;
        }
        Err(e) => {
            warn!(error = %e, "break-even calculation failed");
            console.error(&e.to_string())?;
        }
    }

    finish(console)
}

pub fn multi_line(
    console: &mut Console<'_>,
    settings: &Settings,
) -> PromptResult<()> {
    console.rule()?;
    let products = collect_products(console)?;
    let fixed_cost = console.number("Enter the total fixed cost: ", Bounds::NON_NEGATIVE)?;

    before_results(console, settings)?;
    match MultiLineBreakEven::new(&products).calculate(fixed_cost) {
        Ok(result) => {
            let workbook = result.workbook(&products);
            for sheet in workbook.sheets() {
                console.table(sheet)?;
            }
            let fmt = console.format().clone();
            console.banner(&[
                BoxLine::title("Break-even point"),
                BoxLine::Separator,
                BoxLine::text(format!(
                    "Weighted contribution margin: {}",
                    fmt.currency(result.blended_margin)
                )),
                BoxLine::text(format!("Break-even point in units: {}", fmt.number(result.units))),
                BoxLine::text(format!(
                    "Break-even point in revenue: {}",
                    fmt.currency(result.revenue)
                )),
            ])?;
            offer_export(console, settings, &workbook)?;
        }
        Err(e) => {
            warn!(error = %e, "multi-line break-even calculation failed");
            console.error(&e.to_string())?;
        }
    }

    finish(console)
}
