//! Sales budget and the production budget derived from it.

use acct_core::calculations::{ProductionBudget, SalesBudget};
use acct_core::{InventoryPolicy, ProductSet, SalesLine};
use tracing::{info, warn};

use crate::display::BoxLine;
use crate::flows::{before_results, export::offer_export, finish};
use crate::prompt::{Bounds, Console, PromptResult};
use crate::settings::Settings;
use crate::state::AppState;

pub fn run(
    console: &mut Console<'_>,
    settings: &Settings,
    state: &mut AppState,
) -> PromptResult<()> {
    console.banner(&[BoxLine::title("Sales and production budget")])?;

    let mut sales_lines: ProductSet<SalesLine> = ProductSet::new();
    let mut inventory: ProductSet<InventoryPolicy> = ProductSet::new();
    loop {
        let product = console.field(&format!("Product {} name: ", sales_lines.len() + 1))?;
        if sales_lines.contains(&product) {
            console.error(&format!("a product named '{product}' was already entered"))?;
            continue;
        }

        let forecast = console.number("Forecast sales (units): ", Bounds::NON_NEGATIVE)?;
        let line = if console.confirm("Is a unit sale price available?")? {
            let price = console.number("Unit sale price: ", Bounds::NON_NEGATIVE)?;
            SalesLine::new(product.as_str(), forecast, price)
        } else {
            SalesLine::without_price(product.as_str(), forecast)
        };
        let policy = InventoryPolicy::new(
            product.as_str(),
            console.number("Desired ending inventory (units): ", Bounds::NON_NEGATIVE)?,
            console.number("Beginning inventory (units): ", Bounds::NON_NEGATIVE)?,
        );

        if let Err(e) = sales_lines.push(line).and_then(|()| inventory.push(policy)) {
            console.error(&e.to_string())?;
            continue;
        }

        if !console.confirm("Add another product?")? {
            break;
        }
    }

    before_results(console, settings)?;
    let budgets = SalesBudget::new(&sales_lines)
        .and_then(|sales| Ok((ProductionBudget::new(&sales, &inventory)?, sales)));
    match budgets {
        Ok((production, sales)) => {
            let workbook = production.workbook(&sales);
            for sheet in workbook.sheets() {
                console.table(sheet)?;
            }
            info!(
                products = production.rows.len(),
                "production budget kept for the raw-material budget"
            );
            state.production = Some(production);
            offer_export(console, settings, &workbook)?;
        }
        Err(e) => {
            warn!(error = %e, "sales and production budget failed");
            console.error(&e.to_string())?;
        }
    }

    finish(console)
}
