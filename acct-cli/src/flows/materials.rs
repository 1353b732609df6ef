//! Raw-material requirements and purchases budget.

use acct_core::calculations::MaterialBudget;
use acct_core::{MaterialLine, ProductSet, ProductionRequirement};
use tracing::{debug, warn};

use crate::display::BoxLine;
use crate::flows::{before_results, export::offer_export, finish};
use crate::prompt::{Bounds, Console, PromptResult};
use crate::settings::Settings;
use crate::state::AppState;

pub fn run(
    console: &mut Console<'_>,
    settings: &Settings,
    state: &AppState,
) -> PromptResult<()> {
    console.banner(&[BoxLine::title("Raw-material requirements and purchases budget")])?;

    let requirements = match state.production_requirements() {
        Some(stored)
            if console.confirm("Use the required production from the last production budget?")? =>
        {
            debug!(products = stored.len(), "reusing production budget");
            stored
        }
        _ => read_requirements(console)?,
    };

    let mut lines = Vec::new();
    for requirement in &requirements {
        lines.extend(read_components(console, requirement)?);
    }

    before_results(console, settings)?;
    match MaterialBudget::new(&requirements, &lines) {
        Ok(budget) => {
            let workbook = budget.workbook();
            for sheet in workbook.sheets() {
                console.table(sheet)?;
            }
            offer_export(console, settings, &workbook)?;
        }
        Err(e) => {
            warn!(error = %e, "material budget failed");
            console.error(&e.to_string())?;
        }
    }

    finish(console)
}

fn read_requirements(console: &mut Console<'_>) -> PromptResult<Vec<ProductionRequirement>> {
    let mut requirements: ProductSet<ProductionRequirement> = ProductSet::new();
    loop {
        let product = console.field(&format!("Product {} name: ", requirements.len() + 1))?;
        if requirements.contains(&product) {
            console.error(&format!("a product named '{product}' was already entered"))?;
            continue;
        }
        let units = console.number("Required production (units): ", Bounds::NON_NEGATIVE)?;
        if let Err(e) = requirements.push(ProductionRequirement::new(product, units)) {
            console.error(&e.to_string())?;
            continue;
        }
        if !console.confirm("Add another product?")? {
            break;
        }
    }
    Ok(requirements.iter().cloned().collect())
}

fn read_components(
    console: &mut Console<'_>,
    requirement: &ProductionRequirement,
) -> PromptResult<Vec<MaterialLine>> {
    let units = console.format().number(requirement.units);
    console.banner(&[
        BoxLine::title(format!("Components of {}", requirement.product)),
        BoxLine::text(format!("Required production: {units} units")),
    ])?;

    let mut components: ProductSet<MaterialLine> = ProductSet::new();
    loop {
        let component = console.field("Component name: ")?;
        if components.contains(&component) {
            console.error(&format!(
                "component '{component}' was already entered for {}",
                requirement.product
            ))?;
            continue;
        }
        let line = MaterialLine {
            product: requirement.product.clone(),
            component,
            per_unit: console.number("Material per finished unit: ", Bounds::NON_NEGATIVE)?,
            ending_inventory: console
                .number("Desired ending inventory of material: ", Bounds::NON_NEGATIVE)?,
            beginning_inventory: console
                .number("Beginning inventory of material: ", Bounds::NON_NEGATIVE)?,
            unit_cost: console.number("Material unit cost: ", Bounds::NON_NEGATIVE)?,
        };
        if let Err(e) = components.push(line) {
            console.error(&e.to_string())?;
            continue;
        }
        if !console.confirm("Add another component?")? {
            break;
        }
    }
    Ok(components.iter().cloned().collect())
}
