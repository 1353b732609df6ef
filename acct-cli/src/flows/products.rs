//! Product-line entry shared by the multi-line calculators.

use acct_core::{ProductLine, ProductSet};
use tracing::warn;

use crate::display::BoxLine;
use crate::prompt::{Bounds, Console, PromptResult};

/// Prompts for product lines until the user stops adding them.
///
/// Names must be unique. When a weight would take the running total past
/// 100% the user is warned and asked whether to continue; declining drops
/// the product being entered and ends entry.
pub fn collect_products(console: &mut Console<'_>) -> PromptResult<ProductSet> {
    let mut products = ProductSet::new();

    loop {
        console.banner(&[BoxLine::title(format!("Product {}", products.len() + 1))])?;

        let name = console.field("Product name: ")?;
        if products.contains(&name) {
            console.error(&format!("a product named '{name}' was already entered"))?;
            continue;
        }

        let weight = console.number("Sales mix weight (0-100): ", Bounds::PERCENT)?;
        let check = products.check_weight(weight);
        if check.is_exceeded() {
            let total = console.format().percent(check.total());
            warn!(product = %name, total = %check.total(), "product weights exceed 100%");
            console.banner(&[
                BoxLine::title("WARNING"),
                BoxLine::text(format!("The weights entered add up to {total}, more than 100%")),
            ])?;
            if !console.confirm("Continue anyway?")? {
                break;
            }
        }

        let unit_price = console.number("Unit sale price: ", Bounds::NON_NEGATIVE)?;
        let unit_variable_cost = console.number("Unit variable cost: ", Bounds::NON_NEGATIVE)?;

        if let Err(e) = products.push(ProductLine::new(name, weight, unit_price, unit_variable_cost))
        {
            console.error(&e.to_string())?;
            continue;
        }

        if !console.confirm("Add another product?")? {
            break;
        }
    }

    Ok(products)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::flows::testing;
    use crate::prompt::PromptError;

    #[test]
    fn collects_until_user_stops() {
        let script = "Desk\n60\n50\n30\nY\nShelf\n40\n80\n50\nN\n";

        let (result, _) = testing::run(script, collect_products);

        let products = result.unwrap();
        assert_eq!(products.names(), vec!["Desk", "Shelf"]);
        assert_eq!(products.weight_total(), dec!(100));
        assert_eq!(products.get("Shelf").unwrap().contribution_margin(), dec!(30));
    }

    #[test]
    fn duplicate_name_is_asked_again() {
        let script = "Desk\n50\n10\n5\nY\nDesk\nLamp\n50\n10\n5\nN\n";

        let (result, out) = testing::run(script, collect_products);

        assert_eq!(result.unwrap().names(), vec!["Desk", "Lamp"]);
        assert!(out.contains("Error: a product named 'Desk' was already entered"));
    }

    #[test]
    fn overweight_warning_continue_keeps_product() {
        let script = "Lamp\n70\n25\n15\nY\nMirror\n50\nY\n40\n28\nN\n";

        let (result, out) = testing::run(script, collect_products);

        let products = result.unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products.weight_total(), dec!(120));
        assert!(out.contains("WARNING"));
        assert!(out.contains("The weights entered add up to 120.00%, more than 100%"));
    }

    #[test]
    fn overweight_warning_decline_drops_pending_product() {
        let script = "Lamp\n70\n25\n15\nY\nMirror\n50\nN\n";

        let (result, _) = testing::run(script, collect_products);

        assert_eq!(result.unwrap().names(), vec!["Lamp"]);
    }

    #[test]
    fn cancel_during_entry_propagates() {
        let script = "Desk\n\nY\n";

        let (result, _) = testing::run(script, collect_products);

        assert!(matches!(result, Err(PromptError::Cancelled)));
    }
}
