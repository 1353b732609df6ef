//! Weighted contribution margin and per-product allocation.
//!
//! The multi-line break-even and target-unit calculators both blend the
//! products' contribution margins by participation percentage, solve for a
//! total number of units, and then split that total back across products by
//! the same percentages.
//!
//! Percentages are used as entered. A set whose weights do not add up to 100
//! is not normalized.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{Overflow, multiply, percent_to_ratio, subtract, total};
use crate::models::ProductSet;
use crate::report::{Cell, Sheet};

/// A product's contribution margin scaled by its participation percentage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedMargin {
    pub product: String,
    pub contribution_margin: Decimal,
    pub weight: Decimal,
    pub weighted_margin: Decimal,
}

/// A product's share of a total unit figure and the revenue it represents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductAllocation {
    pub product: String,
    pub weight: Decimal,
    pub total_units: Decimal,
    pub units: Decimal,
    pub unit_price: Decimal,
    pub revenue: Decimal,
}

pub fn weighted_margins(products: &ProductSet) -> Result<Vec<WeightedMargin>, Overflow> {
    products
        .iter()
        .map(|line| {
            let contribution_margin = subtract(line.unit_price, line.unit_variable_cost)?;
            Ok(WeightedMargin {
                product: line.name.clone(),
                contribution_margin,
                weight: line.weight,
                weighted_margin: multiply(contribution_margin, line.weight_ratio())?,
            })
        })
        .collect()
}

/// Sum of the weighted margins: `M = Σ c_i * w_i / 100`.
pub fn blended_margin(margins: &[WeightedMargin]) -> Result<Decimal, Overflow> {
    total(margins.iter().map(|m| m.weighted_margin))
}

/// Splits `total_units` across products: `Q_i = Q * w_i / 100`.
pub fn allocate(
    products: &ProductSet,
    total_units: Decimal,
) -> Result<Vec<ProductAllocation>, Overflow> {
    products
        .iter()
        .map(|line| {
            let units = multiply(total_units, percent_to_ratio(line.weight))?;
            Ok(ProductAllocation {
                product: line.name.clone(),
                weight: line.weight,
                total_units,
                units,
                unit_price: line.unit_price,
                revenue: multiply(units, line.unit_price)?,
            })
        })
        .collect()
}

/// Units actually allocated. Differs from the solved total when the weights
/// do not add up to 100.
pub fn allocated_units(allocations: &[ProductAllocation]) -> Result<Decimal, Overflow> {
    total(allocations.iter().map(|a| a.units))
}

pub fn total_revenue(allocations: &[ProductAllocation]) -> Result<Decimal, Overflow> {
    total(allocations.iter().map(|a| a.revenue))
}

/// The raw product data as entered.
pub fn input_sheet(products: &ProductSet) -> Sheet {
    let mut sheet = Sheet::new(
        "Input data",
        [
            "Product",
            "Contribution weight",
            "Unit price",
            "Unit variable cost",
            "Unit contribution margin",
        ],
    );
    for line in products {
        sheet.push_row(vec![
            line.name.clone().into(),
            Cell::Percent(line.weight),
            Cell::Currency(line.unit_price),
            Cell::Currency(line.unit_variable_cost),
            Cell::Currency(line.contribution_margin()),
        ]);
    }
    sheet
}

pub fn weighted_margin_sheet(
    margins: &[WeightedMargin],
    blended: Decimal,
) -> Sheet {
    let mut sheet = Sheet::new(
        "Weighted margin",
        [
            "Product",
            "Unit contribution margin",
            "Contribution weight",
            "Weighted margin",
        ],
    );
    for m in margins {
        sheet.push_row(vec![
            m.product.clone().into(),
            Cell::Currency(m.contribution_margin),
            Cell::Percent(m.weight),
            Cell::Currency(m.weighted_margin),
        ]);
    }
    sheet.push_row(vec![
        "Total".into(),
        Cell::empty(),
        Cell::empty(),
        Cell::Currency(blended),
    ]);
    sheet
}

/// Per-product units, titled by the calculation that produced the total.
pub fn units_sheet(
    name: &str,
    allocations: &[ProductAllocation],
) -> Sheet {
    let mut sheet = Sheet::new(
        name,
        ["Product", "Contribution weight", "Total units", "Product units"],
    );
    for a in allocations {
        sheet.push_row(vec![
            a.product.clone().into(),
            Cell::Percent(a.weight),
            Cell::Number(a.total_units),
            Cell::Number(a.units),
        ]);
    }
    sheet
}

/// Per-product revenue with a total row carrying the precomputed totals.
pub fn revenue_sheet(
    name: &str,
    allocations: &[ProductAllocation],
    allocated_units: Decimal,
    revenue: Decimal,
) -> Sheet {
    let mut sheet = Sheet::new(name, ["Product", "Product units", "Unit price", "Revenue"]);
    for a in allocations {
        sheet.push_row(vec![
            a.product.clone().into(),
            Cell::Number(a.units),
            Cell::Currency(a.unit_price),
            Cell::Currency(a.revenue),
        ]);
    }
    sheet.push_row(vec![
        "Total".into(),
        Cell::Number(allocated_units),
        Cell::empty(),
        Cell::Currency(revenue),
    ]);
    sheet
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::ProductLine;

    fn two_products() -> ProductSet {
        ProductSet::try_from(vec![
            ProductLine::new("A", dec!(60), dec!(50), dec!(30)),
            ProductLine::new("B", dec!(40), dec!(80), dec!(50)),
        ])
        .unwrap()
    }

    #[test]
    fn weighted_margins_scale_by_weight() {
        let margins = weighted_margins(&two_products()).unwrap();

        assert_eq!(margins[0].contribution_margin, dec!(20));
        assert_eq!(margins[0].weighted_margin, dec!(12));
        assert_eq!(margins[1].contribution_margin, dec!(30));
        assert_eq!(margins[1].weighted_margin, dec!(12));
    }

    #[test]
    fn blended_margin_sums_weighted_margins() {
        let margins = weighted_margins(&two_products()).unwrap();

        assert_eq!(blended_margin(&margins), Ok(dec!(24)));
    }

    #[test]
    fn blended_margin_of_empty_set_is_zero() {
        assert_eq!(blended_margin(&[]), Ok(dec!(0)));
    }

    #[test]
    fn allocate_splits_units_and_prices_revenue() {
        let allocations = allocate(&two_products(), dec!(100)).unwrap();

        assert_eq!(allocations[0].units, dec!(60));
        assert_eq!(allocations[0].revenue, dec!(3000));
        assert_eq!(allocations[1].units, dec!(40));
        assert_eq!(allocations[1].revenue, dec!(3200));
        assert_eq!(total_revenue(&allocations), Ok(dec!(6200)));
    }

    #[test]
    fn allocate_does_not_normalize_overweight_sets() {
        let products = ProductSet::try_from(vec![
            ProductLine::new("A", dec!(70), dec!(10), dec!(5)),
            ProductLine::new("B", dec!(50), dec!(10), dec!(5)),
        ])
        .unwrap();

        let allocations = allocate(&products, dec!(100)).unwrap();

        assert_eq!(allocated_units(&allocations), Ok(dec!(120)));
    }

    #[test]
    fn revenue_sheet_appends_total_row() {
        let allocations = allocate(&two_products(), dec!(100)).unwrap();

        let sheet = revenue_sheet("Revenue", &allocations, dec!(100), dec!(6200));

        let total = sheet.row_by_label("Total").unwrap();
        assert_eq!(total[1], Cell::Number(dec!(100)));
        assert_eq!(total[3], Cell::Currency(dec!(6200)));
    }

    #[test]
    fn allocate_reports_overflowing_revenue() {
        let products = ProductSet::try_from(vec![ProductLine::new(
            "Yacht",
            dec!(100),
            dec!(10000000000000000),
            dec!(1),
        )])
        .unwrap();

        let result = allocate(&products, dec!(100000000000000));

        assert_eq!(result, Err(Overflow));
    }

    #[test]
    fn input_sheet_lists_products_in_order() {
        let sheet = input_sheet(&two_products());

        assert_eq!(sheet.rows().len(), 2);
        assert_eq!(sheet.cell(1, 0), Some(&Cell::from("B")));
        assert_eq!(sheet.cell(1, 4), Some(&Cell::Currency(dec!(30))));
    }
}
