//! Raw-material requirements and purchases budget.
//!
//! For every finished product and each of its components:
//!
//! | Figure | Formula |
//! |--------|---------|
//! | Material for production | `required production * material per unit` |
//! | Material required | `material for production + ending inventory - beginning inventory` |
//! | Budgeted purchases | `material required * unit cost` |
//!
//! Components are computed independently; nothing is aggregated across them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::budgets::BudgetError;
use crate::calculations::common::{Overflow, add, multiply, subtract};
use crate::models::{MaterialLine, ProductionRequirement};
use crate::report::{Cell, Sheet, Workbook};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialRequirementRow {
    pub product: String,
    pub component: String,
    pub required_production: Decimal,
    pub per_unit: Decimal,
    pub material_for_production: Decimal,
    pub ending_inventory: Decimal,
    pub beginning_inventory: Decimal,
    pub material_required: Decimal,
    pub unit_cost: Decimal,
    pub budgeted_purchases: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialBudget {
    pub rows: Vec<MaterialRequirementRow>,
}

impl MaterialBudget {
    /// # Errors
    ///
    /// Returns [`BudgetError::UnknownProduct`] when a material line names a
    /// product with no production requirement, and [`BudgetError::Overflow`]
    /// when a component's figures do not fit.
    pub fn new(
        requirements: &[ProductionRequirement],
        lines: &[MaterialLine],
    ) -> Result<Self, BudgetError> {
        let rows = lines
            .iter()
            .map(|line| {
                let required_production = requirements
                    .iter()
                    .find(|r| r.product == line.product)
                    .map(|r| r.units)
                    .ok_or_else(|| BudgetError::UnknownProduct(line.product.clone()))?;
                Ok(Self::row(line, required_production)?)
            })
            .collect::<Result<Vec<_>, BudgetError>>()?;

        debug!(components = rows.len(), "material budget calculated");

        Ok(Self { rows })
    }

    fn row(
        line: &MaterialLine,
        required_production: Decimal,
    ) -> Result<MaterialRequirementRow, Overflow> {
        let material_for_production = multiply(required_production, line.per_unit)?;
        let material_required = subtract(
            add(material_for_production, line.ending_inventory)?,
            line.beginning_inventory,
        )?;
        Ok(MaterialRequirementRow {
            product: line.product.clone(),
            component: line.component.clone(),
            required_production,
            per_unit: line.per_unit,
            material_for_production,
            ending_inventory: line.ending_inventory,
            beginning_inventory: line.beginning_inventory,
            material_required,
            unit_cost: line.unit_cost,
            budgeted_purchases: multiply(material_required, line.unit_cost)?,
        })
    }

    pub fn sheet(&self) -> Sheet {
        let mut sheet = Sheet::new(
            "Material requirements",
            [
                "Product",
                "Component",
                "Required production",
                "Material per unit",
                "Material for production",
                "Ending inventory",
                "Beginning inventory",
                "Material required",
                "Unit cost",
                "Budgeted purchases",
            ],
        );
        for row in &self.rows {
            sheet.push_row(vec![
                row.product.clone().into(),
                row.component.clone().into(),
                Cell::Number(row.required_production),
                Cell::Number(row.per_unit),
                Cell::Number(row.material_for_production),
                Cell::Number(row.ending_inventory),
                Cell::Number(row.beginning_inventory),
                Cell::Number(row.material_required),
                Cell::Currency(row.unit_cost),
                Cell::Currency(row.budgeted_purchases),
            ]);
        }
        sheet
    }

    /// The `material_purchases_budget` workbook.
    pub fn workbook(&self) -> Workbook {
        Workbook::new("material_purchases_budget").with_sheet(self.sheet())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn line(
        product: &str,
        component: &str,
    ) -> MaterialLine {
        MaterialLine {
            product: product.to_string(),
            component: component.to_string(),
            per_unit: dec!(2.5),
            ending_inventory: dec!(40),
            beginning_inventory: dec!(15),
            unit_cost: dec!(4),
        }
    }

    #[test]
    fn row_follows_requirement_formulas() {
        let requirements = vec![ProductionRequirement::new("Table", dec!(110))];

        let budget = MaterialBudget::new(&requirements, &[line("Table", "Wood")]).unwrap();

        let row = &budget.rows[0];
        // 110 * 2.5 = 275; 275 + 40 - 15 = 300; 300 * 4 = 1200
        assert_eq!(row.material_for_production, dec!(275));
        assert_eq!(row.material_required, dec!(300));
        assert_eq!(row.budgeted_purchases, dec!(1200));
    }

    #[test]
    fn components_are_independent() {
        let requirements = vec![
            ProductionRequirement::new("Table", dec!(110)),
            ProductionRequirement::new("Chair", dec!(10)),
        ];
        let mut screws = line("Table", "Screws");
        screws.per_unit = dec!(8);
        screws.unit_cost = dec!(0.05);

        let budget = MaterialBudget::new(
            &requirements,
            &[line("Table", "Wood"), screws, line("Chair", "Wood")],
        )
        .unwrap();

        assert_eq!(budget.rows.len(), 3);
        // 110 * 8 + 40 - 15 = 905 screws at 0.05
        assert_eq!(budget.rows[1].material_required, dec!(905));
        assert_eq!(budget.rows[1].budgeted_purchases, dec!(45.25));
        // 10 * 2.5 + 40 - 15 = 50
        assert_eq!(budget.rows[2].material_required, dec!(50));
    }

    #[test]
    fn unknown_product_is_reported() {
        let requirements = vec![ProductionRequirement::new("Table", dec!(110))];

        let result = MaterialBudget::new(&requirements, &[line("Lamp", "Glass")]);

        assert_eq!(result, Err(BudgetError::UnknownProduct("Lamp".to_string())));
    }

    #[test]
    fn overflowing_purchases_are_reported() {
        let requirements = vec![ProductionRequirement::new("Table", dec!(10000000000000000))];
        let mut wood = line("Table", "Wood");
        wood.unit_cost = dec!(10000000000000);

        let result = MaterialBudget::new(&requirements, &[wood]);

        assert_eq!(result, Err(BudgetError::Overflow));
    }

    #[test]
    fn sheet_has_one_row_per_component() {
        let requirements = vec![ProductionRequirement::new("Table", dec!(110))];
        let budget = MaterialBudget::new(&requirements, &[line("Table", "Wood")]).unwrap();

        let sheet = budget.workbook().sheet("Material requirements").cloned().unwrap();

        assert_eq!(sheet.rows().len(), 1);
        assert_eq!(sheet.cell(0, 9), Some(&Cell::Currency(dec!(1200))));
    }
}
