//! Sales and production budgets.
//!
//! The sales budget prices each product's unit forecast. The production
//! budget takes those forecast units and adjusts them for finished-goods
//! inventory:
//!
//! ```text
//! required production = forecast sales + desired ending inventory - beginning inventory
//! ```
//!
//! A synthesized `Total` row sums every column across products.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::calculations::common::{Overflow, add, multiply, subtract, total};
use crate::models::{InventoryPolicy, ProductSet, ProductionRequirement, SalesLine};
use crate::report::{Cell, Sheet, Workbook};

/// Errors raised when budgets in the chain do not line up.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BudgetError {
    #[error("no inventory levels were entered for product '{0}'")]
    MissingInventory(String),

    #[error("no production figure is available for product '{0}'")]
    UnknownProduct(String),

    #[error("overflow: the amounts entered are too large to calculate")]
    Overflow,
}

impl From<Overflow> for BudgetError {
    fn from(_: Overflow) -> Self {
        Self::Overflow
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesBudgetRow {
    pub product: String,
    pub forecast_units: Decimal,
    pub unit_price: Decimal,
    pub budgeted_sales: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesBudget {
    pub rows: Vec<SalesBudgetRow>,
    pub total_units: Decimal,
    pub total_sales: Decimal,
}

impl SalesBudget {
    /// `budgeted_sales = forecast_units * unit_price` for every product.
    ///
    /// # Errors
    ///
    /// Returns [`BudgetError::Overflow`] when a product's sales or a total
    /// does not fit.
    pub fn new(lines: &ProductSet<SalesLine>) -> Result<Self, BudgetError> {
        let rows = lines
            .iter()
            .map(|line| {
                Ok(SalesBudgetRow {
                    product: line.product.clone(),
                    forecast_units: line.forecast_units,
                    unit_price: line.unit_price,
                    budgeted_sales: multiply(line.forecast_units, line.unit_price)?,
                })
            })
            .collect::<Result<Vec<_>, Overflow>>()?;
        let total_units = total(rows.iter().map(|r| r.forecast_units))?;
        let total_sales = total(rows.iter().map(|r| r.budgeted_sales))?;

        debug!(products = rows.len(), %total_sales, "sales budget calculated");

        Ok(Self {
            rows,
            total_units,
            total_sales,
        })
    }

    pub fn sheet(&self) -> Sheet {
        let mut sheet = Sheet::new(
            "Sales budget",
            ["Product", "Forecast units", "Unit price", "Budgeted sales"],
        );
        for row in &self.rows {
            sheet.push_row(vec![
                row.product.clone().into(),
                Cell::Number(row.forecast_units),
                Cell::Currency(row.unit_price),
                Cell::Currency(row.budgeted_sales),
            ]);
        }
        sheet.push_row(vec![
            "Total".into(),
            Cell::Number(self.total_units),
            Cell::empty(),
            Cell::Currency(self.total_sales),
        ]);
        sheet
    }
}

/// One product's production budget, or the column totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionRow {
    pub product: String,
    pub forecast_sales: Decimal,
    pub desired_ending_inventory: Decimal,
    /// Forecast sales plus desired ending inventory.
    pub total_needed: Decimal,
    pub beginning_inventory: Decimal,
    pub required_production: Decimal,
}

impl ProductionRow {
    fn new(
        product: &str,
        forecast_sales: Decimal,
        desired_ending_inventory: Decimal,
        beginning_inventory: Decimal,
    ) -> Result<Self, Overflow> {
        let total_needed = add(forecast_sales, desired_ending_inventory)?;
        Ok(Self {
            product: product.to_string(),
            forecast_sales,
            desired_ending_inventory,
            total_needed,
            beginning_inventory,
            required_production: subtract(total_needed, beginning_inventory)?,
        })
    }

    fn cells(&self) -> Vec<Cell> {
        vec![
            self.product.clone().into(),
            Cell::Number(self.forecast_sales),
            Cell::Number(self.desired_ending_inventory),
            Cell::Number(self.total_needed),
            Cell::Number(self.beginning_inventory),
            Cell::Number(self.required_production),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionBudget {
    pub rows: Vec<ProductionRow>,
    pub total: ProductionRow,
}

impl ProductionBudget {
    pub const TOTAL_LABEL: &'static str = "Total";

    /// Builds the production budget from the sales budget's unit forecast.
    ///
    /// # Errors
    ///
    /// Returns [`BudgetError::MissingInventory`] when a product in the sales
    /// budget has no inventory policy, and [`BudgetError::Overflow`] when a
    /// figure does not fit.
    pub fn new(
        sales: &SalesBudget,
        inventory: &ProductSet<InventoryPolicy>,
    ) -> Result<Self, BudgetError> {
        let rows = sales
            .rows
            .iter()
            .map(|sale| {
                let policy = inventory
                    .get(&sale.product)
                    .ok_or_else(|| BudgetError::MissingInventory(sale.product.clone()))?;
                Ok(ProductionRow::new(
                    &sale.product,
                    sale.forecast_units,
                    policy.desired_ending_inventory,
                    policy.beginning_inventory,
                )?)
            })
            .collect::<Result<Vec<_>, BudgetError>>()?;

        let total = Self::total_row(&rows)?;

        debug!(
            products = rows.len(),
            required_production = %total.required_production,
            "production budget calculated"
        );

        Ok(Self { rows, total })
    }

    /// Sums each column independently.
    fn total_row(rows: &[ProductionRow]) -> Result<ProductionRow, Overflow> {
        let sum = |f: fn(&ProductionRow) -> Decimal| total(rows.iter().map(f));
        Ok(ProductionRow {
            product: Self::TOTAL_LABEL.to_string(),
            forecast_sales: sum(|r| r.forecast_sales)?,
            desired_ending_inventory: sum(|r| r.desired_ending_inventory)?,
            total_needed: sum(|r| r.total_needed)?,
            beginning_inventory: sum(|r| r.beginning_inventory)?,
            required_production: sum(|r| r.required_production)?,
        })
    }

    /// Per-product production figures for the raw-material budget.
    pub fn requirements(&self) -> Vec<ProductionRequirement> {
        self.rows
            .iter()
            .map(|r| ProductionRequirement::new(r.product.clone(), r.required_production))
            .collect()
    }

    pub fn sheet(&self) -> Sheet {
        let mut sheet = Sheet::new(
            "Production budget",
            [
                "Product",
                "Forecast sales",
                "Desired ending inventory",
                "Total units needed",
                "Beginning inventory",
                "Required production",
            ],
        );
        for row in self.rows.iter().chain(std::iter::once(&self.total)) {
            sheet.push_row(row.cells());
        }
        sheet
    }

    /// The `sales_production_budget` workbook.
    pub fn workbook(
        &self,
        sales: &SalesBudget,
    ) -> Workbook {
        Workbook::new("sales_production_budget")
            .with_sheet(sales.sheet())
            .with_sheet(self.sheet())
    }
}
