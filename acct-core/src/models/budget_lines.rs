use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Named;

/// Forecast for one product in the sales budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesLine {
    pub product: String,
    pub forecast_units: Decimal,
    /// Defaults to 1 when no price data is available, so the budgeted
    /// sales figure equals the unit forecast.
    pub unit_price: Decimal,
}

impl SalesLine {
    pub fn new(
        product: impl Into<String>,
        forecast_units: Decimal,
        unit_price: Decimal,
    ) -> Self {
        Self {
            product: product.into(),
            forecast_units,
            unit_price,
        }
    }

    /// A forecast entered without price data.
    pub fn without_price(
        product: impl Into<String>,
        forecast_units: Decimal,
    ) -> Self {
        Self::new(product, forecast_units, Decimal::ONE)
    }
}

impl Named for SalesLine {
    fn name(&self) -> &str {
        &self.product
    }
}

/// Finished-goods inventory levels for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryPolicy {
    pub product: String,
    pub desired_ending_inventory: Decimal,
    pub beginning_inventory: Decimal,
}

impl InventoryPolicy {
    pub fn new(
        product: impl Into<String>,
        desired_ending_inventory: Decimal,
        beginning_inventory: Decimal,
    ) -> Self {
        Self {
            product: product.into(),
            desired_ending_inventory,
            beginning_inventory,
        }
    }
}

impl Named for InventoryPolicy {
    fn name(&self) -> &str {
        &self.product
    }
}

/// Units of a finished product that must be produced in the period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionRequirement {
    pub product: String,
    pub units: Decimal,
}

impl ProductionRequirement {
    pub fn new(
        product: impl Into<String>,
        units: Decimal,
    ) -> Self {
        Self {
            product: product.into(),
            units,
        }
    }
}

impl Named for ProductionRequirement {
    fn name(&self) -> &str {
        &self.product
    }
}

/// One raw-material component consumed by a finished product.
///
/// Keyed by component name, so a [`ProductSet`](super::ProductSet) of these
/// holds the components of a single product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialLine {
    pub product: String,
    pub component: String,
    /// Quantity of the component needed per finished unit.
    pub per_unit: Decimal,
    pub ending_inventory: Decimal,
    pub beginning_inventory: Decimal,
    pub unit_cost: Decimal,
}

impl Named for MaterialLine {
    fn name(&self) -> &str {
        &self.component
    }
}
