//! Break-even point in units and revenue.
//!
//! # Normal mode
//!
//! | Figure | Formula |
//! |--------|---------|
//! | Unit contribution margin | `m = p - v` |
//! | Break-even units | `Q = F / m` |
//! | Break-even revenue | `R = Q * p` |
//!
//! # Multi-line mode
//!
//! Each product carries a participation percentage `w_i` and a contribution
//! margin `c_i`. The blended margin `M = Σ c_i * w_i / 100` gives the total
//! break-even units `Q = F / M`, which is then split per product as
//! `Q_i = Q * w_i / 100` and priced at `Q_i * p_i`.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use acct_core::calculations::{BreakEven, BreakEvenInput};
//!
//! let input = BreakEvenInput {
//!     unit_price: dec!(100),
//!     unit_variable_cost: dec!(60),
//!     fixed_cost: dec!(4000),
//! };
//!
//! let result = BreakEven::calculate(&input).unwrap();
//!
//! assert_eq!(result.unit_contribution_margin, dec!(40));
//! assert_eq!(result.units, dec!(100));
//! assert_eq!(result.revenue, dec!(10000));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::calculations::allocation::{
    self, ProductAllocation, WeightedMargin, allocate, blended_margin, weighted_margins,
};
use crate::calculations::common::{
    Overflow, QuotientError, checked_quotient, multiply, subtract,
};
use crate::models::ProductSet;
use crate::report::{Sheet, Workbook};

/// Errors that can occur during break-even calculations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BreakEvenError {
    /// The (blended) unit contribution margin is zero, so `F / m` is undefined.
    #[error("division by zero: the unit contribution margin is zero")]
    ZeroContributionMargin,

    /// An intermediate figure does not fit in a [`Decimal`].
    #[error("overflow: the amounts entered are too large to calculate")]
    Overflow,

    /// A multi-line calculation was requested without any products.
    #[error("no products were entered")]
    NoProducts,
}

impl From<Overflow> for BreakEvenError {
    fn from(_: Overflow) -> Self {
        Self::Overflow
    }
}

impl From<QuotientError> for BreakEvenError {
    fn from(err: QuotientError) -> Self {
        match err {
            QuotientError::DivisionByZero => Self::ZeroContributionMargin,
            QuotientError::Overflow(_) => Self::Overflow,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakEvenInput {
    pub unit_price: Decimal,
    pub unit_variable_cost: Decimal,
    pub fixed_cost: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakEvenResult {
    pub unit_contribution_margin: Decimal,
    /// Units that must be sold to cover the fixed cost.
    pub units: Decimal,
    /// Revenue at the break-even volume.
    pub revenue: Decimal,
}

/// Single-product break-even calculator.
pub struct BreakEven;

impl BreakEven {
    /// # Errors
    ///
    /// Returns [`BreakEvenError::ZeroContributionMargin`] when the unit sale
    /// price equals the unit variable cost, and [`BreakEvenError::Overflow`]
    /// when the units or revenue do not fit.
    pub fn calculate(input: &BreakEvenInput) -> Result<BreakEvenResult, BreakEvenError> {
        let unit_contribution_margin = subtract(input.unit_price, input.unit_variable_cost)?;
        let units = checked_quotient(input.fixed_cost, unit_contribution_margin)?;
        let revenue = multiply(units, input.unit_price)?;

        debug!(%unit_contribution_margin, %units, %revenue, "break-even calculated");

        Ok(BreakEvenResult {
            unit_contribution_margin,
            units,
            revenue,
        })
    }
}

/// Result of a multi-line break-even calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiLineBreakEvenResult {
    pub fixed_cost: Decimal,
    pub weighted_margins: Vec<WeightedMargin>,
    pub blended_margin: Decimal,
    /// Total break-even units across all products.
    pub units: Decimal,
    pub allocations: Vec<ProductAllocation>,
    /// Sum of the per-product units; above `units` for an overweight set.
    pub allocated_units: Decimal,
    /// Sum of the per-product break-even revenue.
    pub revenue: Decimal,
}

impl MultiLineBreakEvenResult {
    pub fn weighted_margin_sheet(&self) -> Sheet {
        allocation::weighted_margin_sheet(&self.weighted_margins, self.blended_margin)
    }

    pub fn units_sheet(&self) -> Sheet {
        allocation::units_sheet("Break-even units", &self.allocations)
    }

    pub fn revenue_sheet(&self) -> Sheet {
        allocation::revenue_sheet(
            "Break-even revenue",
            &self.allocations,
            self.allocated_units,
            self.revenue,
        )
    }

    /// The `break_even` workbook: input data, weighted margin, units, revenue.
    pub fn workbook(
        &self,
        products: &ProductSet,
    ) -> Workbook {
        Workbook::new("break_even")
            .with_sheet(allocation::input_sheet(products))
            .with_sheet(self.weighted_margin_sheet())
            .with_sheet(self.units_sheet())
            .with_sheet(self.revenue_sheet())
    }
}

/// Multi-product break-even calculator.
#[derive(Debug, Clone)]
pub struct MultiLineBreakEven<'a> {
    products: &'a ProductSet,
}

impl<'a> MultiLineBreakEven<'a> {
    pub fn new(products: &'a ProductSet) -> Self {
        Self { products }
    }

    /// # Errors
    ///
    /// Returns [`BreakEvenError`] if:
    /// - the product set is empty
    /// - the blended contribution margin is zero
    /// - a figure overflows
    pub fn calculate(
        &self,
        fixed_cost: Decimal,
    ) -> Result<MultiLineBreakEvenResult, BreakEvenError> {
        if self.products.is_empty() {
            return Err(BreakEvenError::NoProducts);
        }

        let weighted_margins = weighted_margins(self.products)?;
        let blended_margin = blended_margin(&weighted_margins)?;

        let units = checked_quotient(fixed_cost, blended_margin)?;

        let allocations = allocate(self.products, units)?;
        let allocated_units = allocation::allocated_units(&allocations)?;
        let revenue = allocation::total_revenue(&allocations)?;

        debug!(
            products = self.products.len(),
            %blended_margin,
            %units,
            %revenue,
            "multi-line break-even calculated"
        );

        Ok(MultiLineBreakEvenResult {
            fixed_cost,
            weighted_margins,
            blended_margin,
            units,
            allocations,
            allocated_units,
            revenue,
        })
    }
}
