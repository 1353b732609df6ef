//! Units to sell to reach a desired profit, before or after income tax.
//!
//! | Treatment | Formula |
//! |-----------|---------|
//! | Pre-tax   | `U = (F + profit) / m` |
//! | Post-tax  | `U = (F + profit / (1 - t)) / m` |
//!
//! The tax rate `t` is entered on the 0-100 scale. The multi-line variants
//! use the blended contribution margin of a product set and allocate the
//! resulting units by participation percentage.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use acct_core::calculations::{TargetUnits, TargetUnitsInput, TaxTreatment};
//!
//! let input = TargetUnitsInput {
//!     fixed_cost: dec!(1000),
//!     desired_profit: dec!(700),
//!     tax: TaxTreatment::PostTax { rate_percent: dec!(30) },
//! };
//!
//! let result = TargetUnits::calculate(&input, dec!(50)).unwrap();
//!
//! // 700 / 0.7 = 1000 before tax; (1000 + 1000) / 50 = 40
//! assert_eq!(result.required_pre_tax_profit, dec!(1000));
//! assert_eq!(result.units, dec!(40));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::calculations::allocation::{
    self, ProductAllocation, WeightedMargin, allocate, blended_margin, weighted_margins,
};
use crate::calculations::common::{
    Overflow, QuotientError, add, checked_quotient, percent_to_ratio,
};
use crate::models::ProductSet;
use crate::report::{Cell, Sheet, Workbook};

/// Errors that can occur during target-unit calculations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TargetUnitsError {
    #[error("division by zero: the unit contribution margin is zero")]
    ZeroContributionMargin,

    /// A 100% tax rate leaves nothing of the pre-tax profit.
    #[error("division by zero: the tax rate is 100%")]
    FullTaxRate,

    #[error("tax rate must be between 0 and 100, got {0}")]
    InvalidTaxRate(Decimal),

    #[error("overflow: the amounts entered are too large to calculate")]
    Overflow,

    #[error("no products were entered")]
    NoProducts,
}

impl From<Overflow> for TargetUnitsError {
    fn from(_: Overflow) -> Self {
        Self::Overflow
    }
}

/// A zero divisor here is the contribution margin; the tax gross-up maps its
/// own zero divisor to [`TargetUnitsError::FullTaxRate`].
impl From<QuotientError> for TargetUnitsError {
    fn from(err: QuotientError) -> Self {
        match err {
            QuotientError::DivisionByZero => Self::ZeroContributionMargin,
            QuotientError::Overflow(_) => Self::Overflow,
        }
    }
}

/// Whether the desired profit is stated before or after income tax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaxTreatment {
    PreTax,
    PostTax { rate_percent: Decimal },
}

impl TaxTreatment {
    pub fn label(&self) -> &'static str {
        match self {
            Self::PreTax => "before taxes",
            Self::PostTax { .. } => "after taxes",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetUnitsInput {
    pub fixed_cost: Decimal,
    pub desired_profit: Decimal,
    pub tax: TaxTreatment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetUnitsResult {
    /// Profit that must be earned before tax (equal to the desired profit
    /// for [`TaxTreatment::PreTax`]).
    pub required_pre_tax_profit: Decimal,
    pub unit_contribution_margin: Decimal,
    pub units: Decimal,
}

/// Single-product target-unit calculator.
pub struct TargetUnits;

impl TargetUnits {
    /// # Errors
    ///
    /// Returns [`TargetUnitsError`] if:
    /// - the tax rate is outside 0-100
    /// - the tax rate is exactly 100
    /// - the unit contribution margin is zero
    /// - a figure overflows
    pub fn calculate(
        input: &TargetUnitsInput,
        unit_contribution_margin: Decimal,
    ) -> Result<TargetUnitsResult, TargetUnitsError> {
        let required_pre_tax_profit = Self::required_pre_tax_profit(input)?;
        let units = checked_quotient(
            add(input.fixed_cost, required_pre_tax_profit)?,
            unit_contribution_margin,
        )?;

        debug!(
            treatment = input.tax.label(),
            %required_pre_tax_profit,
            %units,
            "target units calculated"
        );

        Ok(TargetUnitsResult {
            required_pre_tax_profit,
            unit_contribution_margin,
            units,
        })
    }

    /// Grosses the desired profit up for tax: `profit / (1 - t)`.
    fn required_pre_tax_profit(input: &TargetUnitsInput) -> Result<Decimal, TargetUnitsError> {
        match input.tax {
            TaxTreatment::PreTax => Ok(input.desired_profit),
            TaxTreatment::PostTax { rate_percent } => {
                if rate_percent < Decimal::ZERO || rate_percent > Decimal::ONE_HUNDRED {
                    return Err(TargetUnitsError::InvalidTaxRate(rate_percent));
                }
                let retained = Decimal::ONE - percent_to_ratio(rate_percent);
                checked_quotient(input.desired_profit, retained).map_err(|err| match err {
                    QuotientError::DivisionByZero => TargetUnitsError::FullTaxRate,
                    QuotientError::Overflow(_) => TargetUnitsError::Overflow,
                })
            }
        }
    }
}

/// Result of a multi-line target-unit calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiLineTargetUnitsResult {
    pub weighted_margins: Vec<WeightedMargin>,
    pub target: TargetUnitsResult,
    pub allocations: Vec<ProductAllocation>,
    pub allocated_units: Decimal,
    pub revenue: Decimal,
}

impl MultiLineTargetUnitsResult {
    pub fn blended_margin(&self) -> Decimal {
        self.target.unit_contribution_margin
    }

    pub fn allocation_sheet(&self) -> Sheet {
        let mut sheet = Sheet::new(
            "Target allocation",
            [
                "Product",
                "Contribution weight",
                "Total units",
                "Product units",
                "Unit price",
                "Revenue",
            ],
        );
        for a in &self.allocations {
            sheet.push_row(vec![
                a.product.clone().into(),
                Cell::Percent(a.weight),
                Cell::Number(a.total_units),
                Cell::Number(a.units),
                Cell::Currency(a.unit_price),
                Cell::Currency(a.revenue),
            ]);
        }
        sheet.push_row(vec![
            "Total".into(),
            Cell::empty(),
            Cell::empty(),
            Cell::Number(self.allocated_units),
            Cell::empty(),
            Cell::Currency(self.revenue),
        ]);
        sheet
    }

    /// The `target_units` workbook: input data, weighted margin, allocation.
    pub fn workbook(
        &self,
        products: &ProductSet,
    ) -> Workbook {
        Workbook::new("target_units")
            .with_sheet(allocation::input_sheet(products))
            .with_sheet(allocation::weighted_margin_sheet(
                &self.weighted_margins,
                self.blended_margin(),
            ))
            .with_sheet(self.allocation_sheet())
    }
}

/// Multi-product target-unit calculator.
#[derive(Debug, Clone)]
pub struct MultiLineTargetUnits<'a> {
    products: &'a ProductSet,
}

impl<'a> MultiLineTargetUnits<'a> {
    pub fn new(products: &'a ProductSet) -> Self {
        Self { products }
    }

    /// # Errors
    ///
    /// Returns [`TargetUnitsError::NoProducts`] for an empty set, otherwise
    /// the same errors as [`TargetUnits::calculate`] using the blended margin.
    pub fn calculate(
        &self,
        input: &TargetUnitsInput,
    ) -> Result<MultiLineTargetUnitsResult, TargetUnitsError> {
        if self.products.is_empty() {
            return Err(TargetUnitsError::NoProducts);
        }

        let weighted_margins = weighted_margins(self.products)?;
        let target = TargetUnits::calculate(input, blended_margin(&weighted_margins)?)?;
        let allocations = allocate(self.products, target.units)?;
        let allocated_units = allocation::allocated_units(&allocations)?;
        let revenue = allocation::total_revenue(&allocations)?;

        Ok(MultiLineTargetUnitsResult {
            weighted_margins,
            target,
            allocations,
            allocated_units,
            revenue,
        })
    }
}
