use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Named;

/// A product entered for a multi-line calculation.
///
/// `weight` is the participation percentage (0-100) the product contributes
/// to the blended contribution margin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductLine {
    pub name: String,
    pub weight: Decimal,
    pub unit_price: Decimal,
    pub unit_variable_cost: Decimal,
}

impl ProductLine {
    pub fn new(
        name: impl Into<String>,
        weight: Decimal,
        unit_price: Decimal,
        unit_variable_cost: Decimal,
    ) -> Self {
        Self {
            name: name.into(),
            weight,
            unit_price,
            unit_variable_cost,
        }
    }

    /// Unit sale price minus unit variable cost.
    pub fn contribution_margin(&self) -> Decimal {
        self.unit_price - self.unit_variable_cost
    }

    /// The participation percentage expressed as a ratio (60 -> 0.60).
    pub fn weight_ratio(&self) -> Decimal {
        self.weight / Decimal::ONE_HUNDRED
    }
}

impl Named for ProductLine {
    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn contribution_margin_is_price_minus_variable_cost() {
        let line = ProductLine::new("Chair", dec!(60), dec!(100), dec!(80));

        assert_eq!(line.contribution_margin(), dec!(20));
    }

    #[test]
    fn contribution_margin_can_be_negative() {
        let line = ProductLine::new("Chair", dec!(60), dec!(50), dec!(80));

        assert_eq!(line.contribution_margin(), dec!(-30));
    }

    #[test]
    fn weight_ratio_divides_by_one_hundred() {
        let line = ProductLine::new("Chair", dec!(37.5), dec!(100), dec!(80));

        assert_eq!(line.weight_ratio(), dec!(0.375));
    }
}
