//! Ordered, name-keyed collections of line items.
//!
//! Insertion order is display order. Names are unique within a set; the
//! comparison is exact (case-sensitive), matching what the user typed.

use std::slice::Iter;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ProductLine;

/// Line items that are keyed by a display name.
pub trait Named {
    fn name(&self) -> &str;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProductSetError {
    #[error("a line named '{0}' was already entered")]
    DuplicateName(String),
}

/// Outcome of checking a new participation percentage against the running total.
///
/// Exceeding 100% is a soft condition: the caller decides whether to stop or
/// to keep the line anyway. No normalization is ever applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightCheck {
    WithinLimit { total: Decimal },
    Exceeded { total: Decimal },
}

impl WeightCheck {
    pub fn total(&self) -> Decimal {
        match self {
            Self::WithinLimit { total } | Self::Exceeded { total } => *total,
        }
    }

    pub fn is_exceeded(&self) -> bool {
        matches!(self, Self::Exceeded { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSet<T = ProductLine> {
    items: Vec<T>,
}

impl<T> Default for ProductSet<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Named> ProductSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a line, rejecting a name that is already present.
    pub fn push(
        &mut self,
        item: T,
    ) -> Result<(), ProductSetError> {
        if self.contains(item.name()) {
            return Err(ProductSetError::DuplicateName(item.name().to_string()));
        }
        self.items.push(item);
        Ok(())
    }

    pub fn contains(
        &self,
        name: &str,
    ) -> bool {
        self.get(name).is_some()
    }

    pub fn get(
        &self,
        name: &str,
    ) -> Option<&T> {
        self.items.iter().find(|item| item.name() == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.items.iter().map(Named::name).collect()
    }

    pub fn iter(&self) -> Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Named> TryFrom<Vec<T>> for ProductSet<T> {
    type Error = ProductSetError;

    fn try_from(items: Vec<T>) -> Result<Self, Self::Error> {
        let mut set = Self::new();
        for item in items {
            set.push(item)?;
        }
        Ok(set)
    }
}

impl<'a, T> IntoIterator for &'a ProductSet<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl ProductSet<ProductLine> {
    /// Sum of the participation percentages entered so far.
    pub fn weight_total(&self) -> Decimal {
        self.items.iter().map(|line| line.weight).sum()
    }

    /// Checks what the running total would be after adding `weight`.
    pub fn check_weight(
        &self,
        weight: Decimal,
    ) -> WeightCheck {
        let total = self.weight_total() + weight;
        if total > Decimal::ONE_HUNDRED {
            WeightCheck::Exceeded { total }
        } else {
            WeightCheck::WithinLimit { total }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn line(
        name: &str,
        weight: Decimal,
    ) -> ProductLine {
        ProductLine::new(name, weight, dec!(10), dec!(5))
    }

    #[test]
    fn push_keeps_insertion_order() {
        let mut set = ProductSet::new();
        set.push(line("Tables", dec!(30))).unwrap();
        set.push(line("Chairs", dec!(50))).unwrap();
        set.push(line("Benches", dec!(20))).unwrap();

        assert_eq!(set.names(), vec!["Tables", "Chairs", "Benches"]);
    }

    #[test]
    fn push_rejects_duplicate_names() {
        let mut set = ProductSet::new();
        set.push(line("Tables", dec!(30))).unwrap();

        let result = set.push(line("Tables", dec!(10)));

        assert_eq!(
            result,
            Err(ProductSetError::DuplicateName("Tables".to_string()))
        );
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn names_are_case_sensitive() {
        let mut set = ProductSet::new();
        set.push(line("tables", dec!(30))).unwrap();

        assert!(set.push(line("Tables", dec!(30))).is_ok());
    }

    #[test]
    fn try_from_vec_detects_duplicates() {
        let result = ProductSet::try_from(vec![line("A", dec!(50)), line("A", dec!(50))]);

        assert_eq!(result, Err(ProductSetError::DuplicateName("A".to_string())));
    }

    // =========================================================================
    // weight tests
    // =========================================================================

    #[test]
    fn weight_total_sums_percentages() {
        let set = ProductSet::try_from(vec![line("A", dec!(60)), line("B", dec!(40))]).unwrap();

        assert_eq!(set.weight_total(), dec!(100));
    }

    #[test]
    fn check_weight_allows_exactly_one_hundred() {
        let set = ProductSet::try_from(vec![line("A", dec!(60))]).unwrap();

        let check = set.check_weight(dec!(40));

        assert_eq!(check, WeightCheck::WithinLimit { total: dec!(100) });
        assert!(!check.is_exceeded());
    }

    #[test]
    fn check_weight_flags_totals_over_one_hundred() {
        let set = ProductSet::try_from(vec![line("A", dec!(70))]).unwrap();

        let check = set.check_weight(dec!(50));

        assert_eq!(check, WeightCheck::Exceeded { total: dec!(120) });
        assert_eq!(check.total(), dec!(120));
    }

    #[test]
    fn check_weight_on_empty_set_uses_weight_alone() {
        let set: ProductSet = ProductSet::new();

        assert_eq!(
            set.check_weight(dec!(100)),
            WeightCheck::WithinLimit { total: dec!(100) }
        );
    }
}
