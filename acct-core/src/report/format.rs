use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::Cell;

/// Numeric presentation settings.
///
/// Passed explicitly to every display and export call. `display` and
/// `plain` round with the same precision, so a value shown on screen and
/// the same value written to a workbook differ only in separators and
/// symbols.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    /// Decimal places shown and exported.
    pub precision: u32,
    /// Group the integer part with commas (`1,234.50`).
    pub thousands_separator: bool,
    pub currency_symbol: String,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            precision: 2,
            thousands_separator: true,
            currency_symbol: "$".to_string(),
        }
    }
}

impl FormatConfig {
    /// Rounds half-up (away from zero) to `precision` places and fixes the
    /// scale so trailing zeros are kept.
    pub fn round(
        &self,
        value: Decimal,
    ) -> Decimal {
        let mut rounded =
            value.round_dp_with_strategy(self.precision, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(self.precision);
        if rounded.is_zero() {
            rounded.set_sign_positive(true);
        }
        rounded
    }

    pub fn number(
        &self,
        value: Decimal,
    ) -> String {
        let plain = self.round(value).to_string();
        if self.thousands_separator {
            group_thousands(&plain)
        } else {
            plain
        }
    }

    pub fn currency(
        &self,
        value: Decimal,
    ) -> String {
        let formatted = self.number(value.abs());
        if self.round(value).is_sign_negative() {
            format!("-{}{}", self.currency_symbol, formatted)
        } else {
            format!("{}{}", self.currency_symbol, formatted)
        }
    }

    pub fn percent(
        &self,
        value: Decimal,
    ) -> String {
        format!("{}%", self.number(value))
    }

    /// Console rendering of a cell.
    pub fn display(
        &self,
        cell: &Cell,
    ) -> String {
        match cell {
            Cell::Text(text) => text.clone(),
            Cell::Number(v) => self.number(*v),
            Cell::Currency(v) => self.currency(*v),
            Cell::Percent(v) => self.percent(*v),
        }
    }

    /// Export rendering of a cell: rounded, without separators or symbols.
    pub fn plain(
        &self,
        cell: &Cell,
    ) -> String {
        match cell {
            Cell::Text(text) => text.clone(),
            Cell::Number(v) | Cell::Currency(v) | Cell::Percent(v) => self.round(*v).to_string(),
        }
    }
}

fn group_thousands(plain: &str) -> String {
    let (sign, unsigned) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (idx, ch) in integer.chars().enumerate() {
        if idx > 0 && (integer.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match fraction {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}
