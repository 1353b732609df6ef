use acct_core::FormatConfig;
use rust_decimal::Decimal;
use thiserror::Error;

/// Error returned when a string cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
pub enum ParseDecimalError {
    #[error("the field cannot be empty")]
    Empty,

    #[error("'{input}' is not a valid number")]
    Invalid {
        input: String,
        #[source]
        source: rust_decimal::Error,
    },

    /// A sign after the leading minus (`--5`, `-$+5`).
    #[error("'{0}' is not a valid number")]
    RepeatedSign(String),
}

/// Normalizes input for decimal parsing: trims whitespace and removes commas (thousands separator).
fn normalize_decimal_input(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Parses a string into a [`Decimal`].
///
/// Handles comma as thousands separator (e.g. `"1,234.56"`).
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    let normalized = normalize_decimal_input(s);
    if normalized.is_empty() {
        return Err(ParseDecimalError::Empty);
    }
    normalized.parse().map_err(|e| {
        tracing::debug!(input = %s, "invalid decimal: {}", e);
        ParseDecimalError::Invalid {
            input: s.trim().to_string(),
            source: e,
        }
    })
}

/// Parses a number the way the console prints it.
///
/// Accepts everything [`parse_decimal`] does plus the configured currency
/// symbol (`$1,200.50`, `-$5`) and a trailing percent sign (`15%`).
pub fn parse_amount(
    s: &str,
    format: &FormatConfig,
) -> Result<Decimal, ParseDecimalError> {
    let trimmed = s.trim();
    let unsigned = trimmed.strip_prefix('-');
    let body = unsigned.unwrap_or(trimmed);
    let body = match format.currency_symbol.as_str() {
        "" => body,
        symbol => body.strip_prefix(symbol).unwrap_or(body),
    };
    let body = body.strip_suffix('%').unwrap_or(body);
    if unsigned.is_some() && body.trim_start().starts_with(['-', '+']) {
        return Err(ParseDecimalError::RepeatedSign(trimmed.to_string()));
    }

    let value = parse_decimal(body).map_err(|e| match e {
        ParseDecimalError::Invalid { source, .. } => ParseDecimalError::Invalid {
            input: trimmed.to_string(),
            source,
        },
        other => other,
    })?;
    Ok(if unsigned.is_some() { -value } else { value })
}
