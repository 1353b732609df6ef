use rust_decimal::Decimal;
use serde::Serialize;

/// A single table cell.
///
/// Numeric variants carry full precision; rounding is applied when the cell
/// is rendered through a [`FormatConfig`](super::FormatConfig).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Cell {
    Text(String),
    Number(Decimal),
    Currency(Decimal),
    /// A percentage expressed on the 0-100 scale.
    Percent(Decimal),
}

impl Cell {
    pub fn empty() -> Self {
        Self::Text(String::new())
    }

    /// The numeric value, if the cell holds one.
    pub fn value(&self) -> Option<Decimal> {
        match self {
            Self::Text(_) => None,
            Self::Number(v) | Self::Currency(v) | Self::Percent(v) => Some(*v),
        }
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Decimal> for Cell {
    fn from(value: Decimal) -> Self {
        Self::Number(value)
    }
}

/// A named table with a header row and an ordered list of rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sheet {
    name: String,
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new<I, S>(
        name: impl Into<String>,
        headers: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row. Every row must have one cell per header.
    pub fn push_row(
        &mut self,
        row: Vec<Cell>,
    ) {
        debug_assert_eq!(
            row.len(),
            self.headers.len(),
            "row width does not match sheet '{}'",
            self.name
        );
        self.rows.push(row);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn cell(
        &self,
        row: usize,
        column: usize,
    ) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    /// Finds the first row whose leading cell is the given label.
    pub fn row_by_label(
        &self,
        label: &str,
    ) -> Option<&[Cell]> {
        self.rows
            .iter()
            .find(|row| matches!(row.first(), Some(Cell::Text(t)) if t == label))
            .map(Vec::as_slice)
    }
}

/// A set of sheets exported together under one name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Workbook {
    name: String,
    sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sheets: Vec::new(),
        }
    }

    pub fn with_sheet(
        mut self,
        sheet: Sheet,
    ) -> Self {
        self.sheets.push(sheet);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn sheet(
        &self,
        name: &str,
    ) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name() == name)
    }
}
