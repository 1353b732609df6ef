//! Tabular output shared by the console renderer and the workbook exporter.
//!
//! Calculators describe their results as [`Sheet`]s of typed [`Cell`]s. The
//! same [`FormatConfig`] value is handed to both the console and the
//! exporter, so printed and exported figures are rounded identically.

mod format;
mod sheet;

pub use format::FormatConfig;
pub use sheet::{Cell, Sheet, Workbook};
