//! Workbook export.
//!
//! A [`Workbook`] is written as one `.xlsx` file named after the workbook,
//! with one worksheet per sheet:
//!
//! ```text
//! <export dir>/break_even.xlsx
//!     Input data | Weighted margin | Break-even units | Break-even revenue
//! ```
//!
//! Numeric cells go through [`FormatConfig::round`], the same rounding the
//! console uses, and are stored as numbers with a number format matching
//! the configured precision. Empty cells are left blank.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use acct_core::{Cell, FormatConfig, Sheet, Workbook};
use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook, Worksheet, XlsxError};
use thiserror::Error;
use tracing::{debug, info};

/// Windows `ERROR_SHARING_VIOLATION`: the file is open in another program.
const SHARING_VIOLATION: i32 = 32;

/// Errors that can occur while exporting a workbook.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The target file is open in another program or write access was denied.
    #[error("'{}' is locked or not writable; close it and try again", .path.display())]
    Locked { path: PathBuf },

    #[error("cannot write '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot build workbook '{}': {source}", .path.display())]
    Xlsx {
        path: PathBuf,
        #[source]
        source: XlsxError,
    },
}

impl ExportError {
    fn from_io(
        path: &Path,
        source: io::Error,
    ) -> Self {
        let locked = source.kind() == io::ErrorKind::PermissionDenied
            || source.raw_os_error() == Some(SHARING_VIOLATION);
        if locked {
            Self::Locked {
                path: path.to_path_buf(),
            }
        } else {
            Self::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    fn from_xlsx(
        path: &Path,
        source: XlsxError,
    ) -> Self {
        match source {
            XlsxError::IoError(e) => Self::from_io(path, e),
            source => Self::Xlsx {
                path: path.to_path_buf(),
                source,
            },
        }
    }
}

/// The file produced by one export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub path: PathBuf,
    pub sheets: usize,
}

/// Number formats for each kind of numeric cell.
struct CellFormats {
    header: Format,
    number: Format,
    currency: Format,
    percent: Format,
}

impl CellFormats {
    fn new(config: &FormatConfig) -> Self {
        let integer = if config.thousands_separator { "#,##0" } else { "0" };
        let number = match config.precision {
            0 => integer.to_string(),
            places => format!("{integer}.{}", "0".repeat(places as usize)),
        };
        let currency = match config.currency_symbol.replace('"', "").as_str() {
            "" => number.clone(),
            symbol => format!("\"{symbol}\"{number}"),
        };
        Self {
            header: Format::new().set_bold(),
            percent: Format::new().set_num_format(format!("{number}\"%\"")),
            currency: Format::new().set_num_format(currency),
            number: Format::new().set_num_format(number),
        }
    }

    fn for_cell(
        &self,
        cell: &Cell,
    ) -> &Format {
        match cell {
            Cell::Currency(_) => &self.currency,
            Cell::Percent(_) => &self.percent,
            Cell::Number(_) | Cell::Text(_) => &self.number,
        }
    }
}

/// Writes workbooks under a base directory.
#[derive(Debug, Clone)]
pub struct WorkbookWriter {
    directory: PathBuf,
    format: FormatConfig,
}

impl WorkbookWriter {
    pub fn new(
        directory: impl Into<PathBuf>,
        format: FormatConfig,
    ) -> Self {
        Self {
            directory: directory.into(),
            format,
        }
    }

    /// Writes `workbook` to `<directory>/<name>.xlsx`, replacing a previous
    /// export of the same workbook.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Locked`] when the file is open elsewhere or not
    /// writable, [`ExportError::Io`] for other file-system failures and
    /// [`ExportError::Xlsx`] when the workbook cannot be assembled.
    pub fn write(
        &self,
        workbook: &Workbook,
    ) -> Result<ExportReport, ExportError> {
        fs::create_dir_all(&self.directory)
            .map_err(|e| ExportError::from_io(&self.directory, e))?;
        let path = self
            .directory
            .join(format!("{}.xlsx", file_stem(workbook.name())));

        let formats = CellFormats::new(&self.format);
        let mut book = XlsxWorkbook::new();
        for sheet in workbook.sheets() {
            let worksheet = book.add_worksheet();
            self.write_sheet(worksheet, sheet, &formats)
                .map_err(|e| ExportError::from_xlsx(&path, e))?;
            debug!(sheet = sheet.name(), rows = sheet.rows().len(), "worksheet written");
        }
        book.save(&path)
            .map_err(|e| ExportError::from_xlsx(&path, e))?;

        info!(
            workbook = workbook.name(),
            path = %path.display(),
            sheets = workbook.sheets().len(),
            "workbook exported"
        );

        Ok(ExportReport {
            path,
            sheets: workbook.sheets().len(),
        })
    }

    fn write_sheet(
        &self,
        worksheet: &mut Worksheet,
        sheet: &Sheet,
        formats: &CellFormats,
    ) -> Result<(), XlsxError> {
        worksheet.set_name(sheet.name())?;

        for (col, header) in sheet.headers().iter().enumerate() {
            worksheet.write_string_with_format(0, column(col)?, header, &formats.header)?;
        }
        for (idx, cells) in sheet.rows().iter().enumerate() {
            let row = u32::try_from(idx + 1).map_err(|_| XlsxError::RowColumnLimitError)?;
            for (col, cell) in cells.iter().enumerate() {
                self.write_cell(worksheet, row, column(col)?, cell, formats)?;
            }
        }
        worksheet.autofit();
        Ok(())
    }

    fn write_cell(
        &self,
        worksheet: &mut Worksheet,
        row: u32,
        col: u16,
        cell: &Cell,
        formats: &CellFormats,
    ) -> Result<(), XlsxError> {
        match cell.value() {
            Some(value) => match self.format.round(value).to_f64() {
                Some(number) => {
                    worksheet.write_number_with_format(row, col, number, formats.for_cell(cell))?;
                }
                None => {
                    worksheet.write_string(row, col, self.format.plain(cell))?;
                }
            },
            None => {
                if let Cell::Text(text) = cell {
                    if !text.is_empty() {
                        worksheet.write_string(row, col, text)?;
                    }
                }
            }
        }
        Ok(())
    }
}

fn column(idx: usize) -> Result<u16, XlsxError> {
    u16::try_from(idx).map_err(|_| XlsxError::RowColumnLimitError)
}

/// Lower-case file-name stem with runs of unsafe characters collapsed to `_`.
fn file_stem(name: &str) -> String {
    static UNSAFE: OnceLock<Regex> = OnceLock::new();
    let unsafe_chars = UNSAFE.get_or_init(|| Regex::new(r"[^A-Za-z0-9]+").expect("valid regex"));

    let stem = unsafe_chars
        .replace_all(name.trim(), "_")
        .trim_matches('_')
        .to_lowercase();
    if stem.is_empty() {
        "workbook".to_string()
    } else {
        stem
    }
}

#[cfg(test)]
mod tests {
    use calamine::{Data, Reader, Xlsx, open_workbook};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn scratch_dir(test: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("acct-export-{}-{}", std::process::id(), test));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn sample_workbook(units: rust_decimal::Decimal) -> Workbook {
        let mut sheet = Sheet::new("Break-even units", ["Product", "Units", "Revenue"]);
        sheet.push_row(vec![
            "Desk".into(),
            Cell::Number(units),
            Cell::Currency(dec!(1666.666665)),
        ]);
        sheet.push_row(vec!["Total".into(), Cell::empty(), Cell::Currency(dec!(1666.666665))]);
        Workbook::new("break_even").with_sheet(sheet)
    }

    fn read_rows(
        path: &Path,
        sheet: &str,
    ) -> Vec<Vec<Data>> {
        let mut book: Xlsx<_> = open_workbook(path).unwrap();
        let range = book.worksheet_range(sheet).unwrap();
        range.rows().map(<[Data]>::to_vec).collect()
    }

    #[test]
    fn file_stem_sanitizes_names() {
        assert_eq!(file_stem("Break-even units"), "break_even_units");
        assert_eq!(file_stem("  Ventas / Producción "), "ventas_producci_n");
        assert_eq!(file_stem("***"), "workbook");
    }

    #[test]
    fn write_creates_one_workbook_with_a_worksheet_per_sheet() {
        let dir = scratch_dir("one-file");
        let writer = WorkbookWriter::new(&dir, FormatConfig::default());
        let workbook = sample_workbook(dec!(33.3333333))
            .with_sheet(Sheet::new("Input data", ["Product"]));

        let report = writer.write(&workbook).unwrap();

        assert_eq!(report.path, dir.join("break_even.xlsx"));
        assert_eq!(report.sheets, 2);
        let book: Xlsx<_> = open_workbook(&report.path).unwrap();
        assert_eq!(book.sheet_names(), vec!["Break-even units", "Input data"]);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn write_rounds_like_the_console() {
        let dir = scratch_dir("rounding");
        let writer = WorkbookWriter::new(&dir, FormatConfig::default());

        let report = writer.write(&sample_workbook(dec!(33.3333333))).unwrap();

        let rows = read_rows(&report.path, "Break-even units");
        assert_eq!(
            rows[0],
            vec![
                Data::String("Product".to_string()),
                Data::String("Units".to_string()),
                Data::String("Revenue".to_string()),
            ]
        );
        assert_eq!(
            rows[1],
            vec![
                Data::String("Desk".to_string()),
                Data::Float(33.33),
                Data::Float(1666.67),
            ]
        );
        assert_eq!(rows[2][1], Data::Empty);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn write_honours_configured_precision() {
        let dir = scratch_dir("precision");
        let format = FormatConfig {
            precision: 0,
            ..FormatConfig::default()
        };
        let writer = WorkbookWriter::new(&dir, format);

        let report = writer.write(&sample_workbook(dec!(33.5))).unwrap();

        let rows = read_rows(&report.path, "Break-even units");
        assert_eq!(rows[1][1], Data::Float(34.0));
        assert_eq!(rows[1][2], Data::Float(1667.0));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn write_overwrites_previous_export() {
        let dir = scratch_dir("overwrite");
        let writer = WorkbookWriter::new(&dir, FormatConfig::default());
        writer.write(&sample_workbook(dec!(10))).unwrap();

        let report = writer.write(&sample_workbook(dec!(20))).unwrap();

        let rows = read_rows(&report.path, "Break-even units");
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1][1], Data::Float(20.0));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn unwritable_directory_is_reported() {
        let dir = scratch_dir("blocked");
        fs::create_dir_all(&dir).unwrap();
        let blocker = dir.join("blocker");
        fs::write(&blocker, "not a directory").unwrap();
        let writer = WorkbookWriter::new(blocker.join("nested"), FormatConfig::default());

        let result = writer.write(&sample_workbook(dec!(10)));

        assert!(matches!(result, Err(ExportError::Io { .. })));
        let _ = fs::remove_dir_all(&dir);
    }

    // =========================================================================
    // error mapping tests
    // =========================================================================

    #[test]
    fn permission_denied_maps_to_locked() {
        let err = ExportError::from_io(
            Path::new("book.xlsx"),
            io::Error::from(io::ErrorKind::PermissionDenied),
        );

        assert!(matches!(err, ExportError::Locked { .. }));
    }

    #[test]
    fn sharing_violation_maps_to_locked() {
        let err = ExportError::from_io(
            Path::new("book.xlsx"),
            io::Error::from_raw_os_error(SHARING_VIOLATION),
        );

        assert!(matches!(err, ExportError::Locked { .. }));
    }

    #[test]
    fn xlsx_io_errors_use_the_same_mapping() {
        let err = ExportError::from_xlsx(
            Path::new("book.xlsx"),
            XlsxError::IoError(io::Error::from(io::ErrorKind::PermissionDenied)),
        );

        assert!(matches!(err, ExportError::Locked { .. }));
    }

    #[test]
    fn other_io_errors_keep_their_source() {
        let err = ExportError::from_io(
            Path::new("book.xlsx"),
            io::Error::from(io::ErrorKind::NotFound),
        );

        assert!(matches!(err, ExportError::Io { .. }));
    }
}
