use acct_core::Workbook;
use acct_data::{ExportReport, WorkbookWriter};
use tracing::warn;

use crate::prompt::{Console, PromptResult};
use crate::settings::Settings;

/// Asks whether to export `workbook` and writes it if so.
///
/// A failed export is reported and the flow carries on; only prompt errors
/// are returned.
pub fn offer_export(
    console: &mut Console<'_>,
    settings: &Settings,
    workbook: &Workbook,
) -> PromptResult<Option<ExportReport>> {
    if !console.confirm("Export the results to a spreadsheet?")? {
        return Ok(None);
    }

    let writer = WorkbookWriter::new(&settings.export.directory, settings.format.clone());
    match writer.write(workbook) {
        Ok(report) => {
            console.say(&format!(
                "Results exported to {} ({} sheets)",
                report.path.display(),
                report.sheets
            ))?;
            Ok(Some(report))
        }
        Err(e) => {
            warn!(workbook = workbook.name(), error = %e, "export failed");
            console.error(&format!("the export failed: {e}"))?;
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use acct_core::{Cell, Sheet};
    use rust_decimal_macros::dec;

    use super::*;
    use crate::flows::testing;

    fn workbook() -> Workbook {
        let mut sheet = Sheet::new("Summary", ["Concept", "Value"]);
        sheet.push_row(vec!["Units".into(), Cell::Number(dec!(100))]);
        Workbook::new("break_even").with_sheet(sheet)
    }

    #[test]
    fn declining_writes_nothing() {
        let settings = testing::settings("export-decline");

        let (result, _) = testing::run("N\n", |c| offer_export(c, &settings, &workbook()));

        assert!(result.unwrap().is_none());
        assert!(!settings.export.directory.exists());
    }

    #[test]
    fn accepting_writes_workbook() {
        let settings = testing::settings("export-accept");

        let (result, out) = testing::run("Y\n", |c| offer_export(c, &settings, &workbook()));

        let report = result.unwrap().unwrap();
        assert_eq!(report.path, settings.export.directory.join("break_even.xlsx"));
        assert_eq!(report.sheets, 1);
        assert!(report.path.is_file());
        assert!(out.contains("Results exported to"));
        assert!(out.contains("(1 sheets)"));
        let _ = std::fs::remove_dir_all(&settings.export.directory);
    }

    #[test]
    fn failed_export_is_reported_and_flow_continues() {
        let mut settings = testing::settings("export-fail");
        // A regular file where the export directory should be.
        std::fs::write(&settings.export.directory, "not a directory").unwrap();
        let blocker = settings.export.directory.clone();
        settings.export.directory = blocker.join("nested");

        let (result, out) = testing::run("Y\n", |c| offer_export(c, &settings, &workbook()));

        assert!(result.unwrap().is_none());
        assert!(out.contains("Error: the export failed"));
        let _ = std::fs::remove_file(&blocker);
    }
}
