//! Scripted end-to-end menu sessions.

use std::fs;
use std::path::Path;

use acct_cli::display::Style;
use acct_cli::utils::parse_amount;
use acct_cli::{App, Console, Settings};
use acct_core::FormatConfig;
use calamine::{Data, Reader, Xlsx, open_workbook};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn settings(test: &str) -> Settings {
    let mut settings = Settings::default();
    settings.export.directory =
        std::env::temp_dir().join(format!("acct-session-{}-{}", std::process::id(), test));
    let _ = fs::remove_dir_all(&settings.export.directory);
    settings
}

/// Runs a whole session; returns the app and the transcript.
fn session(
    settings: Settings,
    script: &str,
) -> (App, String) {
    let format = settings.format.clone();
    let mut app = App::new(settings);
    let mut input = script.as_bytes();
    let mut output = Vec::new();
    {
        let mut console = Console::new(&mut input, &mut output, format, Style::default());
        app.run(&mut console).unwrap();
    }
    (app, String::from_utf8(output).unwrap())
}

/// The value printed after `label` on its line.
fn printed_value(
    transcript: &str,
    label: &str,
) -> Decimal {
    let line = transcript
        .lines()
        .find(|line| line.contains(label))
        .unwrap_or_else(|| panic!("'{label}' not printed"));
    let rest = &line[line.find(label).unwrap() + label.len()..];
    let value = rest.trim().trim_end_matches('|').trim();
    parse_amount(value, &FormatConfig::default()).unwrap()
}

/// The number in `column` of the worksheet row whose first cell is `label`.
fn exported_value(
    path: &Path,
    sheet: &str,
    label: &str,
    column: usize,
) -> Decimal {
    let mut book: Xlsx<_> = open_workbook(path).unwrap();
    let range = book.worksheet_range(sheet).unwrap();
    let row = range
        .rows()
        .find(|row| matches!(row.first(), Some(Data::String(first)) if first == label))
        .unwrap_or_else(|| panic!("no row '{label}' in {sheet} of {}", path.display()));
    match &row[column] {
        Data::Float(value) => Decimal::try_from(*value).unwrap(),
        other => panic!("'{label}' column {column} is not a number: {other:?}"),
    }
}

#[test]
fn break_even_then_exit() {
    let script = "1\n1\n100\n60\n4000\nN\n3\n6\n";

    let (_, out) = session(settings("normal"), script);

    assert!(out.contains("Break-even point in units: 100.00"));
    assert!(out.contains("Break-even point in revenue: $10,000.00"));
    assert!(out.contains("Goodbye."));
}

#[test]
fn zero_margin_reports_division_by_zero_and_continues() {
    let script = "1\n1\n50\n50\n1000\nN\n3\n6\n";

    let (_, out) = session(settings("zero-margin"), script);

    assert!(out.contains("Error: division by zero"));
    assert!(!out.contains("Break-even point in units"));
    assert!(out.contains("Goodbye."));
}

#[test]
fn overflowing_break_even_reports_error_and_continues() {
    let script = "1\n1\n10000000000000\n9999999999999.99\n100000000000000000000\nN\n3\n6\n";

    let (_, out) = session(settings("overflow"), script);

    assert!(out.contains("Error: overflow: the amounts entered are too large to calculate"));
    assert!(!out.contains("Break-even point in units"));
    assert!(out.contains("Goodbye."));
}

#[test]
fn overweight_products_warn_and_export_matches_console() {
    let settings = settings("overweight");
    let dir = settings.export.directory.clone();
    // Lamp 70% (margin 10) and Mirror 50% (margin 12): weights total 120%.
    // Blended margin 7 + 6 = 13; 1,300 / 13 = 100 units.
    let script = "1\n2\n\
                  Lamp\n70\n25\n15\nY\n\
                  Mirror\n50\nY\n40\n28\nN\n\
                  1300\nY\nY\n6\n";

    let (_, out) = session(settings, script);

    assert!(out.contains("The weights entered add up to 120.00%, more than 100%"));
    assert_eq!(printed_value(&out, "Break-even point in units:"), dec!(100));

    let workbook = dir.join("break_even.xlsx");
    assert_eq!(exported_value(&workbook, "Break-even units", "Lamp", 3), dec!(70.00));
    assert_eq!(exported_value(&workbook, "Break-even units", "Mirror", 3), dec!(50.00));

    let total = exported_value(&workbook, "Break-even revenue", "Total", 3);
    assert_eq!(printed_value(&out, "Break-even point in revenue:"), total);
    assert_eq!(total, dec!(3750.00));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn declined_overweight_product_is_dropped() {
    let script = "1\n2\n\
                  Lamp\n70\n25\n15\nY\n\
                  Mirror\n50\nN\n\
                  700\nN\nY\n6\n";

    let (_, out) = session(settings("declined"), script);

    // Only Lamp remains: margin 10 * 0.7 = 7; 700 / 7 = 100.
    assert!(out.contains("Weighted contribution margin: $7.00"));
    assert!(out.contains("Break-even point in units: 100.00"));
    assert!(!out.contains("| Mirror"));
}

#[test]
fn production_budget_feeds_material_budget() {
    let settings = settings("chain");
    let dir = settings.export.directory.clone();
    let script = "4\n\
                  Alpha\n100\nY\n25\n20\n15\nN\n\
                  N\nY\n\
                  5\nY\nSteel\n2\n10\n0\n3\nN\nY\nY\n6\n";

    let (app, out) = session(settings, script);

    assert!(app.state().has_production());
    assert!(out.contains("Required production: 105.00 units"));
    // 105 * 2 + 10 = 220; 220 * 3 = 660.
    let path = dir.join("material_purchases_budget.xlsx");
    assert_eq!(exported_value(&path, "Material requirements", "Alpha", 7), dec!(220.00));
    assert_eq!(exported_value(&path, "Material requirements", "Alpha", 9), dec!(660.00));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn closed_input_mid_flow_ends_session() {
    let (_, out) = session(settings("eof"), "3\n50\n");

    assert!(out.contains("Unit variable cost: "));
    assert!(!out.contains("Goodbye."));
}
