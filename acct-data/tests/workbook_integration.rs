//! Integration tests that load products from on-disk fixtures, run the
//! multi-line calculators and export the resulting workbooks.

use std::fs;
use std::path::{Path, PathBuf};

use acct_core::FormatConfig;
use acct_core::calculations::{
    MultiLineBreakEven, MultiLineTargetUnits, TargetUnitsInput, TaxTreatment,
};
use acct_data::{ProductLoader, ProductLoaderError, WorkbookWriter};
use calamine::{Data, Reader, Xlsx, open_workbook};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn scratch_dir(test: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("acct-data-it-{}-{}", std::process::id(), test));
    let _ = fs::remove_dir_all(&dir);
    dir
}

fn read_sheet(
    path: &Path,
    sheet: &str,
) -> Vec<Vec<Data>> {
    let mut book: Xlsx<_> = open_workbook(path).unwrap();
    let range = book.worksheet_range(sheet).unwrap();
    range.rows().map(<[Data]>::to_vec).collect()
}

fn text(value: &str) -> Data {
    Data::String(value.to_string())
}

#[test]
fn test_load_fixture_products() {
    let products = ProductLoader::load_path(&fixture("products.csv")).unwrap();

    assert_eq!(products.names(), vec!["Desk", "Shelf"]);
    assert_eq!(products.get("Shelf").unwrap().contribution_margin(), dec!(30));
}

#[test]
fn test_break_even_workbook_export() {
    let products = ProductLoader::load_path(&fixture("products.csv")).unwrap();
    let result = MultiLineBreakEven::new(&products)
        .calculate(dec!(2400))
        .unwrap();
    let dir = scratch_dir("break-even");

    let report = WorkbookWriter::new(&dir, FormatConfig::default())
        .write(&result.workbook(&products))
        .unwrap();

    assert_eq!(report.path, dir.join("break_even.xlsx"));
    assert_eq!(report.sheets, 4);
    let book: Xlsx<_> = open_workbook(&report.path).unwrap();
    assert_eq!(
        book.sheet_names(),
        vec!["Input data", "Weighted margin", "Break-even units", "Break-even revenue"]
    );
    let units = read_sheet(&report.path, "Break-even units");
    assert_eq!(
        units,
        vec![
            vec![
                text("Product"),
                text("Contribution weight"),
                text("Total units"),
                text("Product units"),
            ],
            vec![text("Desk"), Data::Float(60.0), Data::Float(100.0), Data::Float(60.0)],
            vec![text("Shelf"), Data::Float(40.0), Data::Float(100.0), Data::Float(40.0)],
        ]
    );
    let revenue = read_sheet(&report.path, "Break-even revenue");
    assert_eq!(
        revenue.last().unwrap(),
        &vec![text("Total"), Data::Float(100.0), Data::Empty, Data::Float(6200.0)]
    );

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_target_units_workbook_export() {
    let products = ProductLoader::load_path(&fixture("products.csv")).unwrap();
    let input = TargetUnitsInput {
        fixed_cost: dec!(2000),
        desired_profit: dec!(280),
        tax: TaxTreatment::PostTax {
            rate_percent: dec!(30),
        },
    };
    let result = MultiLineTargetUnits::new(&products)
        .calculate(&input)
        .unwrap();
    let dir = scratch_dir("target-units");

    let report = WorkbookWriter::new(&dir, FormatConfig::default())
        .write(&result.workbook(&products))
        .unwrap();

    // 280 / 0.7 = 400; (2000 + 400) / 24 = 100
    assert_eq!(result.target.units, dec!(100));
    assert_eq!(report.path, dir.join("target_units.xlsx"));
    let allocation = read_sheet(&report.path, "Target allocation");
    assert_eq!(
        allocation[1],
        vec![
            text("Desk"),
            Data::Float(60.0),
            Data::Float(100.0),
            Data::Float(60.0),
            Data::Float(50.0),
            Data::Float(3000.0),
        ]
    );

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_overweight_fixture_loads_without_normalizing() {
    let products = ProductLoader::load_path(&fixture("overweight_products.csv")).unwrap();

    assert_eq!(products.weight_total(), dec!(120));
    let result = MultiLineBreakEven::new(&products)
        .calculate(dec!(1300))
        .unwrap();
    // Blended margin: 10 * 0.7 + 12 * 0.5 = 13
    assert_eq!(result.blended_margin, dec!(13));
    assert_eq!(result.units, dec!(100));
    assert_eq!(result.allocated_units, dec!(120));
}

#[test]
fn test_load_nonexistent_file_returns_err() {
    let path = fixture("missing_products.csv");

    let err = ProductLoader::load_path(&path).unwrap_err();

    assert!(matches!(err, ProductLoaderError::Open { .. }));
    assert!(err.to_string().contains("missing_products.csv"));
}
