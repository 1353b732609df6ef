//! CSV loader for product lines.
//!
//! ## CSV Format
//!
//! Headers are matched by name; column order does not matter.
//!
//! | Column               | Type    | Notes |
//! |----------------------|---------|-------|
//! | `name`               | string  | Unique within the file |
//! | `weight`             | decimal | Participation percentage, 0-100 |
//! | `unit_price`         | decimal | Must not be negative |
//! | `unit_variable_cost` | decimal | Must not be negative |
//!
//! ```csv
//! name,weight,unit_price,unit_variable_cost
//! Desk,60,50.00,30.00
//! Shelf,40,80.00,50.00
//! ```

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use acct_core::{ProductLine, ProductSet, ProductSetError};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading product lines.
#[derive(Debug, Error)]
pub enum ProductLoaderError {
    #[error("cannot open '{}': {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("product '{0}' appears more than once")]
    DuplicateProduct(String),

    #[error("product '{product}' has weight {weight}; expected 0 to 100")]
    InvalidWeight { product: String, weight: Decimal },

    #[error("product '{product}' has a negative {field}: {value}")]
    NegativeAmount {
        product: String,
        field: &'static str,
        value: Decimal,
    },
}

impl From<ProductSetError> for ProductLoaderError {
    fn from(err: ProductSetError) -> Self {
        match err {
            ProductSetError::DuplicateName(name) => Self::DuplicateProduct(name),
        }
    }
}

/// A single row of the products CSV file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ProductRecord {
    pub name: String,
    pub weight: Decimal,
    pub unit_price: Decimal,
    pub unit_variable_cost: Decimal,
}

impl ProductRecord {
    fn validate(&self) -> Result<(), ProductLoaderError> {
        if self.weight < Decimal::ZERO || self.weight > Decimal::ONE_HUNDRED {
            return Err(ProductLoaderError::InvalidWeight {
                product: self.name.clone(),
                weight: self.weight,
            });
        }
        for (field, value) in [
            ("unit price", self.unit_price),
            ("unit variable cost", self.unit_variable_cost),
        ] {
            if value < Decimal::ZERO {
                return Err(ProductLoaderError::NegativeAmount {
                    product: self.name.clone(),
                    field,
                    value,
                });
            }
        }
        Ok(())
    }
}

/// Loader for product lines from CSV files.
pub struct ProductLoader;

impl ProductLoader {
    /// Parse product records from a CSV reader, in file order.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<ProductRecord>, ProductLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut records = Vec::new();
        for result in csv_reader.deserialize() {
            let record: ProductRecord = result?;
            records.push(record);
        }
        Ok(records)
    }

    /// Validate records and collect them into a [`ProductSet`].
    ///
    /// The weight total is not checked here; a total over 100 is a warning the
    /// caller decides on.
    pub fn product_set(records: Vec<ProductRecord>) -> Result<ProductSet, ProductLoaderError> {
        let mut set = ProductSet::new();
        for record in records {
            record.validate()?;
            set.push(ProductLine::new(
                record.name,
                record.weight,
                record.unit_price,
                record.unit_variable_cost,
            ))?;
        }
        Ok(set)
    }

    /// Parse and validate in one step.
    pub fn load<R: Read>(reader: R) -> Result<ProductSet, ProductLoaderError> {
        Self::product_set(Self::parse(reader)?)
    }

    /// [`load`](Self::load) from a file on disk.
    pub fn load_path(path: &Path) -> Result<ProductSet, ProductLoaderError> {
        let file = File::open(path).map_err(|source| ProductLoaderError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::load(file)
    }
}
