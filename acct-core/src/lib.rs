pub mod calculations;
pub mod models;
pub mod report;

pub use models::*;
pub use report::{Cell, FormatConfig, Sheet, Workbook};
