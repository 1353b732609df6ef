pub mod export;
pub mod loader;

pub use export::{ExportError, ExportReport, WorkbookWriter};
pub use loader::{ProductLoader, ProductLoaderError, ProductRecord};
