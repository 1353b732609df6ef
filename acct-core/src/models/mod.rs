mod budget_lines;
mod product_line;
mod product_set;

pub use budget_lines::{InventoryPolicy, MaterialLine, ProductionRequirement, SalesLine};
pub use product_line::ProductLine;
pub use product_set::{Named, ProductSet, ProductSetError, WeightCheck};
