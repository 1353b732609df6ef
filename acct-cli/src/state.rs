//! State kept across menu flows for the life of the process.

use acct_core::ProductionRequirement;
use acct_core::calculations::ProductionBudget;

/// Results one flow leaves for another.
///
/// Nothing here is persisted; it is dropped when the program exits.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Last production budget computed in the sales and production flow.
    /// The raw-material flow offers to reuse it.
    pub production: Option<ProductionBudget>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_production(&self) -> bool {
        self.production.is_some()
    }

    pub fn production_requirements(&self) -> Option<Vec<ProductionRequirement>> {
        self.production.as_ref().map(ProductionBudget::requirements)
    }
}
