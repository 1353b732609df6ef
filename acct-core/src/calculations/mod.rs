//! Managerial-accounting calculators.
//!
//! Each calculator is a pure function of its inputs and returns a typed
//! result that can describe itself as report sheets.

pub mod allocation;
pub mod break_even;
pub mod budgets;
pub mod common;
pub mod cvu;
pub mod materials;
pub mod target_units;

pub use allocation::{ProductAllocation, WeightedMargin};
pub use break_even::{
    BreakEven, BreakEvenError, BreakEvenInput, BreakEvenResult, MultiLineBreakEven,
    MultiLineBreakEvenResult,
};
pub use budgets::{BudgetError, ProductionBudget, ProductionRow, SalesBudget, SalesBudgetRow};
pub use cvu::{
    Adjustment, CvuBaseline, CvuError, CvuField, Proposal, ScenarioOutcome, ScenarioSet,
};
pub use materials::{MaterialBudget, MaterialRequirementRow};
pub use target_units::{
    MultiLineTargetUnits, MultiLineTargetUnitsResult, TargetUnits, TargetUnitsError,
    TargetUnitsInput, TargetUnitsResult, TaxTreatment,
};
