//! Cost-Volume-Profit scenario comparison.
//!
//! A baseline ("Actual") record is compared against any number of proposals.
//! Each proposal adjusts the baseline field by field, independently, and
//! every scenario derives:
//!
//! | Figure | Formula |
//! |--------|---------|
//! | Revenue | `volume * unit_price` |
//! | Variable cost | `volume * unit_variable_cost` |
//! | Contribution margin | `revenue - variable cost` |
//! | Operating profit | `contribution margin - fixed cost` |
//! | Change in operating profit | `profit - baseline profit` |

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::calculations::common::{Overflow, add, apply_percent, multiply, subtract};
use crate::report::{Cell, Sheet, Workbook};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CvuError {
    /// A scenario figure does not fit in a [`Decimal`].
    #[error("overflow: the amounts in '{scenario}' are too large to calculate")]
    Overflow { scenario: String },
}

impl CvuError {
    fn overflow(scenario: &str) -> impl FnOnce(Overflow) -> Self + '_ {
        move |_| Self::Overflow {
            scenario: scenario.to_string(),
        }
    }
}

/// The baseline fields a proposal may adjust.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CvuField {
    UnitPrice,
    UnitVariableCost,
    FixedCost,
    Volume,
}

impl CvuField {
    pub const ALL: [CvuField; 4] = [
        Self::UnitPrice,
        Self::UnitVariableCost,
        Self::FixedCost,
        Self::Volume,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::UnitPrice => "Unit sale price",
            Self::UnitVariableCost => "Unit variable cost",
            Self::FixedCost => "Fixed cost",
            Self::Volume => "Sales volume",
        }
    }
}

/// How a proposal changes one baseline value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Adjustment {
    IncreasePercent(Decimal),
    IncreaseAmount(Decimal),
    DecreasePercent(Decimal),
    DecreaseAmount(Decimal),
    #[default]
    Unchanged,
}

impl Adjustment {
    pub fn apply(
        &self,
        base: Decimal,
    ) -> Result<Decimal, Overflow> {
        match *self {
            Self::IncreasePercent(p) => apply_percent(base, p),
            Self::IncreaseAmount(a) => add(base, a),
            Self::DecreasePercent(p) => apply_percent(base, -p),
            Self::DecreaseAmount(a) => subtract(base, a),
            Self::Unchanged => Ok(base),
        }
    }
}

impl fmt::Display for Adjustment {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::IncreasePercent(p) => write!(f, "+{p}%"),
            Self::IncreaseAmount(a) => write!(f, "+{a}"),
            Self::DecreasePercent(p) => write!(f, "-{p}%"),
            Self::DecreaseAmount(a) => write!(f, "-{a}"),
            Self::Unchanged => write!(f, "unchanged"),
        }
    }
}

/// The "actual" scenario every proposal starts from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CvuBaseline {
    pub unit_price: Decimal,
    pub unit_variable_cost: Decimal,
    pub fixed_cost: Decimal,
    pub volume: Decimal,
}

impl CvuBaseline {
    pub fn get(
        &self,
        field: CvuField,
    ) -> Decimal {
        match field {
            CvuField::UnitPrice => self.unit_price,
            CvuField::UnitVariableCost => self.unit_variable_cost,
            CvuField::FixedCost => self.fixed_cost,
            CvuField::Volume => self.volume,
        }
    }
}

/// A named set of per-field adjustments. Fields without an entry are unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub name: String,
    adjustments: BTreeMap<CvuField, Adjustment>,
}

impl Proposal {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            adjustments: BTreeMap::new(),
        }
    }

    pub fn with(
        mut self,
        field: CvuField,
        adjustment: Adjustment,
    ) -> Self {
        self.set(field, adjustment);
        self
    }

    pub fn set(
        &mut self,
        field: CvuField,
        adjustment: Adjustment,
    ) {
        self.adjustments.insert(field, adjustment);
    }

    pub fn adjustment(
        &self,
        field: CvuField,
    ) -> Adjustment {
        self.adjustments.get(&field).copied().unwrap_or_default()
    }

    /// The baseline with this proposal's adjustments applied.
    pub fn apply(
        &self,
        baseline: &CvuBaseline,
    ) -> Result<CvuBaseline, Overflow> {
        let value = |field| self.adjustment(field).apply(baseline.get(field));
        Ok(CvuBaseline {
            unit_price: value(CvuField::UnitPrice)?,
            unit_variable_cost: value(CvuField::UnitVariableCost)?,
            fixed_cost: value(CvuField::FixedCost)?,
            volume: value(CvuField::Volume)?,
        })
    }
}

/// Derived figures for one scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub name: String,
    pub values: CvuBaseline,
    pub revenue: Decimal,
    pub variable_cost: Decimal,
    pub contribution_margin: Decimal,
    pub operating_profit: Decimal,
    /// Operating profit relative to the baseline; zero for the baseline.
    pub profit_change: Decimal,
}

impl ScenarioOutcome {
    fn derive(
        name: &str,
        values: CvuBaseline,
        baseline_profit: Option<Decimal>,
    ) -> Result<Self, Overflow> {
        let revenue = multiply(values.volume, values.unit_price)?;
        let variable_cost = multiply(values.volume, values.unit_variable_cost)?;
        let contribution_margin = subtract(revenue, variable_cost)?;
        let operating_profit = subtract(contribution_margin, values.fixed_cost)?;
        let profit_change = match baseline_profit {
            Some(baseline) => subtract(operating_profit, baseline)?,
            None => Decimal::ZERO,
        };
        Ok(Self {
            name: name.to_string(),
            values,
            revenue,
            variable_cost,
            contribution_margin,
            operating_profit,
            profit_change,
        })
    }
}

/// A baseline plus its proposals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioSet {
    pub baseline: CvuBaseline,
    pub proposals: Vec<Proposal>,
}

impl ScenarioSet {
    pub const BASELINE_NAME: &'static str = "Actual";

    pub fn new(baseline: CvuBaseline) -> Self {
        Self {
            baseline,
            proposals: Vec::new(),
        }
    }

    pub fn push(
        &mut self,
        proposal: Proposal,
    ) {
        self.proposals.push(proposal);
    }

    /// Outcomes for the baseline followed by each proposal, in entry order.
    ///
    /// # Errors
    ///
    /// Returns [`CvuError::Overflow`] naming the first scenario whose figures
    /// do not fit.
    pub fn compare(&self) -> Result<Vec<ScenarioOutcome>, CvuError> {
        let actual = ScenarioOutcome::derive(Self::BASELINE_NAME, self.baseline.clone(), None)
            .map_err(CvuError::overflow(Self::BASELINE_NAME))?;
        let baseline_profit = actual.operating_profit;

        let mut outcomes = Vec::with_capacity(self.proposals.len() + 1);
        outcomes.push(actual);
        for proposal in &self.proposals {
            let outcome = proposal
                .apply(&self.baseline)
                .and_then(|values| {
                    ScenarioOutcome::derive(&proposal.name, values, Some(baseline_profit))
                })
                .map_err(CvuError::overflow(&proposal.name))?;
            outcomes.push(outcome);
        }
        debug!(scenarios = outcomes.len(), "cvu scenarios compared");
        Ok(outcomes)
    }

    /// Side-by-side table: one row per figure, one column per scenario.
    pub fn comparison_sheet(outcomes: &[ScenarioOutcome]) -> Sheet {
        let mut headers = vec!["Concept".to_string()];
        headers.extend(outcomes.iter().map(|o| o.name.clone()));
        let mut sheet = Sheet::new("Scenario comparison", headers);

        let rows: [(&str, fn(&ScenarioOutcome) -> Cell); 8] = [
            ("Unit sale price", |o| Cell::Currency(o.values.unit_price)),
            ("Unit variable cost", |o| {
                Cell::Currency(o.values.unit_variable_cost)
            }),
            ("Sales volume", |o| Cell::Number(o.values.volume)),
            ("Revenue", |o| Cell::Currency(o.revenue)),
            ("Variable cost", |o| Cell::Currency(o.variable_cost)),
            ("Contribution margin", |o| {
                Cell::Currency(o.contribution_margin)
            }),
            ("Fixed cost", |o| Cell::Currency(o.values.fixed_cost)),
            ("Operating profit", |o| Cell::Currency(o.operating_profit)),
        ];
        for (label, cell) in rows {
            let mut row = vec![Cell::from(label)];
            row.extend(outcomes.iter().map(cell));
            sheet.push_row(row);
        }

        let mut change = vec![Cell::from("Change in operating profit")];
        change.extend(outcomes.iter().map(|o| Cell::Currency(o.profit_change)));
        sheet.push_row(change);

        sheet
    }

    /// The `cvu_analysis` workbook.
    pub fn workbook(outcomes: &[ScenarioOutcome]) -> Workbook {
        Workbook::new("cvu_analysis").with_sheet(Self::comparison_sheet(outcomes))
    }
}
