//! Main menu loop.

use std::ops::ControlFlow;

use anyhow::Result;
use tracing::{debug, info};

use crate::display::BoxLine;
use crate::flows;
use crate::prompt::{Console, PromptError, PromptResult};
use crate::settings::Settings;
use crate::state::AppState;

/// Main menu entries, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    BreakEven,
    TargetUnits,
    CostVolumeProfit,
    SalesProductionBudget,
    MaterialsBudget,
    Exit,
}

impl MenuAction {
    pub const ALL: [MenuAction; 6] = [
        Self::BreakEven,
        Self::TargetUnits,
        Self::CostVolumeProfit,
        Self::SalesProductionBudget,
        Self::MaterialsBudget,
        Self::Exit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::BreakEven => "Break-even point",
            Self::TargetUnits => "Units to sell before or after taxes",
            Self::CostVolumeProfit => "Cost-Volume-Profit analysis",
            Self::SalesProductionBudget => "Sales and production budget",
            Self::MaterialsBudget => "Raw-material requirements and purchases budget",
            Self::Exit => "Exit",
        }
    }

    /// The entry for a 1-based menu selection.
    pub fn from_choice(choice: usize) -> Option<Self> {
        choice.checked_sub(1).and_then(|idx| Self::ALL.get(idx).copied())
    }
}

pub struct App {
    settings: Settings,
    state: AppState,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            state: AppState::new(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Runs the main menu until the user exits or input ends.
    ///
    /// A flow returning [`PromptError::Cancelled`] lands back here; only
    /// terminal I/O failures are returned as errors.
    pub fn run(
        &mut self,
        console: &mut Console<'_>,
    ) -> Result<()> {
        console.banner(&[
            BoxLine::title("Accounting calculator"),
            BoxLine::text("Managerial accounting figures and budgets"),
        ])?;

        loop {
            match self.step(console) {
                Ok(ControlFlow::Continue(())) => {}
                Ok(ControlFlow::Break(())) => {
                    console.say("Goodbye.")?;
                    info!("exit selected");
                    return Ok(());
                }
                Err(PromptError::Cancelled) => debug!("flow cancelled; back to the main menu"),
                Err(PromptError::EndOfInput) => {
                    info!("input closed; exiting");
                    return Ok(());
                }
                Err(PromptError::Io(e)) => return Err(e.into()),
            }
        }
    }

    fn step(
        &mut self,
        console: &mut Console<'_>,
    ) -> PromptResult<ControlFlow<()>> {
        let labels = MenuAction::ALL.map(|action| action.label());
        let choice = console.menu("Main menu", &labels)?;
        let action = MenuAction::from_choice(choice).unwrap_or(MenuAction::Exit);
        debug!(?action, "main menu selection");

        match action {
            MenuAction::BreakEven => flows::break_even::menu(console, &self.settings)?,
            MenuAction::TargetUnits => flows::target_units::menu(console, &self.settings)?,
            MenuAction::CostVolumeProfit => flows::cvu::run(console, &self.settings)?,
            MenuAction::SalesProductionBudget => {
                flows::budgets::run(console, &self.settings, &mut self.state)?
            }
            MenuAction::MaterialsBudget => {
                flows::materials::run(console, &self.settings, &self.state)?
            }
            MenuAction::Exit => return Ok(ControlFlow::Break(())),
        }
        Ok(ControlFlow::Continue(()))
    }
}
