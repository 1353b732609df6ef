//! One module per main-menu option.
//!
//! A flow prompts for its inputs, runs the calculation, prints the results
//! and offers an export. Any prompt may yield
//! [`PromptError::Cancelled`](crate::prompt::PromptError::Cancelled); flows
//! pass it up with `?` and never print partial results.

pub mod break_even;
pub mod budgets;
pub mod cvu;
pub mod export;
pub mod materials;
pub mod products;
pub mod target_units;

use crate::prompt::{Console, PromptResult};
use crate::settings::Settings;

/// Pause configured to precede printed results.
pub(crate) fn before_results(
    console: &mut Console<'_>,
    settings: &Settings,
) -> PromptResult<()> {
    console.pause(settings.result_delay())
}

/// Last step of every flow: stay in the submenu or go back to the main menu.
pub(crate) fn finish(console: &mut Console<'_>) -> PromptResult<()> {
    console.offer_return()
}
