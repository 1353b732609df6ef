use acct_core::calculations::{Adjustment, CvuBaseline, CvuField, Proposal, ScenarioSet};
use tracing::warn;

use crate::display::BoxLine;
use crate::flows::{before_results, export::offer_export, finish};
use crate::prompt::{Bounds, Console, PromptResult};
use crate::settings::Settings;

const MAX_PROPOSALS: u32 = 10;

const OPERATIONS: [&str; 5] = [
    "Increase by percent",
    "Increase by amount",
    "Decrease by percent",
    "Decrease by amount",
    "Keep unchanged",
];

pub fn run(
    console: &mut Console<'_>,
    settings: &Settings,
) -> PromptResult<()> {
    console.banner(&[BoxLine::title("Cost-Volume-Profit analysis: actual scenario")])?;
    let baseline = CvuBaseline {
        unit_price: console.number("Unit sale price: ", Bounds::NON_NEGATIVE)?,
        unit_variable_cost: console.number("Unit variable cost: ", Bounds::NON_NEGATIVE)?,
        fixed_cost: console.number("Fixed cost: ", Bounds::NON_NEGATIVE)?,
        volume: console.number("Sales volume (units): ", Bounds::NON_NEGATIVE)?,
    };

    let count = console.whole_number(
        &format!("How many proposals do you want to compare (1-{MAX_PROPOSALS})? "),
        1,
        MAX_PROPOSALS,
    )?;

    let mut scenarios = ScenarioSet::new(baseline);
    for idx in 1..=count {
        let proposal = read_proposal(console, &scenarios.baseline, idx)?;
        scenarios.push(proposal);
    }

    before_results(console, settings)?;
    let mut summary = vec![BoxLine::title("Proposals"), BoxLine::Separator];
    for proposal in &scenarios.proposals {
        let changes: Vec<String> = CvuField::ALL
            .iter()
            .map(|&field| format!("{} {}", field.label(), proposal.adjustment(field)))
            .collect();
        summary.push(BoxLine::text(format!("{}: {}", proposal.name, changes.join(", "))));
    }
    console.banner(&summary)?;

    match scenarios.compare() {
        Ok(outcomes) => {
            let workbook = ScenarioSet::workbook(&outcomes);
            for sheet in workbook.sheets() {
                console.table(sheet)?;
            }
            offer_export(console, settings, &workbook)?;
        }
        Err(e) => {
            warn!(error = %e, "cvu comparison failed");
            console.error(&e.to_string())?;
        }
    }

    finish(console)
}

fn read_proposal(
    console: &mut Console<'_>,
    baseline: &CvuBaseline,
    idx: u32,
) -> PromptResult<Proposal> {
    let mut proposal = Proposal::new(format!("Proposal {idx}"));
    for field in CvuField::ALL {
        let current = match field {
            CvuField::Volume => console.format().number(baseline.get(field)),
            _ => console.format().currency(baseline.get(field)),
        };
        let title = format!("{}: {} (actual {})", proposal.name, field.label(), current);
        let adjustment = match console.menu(&title, &OPERATIONS)? {
            1 => Adjustment::IncreasePercent(console.number("Percent: ", Bounds::NON_NEGATIVE)?),
            2 => Adjustment::IncreaseAmount(console.number("Amount: ", Bounds::NON_NEGATIVE)?),
            3 => Adjustment::DecreasePercent(console.number("Percent: ", Bounds::PERCENT)?),
            4 => Adjustment::DecreaseAmount(console.number("Amount: ", Bounds::NON_NEGATIVE)?),
            _ => Adjustment::Unchanged,
        };
        proposal.set(field, adjustment);
    }
    Ok(proposal)
}
