use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use tracing::debug;

use tfshift_core::classify::MoveClass;
use tfshift_core::select::{Selection, SelectionOutcome};
use tfshift_core::summary::ResourceInstanceSummary;

use crate::args::{SelectionArgs, StateArgs};
use crate::io::{export, input};
use crate::output;

#[derive(Debug, Clone, Serialize)]
pub struct PlanOut {
    pub generated_at: String,
    pub source_subscription: String,
    pub target_subscription: String,
    pub source_resource_group: Option<String>,
    pub target_resource_group: String,
    pub not_supported: Vec<String>,
    pub movable_on_azure: Vec<String>,
    pub moved_with_parent: Vec<String>,
    pub data_sources: Vec<String>,
    pub to_correct_in_state: BTreeMap<String, String>,
    pub instances: Vec<PlanInstance>,
}

/// One selected instance with its move class.
#[derive(Debug, Clone, Serialize)]
pub struct PlanInstance {
    #[serde(flatten)]
    pub summary: ResourceInstanceSummary,
    pub move_class: MoveClass,
}

impl PlanOut {
    pub fn new(selection: &Selection, outcome: &SelectionOutcome) -> Result<Self> {
        let s = &outcome.summaries;
        Ok(Self {
            generated_at: time::OffsetDateTime::now_utc().format(&Rfc3339)?,
            source_subscription: selection.source_subscription.clone(),
            target_subscription: selection.target_subscription.clone(),
            source_resource_group: outcome.source_resource_group.clone(),
            target_resource_group: selection.target_resource_group.clone(),
            not_supported: s.not_supported(),
            movable_on_azure: s.movable_on_azure(),
            moved_with_parent: s.moved_with_parent(),
            data_sources: s.data_sources(),
            to_correct_in_state: s.to_correct_in_state(),
            instances: s
                .iter()
                .map(|summary| PlanInstance {
                    move_class: summary.move_class(),
                    summary: summary.clone(),
                })
                .collect(),
        })
    }
}

/// Selection plus the outcome of running it against the current state.
#[derive(Debug, Clone)]
pub struct Prepared {
    pub selection: Selection,
    pub outcome: SelectionOutcome,
}

pub async fn prepare(args: &SelectionArgs, state: &StateArgs) -> Result<Prepared> {
    if !output::is_json() {
        announce_subscriptions(args);
    }

    let tfstate = input::load_state(state).await?;
    let selection = args.to_selection();
    let outcome = tfstate.select(&selection, &args.to_config())?;
    for s in outcome.summaries.iter() {
        debug!(address = %s.address, class = s.move_class().as_str(), "selected");
    }
    Ok(Prepared { selection, outcome })
}

fn announce_subscriptions(args: &SelectionArgs) {
    if args.is_cross_subscription() {
        println!("Target subscription specified, move will be to a different subscription:");
    } else {
        println!("No unique \"--target-subscription-id\" specified, move will be within the same subscription:");
    }
    println!(" {} -> {}", args.subscription_id, args.target_subscription());
}

/// Human-readable plan.
pub fn render(plan: &PlanOut) -> Result<()> {
    output::list(output::WARN, "Resources not supported for movement:", &plan.not_supported)?;
    output::list(output::AZURE, "Resources to be moved in Azure:", &plan.movable_on_azure)?;
    if !plan.moved_with_parent.is_empty() {
        output::list(output::AZURE, "Resources moved along with their parent:", &plan.moved_with_parent)?;
    }
    if !plan.data_sources.is_empty() {
        output::list(output::WARN, "Data sources left to Terraform refresh:", &plan.data_sources)?;
    }
    output::heading(output::GOOD, "Resources to be corrected in Terraform:")?;
    for (address, id) in &plan.to_correct_in_state {
        output::bullet(&format!("{address}: [id={id}]"));
    }
    Ok(())
}

pub async fn run(args: &SelectionArgs, state: &StateArgs, out: Option<&Path>) -> Result<()> {
    let prepared = prepare(args, state).await?;
    let plan = PlanOut::new(&prepared.selection, &prepared.outcome)?;

    if output::is_json() {
        output::print(&plan)?;
    } else {
        render(&plan)?;
    }

    if let Some(path) = out {
        export::write_json(path, &plan)?;
    }
    Ok(())
}
