use std::collections::BTreeSet;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use tfshift_core::summary::ResourceInstanceSummaries;

use crate::args::MoveArgs;
use crate::azure::az::AzCli;
use crate::azure::client::{ArmClient, MoveInfo};
use crate::cmd::plan::{self, PlanOut};
use crate::output;
use crate::terraform::Terraform;

const MOVE_DOCS: &str =
    "https://docs.microsoft.com/en-us/azure/azure-resource-manager/management/move-resource-group-and-subscription";

#[derive(Debug, Serialize)]
pub struct MoveOut {
    pub dry_run: bool,
    pub plan: PlanOut,
    pub deleted: Vec<String>,
    pub moved: Vec<String>,
    pub corrected: Vec<String>,
}

pub async fn run(args: &MoveArgs) -> Result<()> {
    if output::is_json() && !(args.auto_approve || args.dry_run) {
        bail!("--json requires --auto-approve or --dry-run");
    }

    let prepared = plan::prepare(&args.selection, &args.state).await?;
    let plan_out = PlanOut::new(&prepared.selection, &prepared.outcome)?;
    if !output::is_json() {
        plan::render(&plan_out)?;
    }

    let mut report = MoveOut {
        dry_run: args.dry_run,
        plan: plan_out,
        deleted: Vec::new(),
        moved: Vec::new(),
        corrected: Vec::new(),
    };

    if args.dry_run {
        if output::is_json() {
            output::print(&report)?;
        } else {
            println!();
            output::colored(output::GOOD, "Dry-run complete!")?;
            println!();
            println!("Resources are not moved to the specified resource group, but the resources which would be moved are visible above.");
        }
        return Ok(());
    }

    if !args.auto_approve && !confirm().await? {
        println!("\nMove is canceled");
        return Ok(());
    }

    let selection = &prepared.selection;
    let terraform = Terraform::new(args.state.chdir.as_deref()).with_vars(&args.vars, &args.var_files);
    let az = AzCli::new();

    let blocking_kinds: BTreeSet<String> = args.delete_before_move.iter().cloned().collect();
    let (blocking, summaries) = prepared.outcome.summaries.partition_blocking(&blocking_kinds);
    report.deleted = delete_blocking(&az, &terraform, &blocking).await?;

    let azure_ids = summaries.movable_on_azure();
    if !azure_ids.is_empty() {
        let source_group = prepared
            .outcome
            .source_resource_group
            .as_deref()
            .ok_or_else(|| anyhow!("source resource group could not be determined from the selection"))?;

        if !output::is_json() {
            println!();
            output::colored(output::GOOD, "Resources are on the move to the specified resource group.")?;
            println!("\nIt can take some time before this is done, don't panic!");
        }

        let token = az.access_token().await?;
        let client = ArmClient::new(&args.arm_endpoint, token)?;
        let info = MoveInfo::new(
            azure_ids.clone(),
            &selection.target_subscription,
            &selection.target_resource_group,
        );

        let pb = spinner("moving resources in Azure")?;
        let moved = client
            .move_resources(
                &selection.source_subscription,
                source_group,
                &info,
                Duration::from_secs(args.timeout_secs),
            )
            .await;
        pb.finish_and_clear();
        moved?;

        report.moved = azure_ids;
        if !output::is_json() {
            println!();
            output::colored(output::GOOD, "Resources are moved to the specified resource group.")?;
            println!();
        }
    }

    report.corrected = correct_state(&terraform, &summaries).await?;

    if output::is_json() {
        output::print(&report)?;
    } else {
        println!();
        output::colored(
            output::GOOD,
            "Congratulations! Resources are moved in Azure and corrected in Terraform.",
        )?;
        println!();
    }
    Ok(())
}

async fn confirm() -> Result<bool> {
    output::heading(output::WARN, "Can you confirm these resources should be moved?")?;
    println!("Check the Azure documentation on moving Azure resources ({MOVE_DOCS}) for all the details for your specific resources.");
    println!();
    output::colored(output::WARN, "Type 'yes' to confirm: ")?;

    let mut line = String::new();
    let read = BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .context("confirmation of the move errored out")?;
    if read == 0 {
        bail!("confirmation of the move errored out: no input on stdin");
    }
    Ok(line.trim_end() == "yes")
}

fn spinner(msg: &'static str) -> Result<ProgressBar> {
    if output::is_json() {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner} {msg} [{elapsed}]")?);
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_message(msg);
    Ok(pb)
}

/// Delete blocking resources in Azure and drop them from state; they are not
/// re-imported.
async fn delete_blocking(
    az: &AzCli,
    terraform: &Terraform,
    blocking: &ResourceInstanceSummaries,
) -> Result<Vec<String>> {
    if blocking.is_empty() {
        return Ok(Vec::new());
    }

    if !output::is_json() {
        output::heading(output::WARN, "Resources deleted before the move:")?;
    }

    let mut deleted = Vec::with_capacity(blocking.len());
    for s in blocking {
        az.delete_resource(&s.current_id)
            .await
            .with_context(|| format!("azure resource {} is not deleted", s.current_id))?;
        terraform
            .state_rm(&s.address)
            .await
            .with_context(|| format!("terraform resource {} is not removed", s.address))?;
        if !output::is_json() {
            output::bullet(&s.address);
        }
        deleted.push(s.address.clone());
    }
    Ok(deleted)
}

/// Remove every moved entry from state and import it again under its new id.
async fn correct_state(terraform: &Terraform, summaries: &ResourceInstanceSummaries) -> Result<Vec<String>> {
    let entries = summaries.to_correct_in_state();
    if !output::is_json() {
        println!("\nResources in Terraform state are enhanced:");
    }

    let mut corrected = Vec::with_capacity(entries.len());
    for (address, future_id) in entries {
        if !output::is_json() {
            output::bullet(&address);
        }

        terraform
            .state_rm(&address)
            .await
            .with_context(|| format!("terraform resource {address} is not removed"))?;
        if !output::is_json() {
            println!("\t✓ Removed");
        }

        terraform
            .import(&address, &future_id)
            .await
            .with_context(|| format!("terraform resource {address} is not imported"))?;
        if !output::is_json() {
            println!("\t✓ Imported");
        }

        info!(address = %address, id = %future_id, "corrected state entry");
        corrected.push(address);
    }
    Ok(corrected)
}
