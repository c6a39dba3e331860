use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use tfshift_core::config::{SelectionConfig, UnresolvedGroupPolicy};
use tfshift_core::select::{Selection, Selector};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "tfshift",
    version,
    about = "Move Azure resources to another resource group and correct Terraform state"
)]
pub struct Cli {
    /// Emit JSON output on stdout.
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable coloured output.
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show which resources would be moved in Azure and corrected in state.
    Plan {
        #[command(flatten)]
        selection: SelectionArgs,

        #[command(flatten)]
        state: StateArgs,

        /// Also write the plan as JSON to this file.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Move resources in Azure and correct Terraform state.
    Move(MoveArgs),

    /// Run environment checks.
    Doctor,
}

#[derive(Args, Debug, Clone)]
pub struct SelectionArgs {
    /// Terraform resource to be moved, e.g. "module.storage.azurerm_storage_account.example".
    #[arg(long, default_value = "*")]
    pub resource: String,

    /// Terraform module to be moved, e.g. "module.storage".
    #[arg(long, default_value = "*")]
    pub module: String,

    /// Azure resource group to be moved, e.g. "example-source-resource-group".
    #[arg(long, default_value = "*")]
    pub resource_group: String,

    /// Subscription where the resources currently are.
    #[arg(long = "subscription-id", env = "ARM_SUBSCRIPTION_ID")]
    pub subscription_id: String,

    /// Resource group the resources are moved to.
    #[arg(long)]
    pub target_resource_group: String,

    /// Subscription the resources are moved to. Defaults to the source subscription.
    #[arg(long = "target-subscription-id")]
    pub target_subscription_id: Option<String>,

    /// Leave unsupported resources without a resolvable resource group out of the plan.
    #[arg(long)]
    pub skip_unresolved_unsupported: bool,
}

impl SelectionArgs {
    pub fn target_subscription(&self) -> &str {
        match self.target_subscription_id.as_deref() {
            Some(t) if !t.trim().is_empty() => t,
            _ => &self.subscription_id,
        }
    }

    pub fn is_cross_subscription(&self) -> bool {
        self.target_subscription() != self.subscription_id
    }

    pub fn to_selection(&self) -> Selection {
        Selection {
            resource: Selector::parse(&self.resource),
            module: Selector::parse(&self.module),
            resource_group: Selector::parse(&self.resource_group),
            source_subscription: self.subscription_id.clone(),
            target_resource_group: self.target_resource_group.clone(),
            target_subscription: self.target_subscription().to_string(),
        }
    }

    pub fn to_config(&self) -> SelectionConfig {
        let unresolved_group_policy = if self.skip_unresolved_unsupported {
            UnresolvedGroupPolicy::Skip
        } else {
            UnresolvedGroupPolicy::Include
        };
        SelectionConfig {
            unresolved_group_policy,
            ..SelectionConfig::default()
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct StateArgs {
    /// Read Terraform state from this file instead of `terraform state pull`.
    #[arg(long)]
    pub state: Option<PathBuf>,

    /// Directory to run Terraform commands in.
    #[arg(long)]
    pub chdir: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct MoveArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    #[command(flatten)]
    pub state: StateArgs,

    /// Skip the confirmation prompt.
    #[arg(long)]
    pub auto_approve: bool,

    /// Only show which resources would be moved.
    #[arg(long)]
    pub dry_run: bool,

    /// Terraform variable for `terraform import`, e.g. --var 'name=value'. Repeatable.
    #[arg(long = "var", value_parser = parse_var)]
    pub vars: Vec<String>,

    /// Terraform variable file for `terraform import`. Repeatable.
    #[arg(long = "var-file")]
    pub var_files: Vec<PathBuf>,

    /// Resource type to delete in Azure (and drop from state) before moving. Repeatable.
    #[arg(long = "delete-before-move", value_name = "KIND")]
    pub delete_before_move: Vec<String>,

    /// Seconds to wait for Azure to finish the move.
    #[arg(long, default_value_t = 300)]
    pub timeout_secs: u64,

    /// Azure Resource Manager endpoint.
    #[arg(
        long,
        env = "TFSHIFT_ARM_ENDPOINT",
        default_value = "https://management.azure.com"
    )]
    pub arm_endpoint: String,
}

fn parse_var(s: &str) -> Result<String, String> {
    match s.find('=') {
        Some(idx) if idx > 0 => Ok(s.to_string()),
        _ => Err(format!("no '=' value in arg: {s}")),
    }
}
