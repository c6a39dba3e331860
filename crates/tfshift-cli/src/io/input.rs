use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use tfshift_core::model::TerraformState;
use tfshift_core::parse::{parse_state_bytes, DEFAULT_MAX_STATE_BYTES};

use crate::args::StateArgs;
use crate::terraform::Terraform;

/// Load Terraform state from `--state` if given, otherwise from
/// `terraform state pull`.
pub async fn load_state(args: &StateArgs) -> Result<TerraformState> {
    let bytes = match &args.state {
        Some(path) => read_state_file(path).await?,
        None => Terraform::new(args.chdir.as_deref())
            .state_pull()
            .await
            .context("Terraform state is not found. Try `terraform init`.")?,
    };

    let state = parse_state_bytes(&bytes, DEFAULT_MAX_STATE_BYTES)?;
    debug!(
        resources = state.resources.len(),
        serial = ?state.serial,
        terraform_version = ?state.terraform_version,
        "loaded terraform state"
    );
    Ok(state)
}

async fn read_state_file(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .with_context(|| format!("cannot read state file {}", path.display()))
}
