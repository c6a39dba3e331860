//! Azure CLI (`az`) wrapper: bearer tokens and resource deletion.

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, info};

/// Resource the ARM bearer token is requested for.
pub const ARM_RESOURCE: &str = "https://management.azure.com/";

/// Environment variable that short-circuits the `az` token lookup.
pub const TOKEN_ENV: &str = "ARM_ACCESS_TOKEN";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccessToken {
    access_token: String,
}

#[derive(Debug, Clone, Default)]
pub struct AzCli;

impl AzCli {
    pub fn new() -> Self {
        Self
    }

    async fn run(&self, args: &[&str]) -> Result<Vec<u8>> {
        debug!(args = ?args, "running az");
        let out = Command::new("az")
            .args(args)
            .output()
            .await
            .with_context(|| format!("failed to spawn \"az {}\"", args.join(" ")))?;
        if !out.status.success() {
            bail!(
                "az command \"az {}\" failed ({}): {}",
                args.join(" "),
                out.status,
                String::from_utf8_lossy(&out.stderr).trim()
            );
        }
        Ok(out.stdout)
    }

    /// Bearer token for Azure Resource Manager.
    pub async fn access_token(&self) -> Result<String> {
        if let Ok(token) = std::env::var(TOKEN_ENV) {
            if !token.trim().is_empty() {
                debug!("using bearer token from {TOKEN_ENV}");
                return Ok(token);
            }
        }

        let raw = self
            .run(&["account", "get-access-token", "--resource", ARM_RESOURCE, "--output", "json"])
            .await
            .context("cannot obtain an Azure access token, run `az login` or set ARM_ACCESS_TOKEN")?;
        parse_access_token(&raw)
    }

    pub async fn delete_resource(&self, id: &str) -> Result<()> {
        self.run(&["resource", "delete", "--ids", id]).await?;
        info!(id, "deleted azure resource");
        Ok(())
    }
}

fn parse_access_token(raw: &[u8]) -> Result<String> {
    let token: AccessToken =
        serde_json::from_slice(raw).map_err(|e| anyhow!("unexpected `az account get-access-token` output: {e}"))?;
    if token.access_token.is_empty() {
        bail!("`az account get-access-token` returned an empty token");
    }
    Ok(token.access_token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_token_output() {
        let raw = br#"{"accessToken":"eyJ0eXAi","expiresOn":"2026-10-19 10:00:00.000000","subscription":"s","tenant":"t","tokenType":"Bearer"}"#;
        assert_eq!(parse_access_token(raw).unwrap(), "eyJ0eXAi");
    }

    #[test]
    fn rejects_empty_token() {
        assert!(parse_access_token(br#"{"accessToken":""}"#).is_err());
        assert!(parse_access_token(b"nope").is_err());
    }
}
