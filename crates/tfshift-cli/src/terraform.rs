//! Terraform CLI wrapper: pulls state, removes and re-imports entries.

use std::path::{Path, PathBuf};
use std::process::Output;

use anyhow::{bail, Context, Result};
use tokio::process::Command;
use tracing::{debug, info};

#[derive(Debug, Clone, Default)]
pub struct Terraform {
    chdir: Option<PathBuf>,
    vars: Vec<String>,
    var_files: Vec<PathBuf>,
}

impl Terraform {
    pub fn new(chdir: Option<&Path>) -> Self {
        Self {
            chdir: chdir.map(Path::to_path_buf),
            ..Self::default()
        }
    }

    /// Variables forwarded to `terraform import`.
    pub fn with_vars(mut self, vars: &[String], var_files: &[PathBuf]) -> Self {
        self.vars = vars.to_vec();
        self.var_files = var_files.to_vec();
        self
    }

    fn global_args(&self) -> Vec<String> {
        match &self.chdir {
            Some(dir) => vec![format!("-chdir={}", dir.display())],
            None => Vec::new(),
        }
    }

    pub fn state_pull_args(&self) -> Vec<String> {
        let mut args = self.global_args();
        args.extend(["state".to_string(), "pull".to_string()]);
        args
    }

    pub fn state_rm_args(&self, address: &str) -> Vec<String> {
        let mut args = self.global_args();
        args.extend(["state".to_string(), "rm".to_string(), address.to_string()]);
        args
    }

    pub fn import_args(&self, address: &str, id: &str) -> Vec<String> {
        let mut args = self.global_args();
        args.push("import".to_string());
        args.push("-input=false".to_string());
        for v in &self.vars {
            args.push("-var".to_string());
            args.push(v.clone());
        }
        for f in &self.var_files {
            args.push(format!("-var-file={}", f.display()));
        }
        args.push(address.to_string());
        args.push(id.to_string());
        args
    }

    async fn run(&self, args: Vec<String>) -> Result<Output> {
        debug!(args = ?args, "running terraform");
        Command::new("terraform")
            .args(&args)
            .env("TF_IN_AUTOMATION", "1")
            .output()
            .await
            .with_context(|| format!("failed to spawn \"terraform {}\"", args.join(" ")))
    }

    async fn run_checked(&self, args: Vec<String>) -> Result<String> {
        let line = args.join(" ");
        let out = self.run(args).await?;
        let mut text = String::from_utf8_lossy(&out.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&out.stderr));
        if !out.status.success() {
            bail!("terraform command \"terraform {line}\" failed ({}):\n{text}", out.status);
        }
        Ok(text)
    }

    /// Raw bytes of the current state.
    pub async fn state_pull(&self) -> Result<Vec<u8>> {
        let out = self.run(self.state_pull_args()).await?;
        if !out.status.success() {
            bail!(
                "\"terraform state pull\" failed ({}): {}",
                out.status,
                String::from_utf8_lossy(&out.stderr).trim()
            );
        }
        info!(bytes = out.stdout.len(), "pulled terraform state");
        Ok(out.stdout)
    }

    pub async fn state_rm(&self, address: &str) -> Result<String> {
        let out = self.run_checked(self.state_rm_args(address)).await?;
        info!(address, "removed from terraform state");
        Ok(out)
    }

    pub async fn import(&self, address: &str, id: &str) -> Result<String> {
        let out = self.run_checked(self.import_args(address, id)).await?;
        info!(address, id, "imported into terraform state");
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_args_order() {
        let tf = Terraform::new(Some(Path::new("infra")))
            .with_vars(&["a=1".to_string()], &[PathBuf::from("prod.tfvars")]);
        assert_eq!(
            tf.import_args("module.m.azurerm_storage_account.a", "/subscriptions/s/resourceGroups/g"),
            vec![
                "-chdir=infra",
                "import",
                "-input=false",
                "-var",
                "a=1",
                "-var-file=prod.tfvars",
                "module.m.azurerm_storage_account.a",
                "/subscriptions/s/resourceGroups/g",
            ]
        );
    }

    #[test]
    fn state_args_without_chdir() {
        let tf = Terraform::new(None);
        assert_eq!(tf.state_pull_args(), vec!["state", "pull"]);
        assert_eq!(tf.state_rm_args("azurerm_key_vault.v"), vec!["state", "rm", "azurerm_key_vault.v"]);
    }
}
