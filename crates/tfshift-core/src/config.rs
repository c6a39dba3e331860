//! Configuration structures for tfshift-core.
//!
//! The core crate does not read environment variables or files. Callers build
//! a `SelectionConfig` explicitly (the CLI maps its flags onto it).

use std::collections::BTreeSet;

use crate::errors::{RelocateError, RelocateResult};
use crate::model::{ProviderAddress, Resource};

/// What to do with an unsupported-kind instance whose resource group cannot be
/// resolved (for example `azurerm_client_config`, which only carries a flat
/// `subscription_id`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnresolvedGroupPolicy {
    /// Keep it in the selection; it shows up in `not_supported()`.
    #[default]
    Include,
    /// Leave it out of the selection entirely.
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionConfig {
    /// Provider source addresses whose resources are eligible. Matched exactly
    /// against the `<source>` in `provider["<source>"]`.
    pub providers: BTreeSet<String>,
    pub unresolved_group_policy: UnresolvedGroupPolicy,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            providers: BTreeSet::from([ProviderAddress::AZURERM.to_string()]),
            unresolved_group_policy: UnresolvedGroupPolicy::default(),
        }
    }
}

impl SelectionConfig {
    pub fn allows_provider(&self, resource: &Resource) -> bool {
        resource
            .provider_address()
            .is_some_and(|p| self.providers.contains(&p.source))
    }
}

/// Validate a selection configuration.
pub fn validate_config(cfg: &SelectionConfig) -> RelocateResult<()> {
    if cfg.providers.is_empty() {
        return Err(RelocateError::invalid_config(
            "provider allow-list must not be empty",
        ));
    }

    if cfg.providers.iter().any(|p| p.trim().is_empty()) {
        return Err(RelocateError::invalid_config(
            "provider allow-list must not contain empty entries",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(provider: &str) -> Resource {
        Resource {
            provider: provider.to_string(),
            ..Resource::default()
        }
    }

    #[test]
    fn default_config_is_valid() {
        validate_config(&SelectionConfig::default()).unwrap();
    }

    #[test]
    fn empty_allow_list_detected() {
        let mut cfg = SelectionConfig::default();
        cfg.providers.clear();
        assert!(validate_config(&cfg).is_err());

        cfg.providers.insert(" ".to_string());
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn provider_match_is_exact() {
        let cfg = SelectionConfig::default();
        assert!(cfg.allows_provider(&resource("provider[\"registry.terraform.io/hashicorp/azurerm\"]")));
        assert!(cfg.allows_provider(&resource("provider[\"registry.terraform.io/hashicorp/azurerm\"].alt")));
        assert!(!cfg.allows_provider(&resource("provider[\"registry.terraform.io/hashicorp/azurerm-ext\"]")));
        assert!(!cfg.allows_provider(&resource("provider[\"registry.terraform.io/example/hashicorp/azurerm\"]")));
        assert!(!cfg.allows_provider(&resource("provider[\"registry.terraform.io/hashicorp/azuread\"]")));
    }
}
