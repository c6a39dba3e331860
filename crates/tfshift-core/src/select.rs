//! Selection engine.
//!
//! Walks the state once, in declaration order, applying three filters
//! (Terraform address, module, source resource group) and enforcing that the
//! selection lives in a single subscription and a single resource group. Any
//! violation aborts the whole call: a partially valid plan could move half a
//! selection.
//!
//! Instances of unsupported kinds (see `crate::classify`) are exempt from the
//! resource group checks; they are carried along so callers can report them.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::classify::is_unsupported;
use crate::config::{validate_config, SelectionConfig, UnresolvedGroupPolicy};
use crate::errors::{RelocateError, RelocateResult};
use crate::ident::{rebase_id, resource_group_id};
use crate::model::{ResourceMode, TerraformState};
use crate::summary::{ResourceInstanceSummaries, ResourceInstanceSummary};

/// Wildcard token accepted by every selector.
pub const WILDCARD: &str = "*";

/// An exact-match filter or the wildcard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selector {
    #[default]
    Any,
    Exact(String),
}

impl Selector {
    /// `*` and the empty string both mean "match all".
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "" | WILDCARD => Self::Any,
            v => Self::Exact(v.to_string()),
        }
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(v) => v == value,
        }
    }

    pub fn exact(&self) -> Option<&str> {
        match self {
            Self::Any => None,
            Self::Exact(v) => Some(v),
        }
    }
}

impl FromStr for Selector {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str(WILDCARD),
            Self::Exact(v) => f.write_str(v),
        }
    }
}

/// What to move and where to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Terraform address of a resource block, e.g. `module.storage.azurerm_storage_account.a`.
    pub resource: Selector,
    /// Module path, e.g. `module.storage`.
    pub module: Selector,
    /// Azure resource group the resources currently live in.
    pub resource_group: Selector,
    pub source_subscription: String,
    pub target_resource_group: String,
    pub target_subscription: String,
}

impl Selection {
    pub fn validate(&self) -> RelocateResult<()> {
        if self.source_subscription.trim().is_empty() {
            return Err(RelocateError::invalid_config("source subscription must not be empty"));
        }
        if self.target_subscription.trim().is_empty() {
            return Err(RelocateError::invalid_config("target subscription must not be empty"));
        }
        if self.target_resource_group.trim().is_empty() {
            return Err(RelocateError::invalid_config("target resource group must not be empty"));
        }
        Ok(())
    }

    fn target_prefix(&self) -> String {
        resource_group_id(&self.target_subscription, &self.target_resource_group)
    }
}

/// Result of a successful selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionOutcome {
    pub summaries: ResourceInstanceSummaries,
    /// The single resource group the selection lives in. Falls back to the
    /// resource group selector; `None` only when that was the wildcard and no
    /// selected instance pinned a group.
    pub source_resource_group: Option<String>,
}

impl TerraformState {
    /// Select the instances to move and compute their ids after the move.
    pub fn select(&self, sel: &Selection, cfg: &SelectionConfig) -> RelocateResult<SelectionOutcome> {
        validate_config(cfg)?;
        sel.validate()?;

        let target_prefix = sel.target_prefix();
        let mut source_group: Option<String> = sel.resource_group.exact().map(str::to_string);
        let mut summaries = Vec::new();

        for resource in &self.resources {
            if !cfg.allows_provider(resource) {
                continue;
            }
            if !sel.resource.matches(&resource.address()) {
                continue;
            }
            if !sel.module.matches(&resource.module) {
                continue;
            }

            let unsupported = is_unsupported(&resource.kind);
            let data_source = resource.mode == ResourceMode::Data;

            for instance in &resource.instances {
                let address = instance.address(resource);

                match instance.subscription_id() {
                    None if !unsupported => {
                        return Err(RelocateError::MissingSubscription { address });
                    }
                    Some(found) if found != sel.source_subscription => {
                        return Err(RelocateError::SubscriptionMismatch {
                            address,
                            found: found.to_string(),
                            expected: sel.source_subscription.clone(),
                        });
                    }
                    _ => {}
                }

                let instance_group = instance.resource_group();
                let instance_group = match instance_group {
                    Some(g) => Some(g),
                    None if !unsupported => {
                        return Err(RelocateError::MissingResourceGroup { address });
                    }
                    None if cfg.unresolved_group_policy == UnresolvedGroupPolicy::Skip => continue,
                    None => None,
                };

                match (&sel.resource_group, instance_group) {
                    (Selector::Any, _) => {}
                    (Selector::Exact(want), Some(g)) if want == g => {}
                    _ => continue,
                }

                if let (false, Some(g)) = (unsupported, instance_group) {
                    match &source_group {
                        None => source_group = Some(g.to_string()),
                        Some(first) if first != g => {
                            return Err(RelocateError::MultipleResourceGroups {
                                first: first.clone(),
                                second: g.to_string(),
                            });
                        }
                        Some(_) => {}
                    }

                    if g == sel.target_resource_group {
                        return Err(RelocateError::AlreadyInTargetGroup { address });
                    }
                }

                let current_id = instance.attributes.id.clone();
                let future_id = source_group
                    .as_deref()
                    .map(|g| resource_group_id(&sel.source_subscription, g))
                    .and_then(|from| rebase_id(&current_id, &from, &target_prefix))
                    .unwrap_or_else(|| current_id.clone());

                summaries.push(ResourceInstanceSummary {
                    current_id,
                    future_id,
                    address,
                    kind: resource.kind.clone(),
                    data_source,
                });
            }
        }

        Ok(SelectionOutcome {
            summaries: summaries.into(),
            source_resource_group: source_group,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Attributes, Instance, Resource};

    const AZURERM: &str = "provider[\"registry.terraform.io/hashicorp/azurerm\"]";

    fn resource(module: &str, kind: &str, name: &str, attrs: Attributes) -> Resource {
        Resource {
            kind: kind.to_string(),
            name: name.to_string(),
            provider: AZURERM.to_string(),
            module: module.to_string(),
            instances: vec![Instance {
                index_key: None,
                attributes: attrs,
            }],
            ..Resource::default()
        }
    }

    fn arm(id: &str) -> Attributes {
        Attributes {
            id: id.to_string(),
            ..Attributes::default()
        }
    }

    fn selection(rg: &str, target_rg: &str) -> Selection {
        Selection {
            resource: Selector::Any,
            module: Selector::Any,
            resource_group: Selector::parse(rg),
            source_subscription: "S".to_string(),
            target_resource_group: target_rg.to_string(),
            target_subscription: "S".to_string(),
        }
    }

    #[test]
    fn selector_parse() {
        assert_eq!(Selector::parse("*"), Selector::Any);
        assert_eq!(Selector::parse(""), Selector::Any);
        assert_eq!(Selector::parse("module.a"), Selector::Exact("module.a".to_string()));
        assert_eq!(Selector::parse("module.a").to_string(), "module.a");
        assert_eq!(Selector::Any.to_string(), "*");
    }

    #[test]
    fn two_groups_fail() {
        let state = TerraformState {
            resources: vec![
                resource("", "azurerm_storage_account", "a", arm("/subscriptions/S/resourceGroups/g1/providers/p/a")),
                resource("", "azurerm_storage_account", "b", arm("/subscriptions/S/resourceGroups/g2/providers/p/b")),
            ],
            ..TerraformState::default()
        };
        let err = state.select(&selection("*", "g3"), &SelectionConfig::default()).unwrap_err();
        assert_eq!(
            err,
            RelocateError::MultipleResourceGroups {
                first: "g1".to_string(),
                second: "g2".to_string()
            }
        );
    }

    #[test]
    fn other_providers_are_ignored() {
        let mut foreign = resource("", "azuread_group", "x", Attributes::default());
        foreign.provider = "provider[\"registry.terraform.io/hashicorp/azuread\"]".to_string();
        let state = TerraformState {
            resources: vec![
                foreign,
                resource("", "azurerm_storage_account", "a", arm("/subscriptions/S/resourceGroups/g1/providers/p/a")),
            ],
            ..TerraformState::default()
        };
        let out = state.select(&selection("*", "g2"), &SelectionConfig::default()).unwrap();
        assert_eq!(out.summaries.len(), 1);
        assert_eq!(out.source_resource_group.as_deref(), Some("g1"));
        assert_eq!(
            out.summaries.as_slice()[0].future_id,
            "/subscriptions/S/resourceGroups/g2/providers/p/a"
        );
    }

    #[test]
    fn unresolved_unsupported_follows_policy() {
        let client_config = Attributes {
            id: "Y2xpZW50Q29uZmlncy8".to_string(),
            subscription_id: Some("S".to_string()),
            ..Attributes::default()
        };
        let state = TerraformState {
            resources: vec![
                resource("", "azurerm_client_config", "current", client_config),
                resource("", "azurerm_storage_account", "a", arm("/subscriptions/S/resourceGroups/g1/providers/p/a")),
            ],
            ..TerraformState::default()
        };

        let include = state.select(&selection("*", "g2"), &SelectionConfig::default()).unwrap();
        assert_eq!(include.summaries.not_supported(), vec!["azurerm_client_config.current"]);

        let cfg = SelectionConfig {
            unresolved_group_policy: UnresolvedGroupPolicy::Skip,
            ..SelectionConfig::default()
        };
        let skip = state.select(&selection("*", "g2"), &cfg).unwrap();
        assert_eq!(skip.summaries.len(), 1);
        assert!(skip.summaries.not_supported().is_empty());

        // an exact group filter never matches an unresolved group
        let filtered = state.select(&selection("g1", "g2"), &SelectionConfig::default()).unwrap();
        assert_eq!(filtered.summaries.len(), 1);
    }

    #[test]
    fn empty_selection_falls_back_to_selector() {
        let state = TerraformState::default();
        let any = state.select(&selection("*", "g2"), &SelectionConfig::default()).unwrap();
        assert!(any.summaries.is_empty());
        assert_eq!(any.source_resource_group, None);

        let exact = state.select(&selection("g1", "g2"), &SelectionConfig::default()).unwrap();
        assert_eq!(exact.source_resource_group.as_deref(), Some("g1"));
    }

    #[test]
    fn flat_id_without_side_channel_has_no_subscription() {
        let state = TerraformState {
            resources: vec![resource("", "azurerm_storage_account", "a", arm("https://a.blob.core.windows.net/"))],
            ..TerraformState::default()
        };
        let err = state.select(&selection("*", "g2"), &SelectionConfig::default()).unwrap_err();
        assert_eq!(
            err,
            RelocateError::MissingSubscription {
                address: "azurerm_storage_account.a".to_string()
            }
        );
    }

    #[test]
    fn subscription_scoped_id_has_no_resource_group() {
        let state = TerraformState {
            resources: vec![resource(
                "",
                "azurerm_role_definition",
                "r",
                arm("/subscriptions/S/providers/Microsoft.Authorization/roleDefinitions/x"),
            )],
            ..TerraformState::default()
        };
        let err = state.select(&selection("*", "g2"), &SelectionConfig::default()).unwrap_err();
        assert_eq!(
            err,
            RelocateError::MissingResourceGroup {
                address: "azurerm_role_definition.r".to_string()
            }
        );
    }

    #[test]
    fn unsupported_kind_without_subscription_passes() {
        let state = TerraformState {
            resources: vec![
                resource("", "azurerm_resource_group", "rg", arm("rg-without-arm-id")),
                resource("", "azurerm_storage_account", "a", arm("/subscriptions/S/resourceGroups/g1/providers/p/a")),
            ],
            ..TerraformState::default()
        };
        let out = state.select(&selection("*", "g2"), &SelectionConfig::default()).unwrap();
        assert_eq!(out.summaries.not_supported(), vec!["azurerm_resource_group.rg"]);
        assert_eq!(out.summaries.as_slice()[0].future_id, "rg-without-arm-id");
        assert_eq!(out.source_resource_group.as_deref(), Some("g1"));
    }

    #[test]
    fn data_sources_are_marked() {
        let mut shared = resource(
            "",
            "azurerm_key_vault",
            "shared",
            arm("/subscriptions/S/resourceGroups/g1/providers/Microsoft.KeyVault/vaults/kv"),
        );
        shared.mode = ResourceMode::Data;
        let state = TerraformState {
            resources: vec![
                shared,
                resource("", "azurerm_storage_account", "a", arm("/subscriptions/S/resourceGroups/g1/providers/p/a")),
            ],
            ..TerraformState::default()
        };
        let out = state.select(&selection("*", "g2"), &SelectionConfig::default()).unwrap();
        assert!(out.summaries.as_slice()[0].data_source);
        assert_eq!(out.summaries.data_sources(), vec!["data.azurerm_key_vault.shared"]);
        assert_eq!(out.summaries.movable_on_azure(), vec!["/subscriptions/S/resourceGroups/g1/providers/p/a"]);
        assert_eq!(
            out.summaries.to_correct_in_state().keys().collect::<Vec<_>>(),
            vec!["azurerm_storage_account.a"]
        );
    }

    #[test]
    fn blank_target_is_rejected() {
        let state = TerraformState::default();
        let err = state.select(&selection("*", " "), &SelectionConfig::default()).unwrap_err();
        assert!(matches!(err, RelocateError::InvalidConfig(_)));
    }
}
