//! Selection output and the projections the CLI acts on.
//!
//! All projections preserve selection order except `to_correct_in_state`,
//! which is a lookup table keyed by Terraform address.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::classify::{is_unsupported, MoveClass};

/// One selected resource instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceInstanceSummary {
    /// Current Azure id (the raw `id` attribute).
    pub current_id: String,
    /// Azure id after the move; equal to `current_id` for non-ARM ids.
    pub future_id: String,
    /// Terraform address.
    pub address: String,
    /// Terraform resource type.
    pub kind: String,
    /// Read through a `data` block rather than managed.
    pub data_source: bool,
}

impl ResourceInstanceSummary {
    /// Unsupported kinds stay unsupported when read through a data source.
    pub fn move_class(&self) -> MoveClass {
        if self.data_source && !is_unsupported(&self.kind) {
            MoveClass::DataSource
        } else {
            MoveClass::of(&self.kind)
        }
    }
}

/// Ordered list of selected instances.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResourceInstanceSummaries(Vec<ResourceInstanceSummary>);

impl ResourceInstanceSummaries {
    pub fn new(items: Vec<ResourceInstanceSummary>) -> Self {
        Self(items)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceInstanceSummary> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[ResourceInstanceSummary] {
        &self.0
    }

    fn of_class(&self, class: MoveClass) -> impl Iterator<Item = &ResourceInstanceSummary> {
        self.iter().filter(move |s| s.move_class() == class)
    }

    /// Addresses of instances Azure cannot move.
    pub fn not_supported(&self) -> Vec<String> {
        self.of_class(MoveClass::Unsupported).map(|s| s.address.clone()).collect()
    }

    /// Azure ids to submit to `moveResources`.
    pub fn movable_on_azure(&self) -> Vec<String> {
        self.of_class(MoveClass::Azure).map(|s| s.current_id.clone()).collect()
    }

    /// Addresses of instances Azure moves along with their parent.
    pub fn moved_with_parent(&self) -> Vec<String> {
        self.of_class(MoveClass::StateOnly).map(|s| s.address.clone()).collect()
    }

    /// Addresses of data sources; they are neither moved nor re-imported.
    pub fn data_sources(&self) -> Vec<String> {
        self.of_class(MoveClass::DataSource).map(|s| s.address.clone()).collect()
    }

    /// Terraform address -> future Azure id, for every state entry to re-import.
    pub fn to_correct_in_state(&self) -> BTreeMap<String, String> {
        self.iter()
            .filter(|s| matches!(s.move_class(), MoveClass::Azure | MoveClass::StateOnly))
            .map(|s| (s.address.clone(), s.future_id.clone()))
            .collect()
    }

    /// Split off the managed instances whose kind must be deleted before the
    /// rest can move. Returns `(blocking, remaining)`, both in selection order.
    pub fn partition_blocking(&self, kinds: &BTreeSet<String>) -> (Self, Self) {
        let (blocking, remaining): (Vec<_>, Vec<_>) = self
            .0
            .iter()
            .cloned()
            .partition(|s| !s.data_source && kinds.contains(&s.kind));
        (Self(blocking), Self(remaining))
    }
}

impl From<Vec<ResourceInstanceSummary>> for ResourceInstanceSummaries {
    fn from(items: Vec<ResourceInstanceSummary>) -> Self {
        Self(items)
    }
}

impl IntoIterator for ResourceInstanceSummaries {
    type Item = ResourceInstanceSummary;
    type IntoIter = std::vec::IntoIter<ResourceInstanceSummary>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResourceInstanceSummaries {
    type Item = &'a ResourceInstanceSummary;
    type IntoIter = std::slice::Iter<'a, ResourceInstanceSummary>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(current: &str, future: &str, address: &str, kind: &str) -> ResourceInstanceSummary {
        ResourceInstanceSummary {
            current_id: current.to_string(),
            future_id: future.to_string(),
            address: address.to_string(),
            kind: kind.to_string(),
            data_source: false,
        }
    }

    fn sample() -> ResourceInstanceSummaries {
        ResourceInstanceSummaries::new(vec![
            entry(
                "/subscriptions/00000000-0000-0000-0000-000000000000/resourceGroups/rg3",
                "/subscriptions/00000000-0000-0000-0000-000000000001/resourceGroups/myresourcegroup2",
                "module.test.azurerm_resource_group.rg3",
                "azurerm_resource_group",
            ),
            entry(
                "https://example.blob.core.windows.net/container_1",
                "https://example.blob.core.windows.net/container_1",
                "module.test.azurerm_storage_container.example_container_1",
                "azurerm_storage_container",
            ),
            entry(
                "/subscriptions/00000000-0000-0000-0000-000000000000/resourceGroups/myresourcegroup/providers/Microsoft.Storage/storageAccounts/storageaccount2",
                "/subscriptions/00000000-0000-0000-0000-000000000001/resourceGroups/myresourcegroup2/providers/Microsoft.Storage/storageAccounts/storageaccount2",
                "module.storage.azurerm_storage_account.example_storage_2",
                "azurerm_storage_account",
            ),
            entry(
                "https://example.blob.core.windows.net/container_2",
                "https://example.blob.core.windows.net/container_2",
                "module.storage.azurerm_storage_container.example_container_2",
                "azurerm_storage_container",
            ),
        ])
    }

    #[test]
    fn not_supported_list() {
        assert_eq!(sample().not_supported(), vec!["module.test.azurerm_resource_group.rg3"]);
    }

    #[test]
    fn movable_on_azure_list() {
        assert_eq!(
            sample().movable_on_azure(),
            vec!["/subscriptions/00000000-0000-0000-0000-000000000000/resourceGroups/myresourcegroup/providers/Microsoft.Storage/storageAccounts/storageaccount2"]
        );
    }

    #[test]
    fn moved_with_parent_list() {
        assert_eq!(
            sample().moved_with_parent(),
            vec![
                "module.test.azurerm_storage_container.example_container_1",
                "module.storage.azurerm_storage_container.example_container_2",
            ]
        );
    }

    #[test]
    fn to_correct_in_state_map() {
        let got = sample().to_correct_in_state();
        let wanted: BTreeMap<String, String> = [
            (
                "module.test.azurerm_storage_container.example_container_1",
                "https://example.blob.core.windows.net/container_1",
            ),
            (
                "module.storage.azurerm_storage_account.example_storage_2",
                "/subscriptions/00000000-0000-0000-0000-000000000001/resourceGroups/myresourcegroup2/providers/Microsoft.Storage/storageAccounts/storageaccount2",
            ),
            (
                "module.storage.azurerm_storage_container.example_container_2",
                "https://example.blob.core.windows.net/container_2",
            ),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        assert_eq!(got, wanted);
    }

    #[test]
    fn partition_blocking_keeps_order() {
        let kinds: BTreeSet<String> = ["azurerm_storage_container".to_string()].into();
        let (blocking, rest) = sample().partition_blocking(&kinds);
        assert_eq!(blocking.len(), 2);
        assert_eq!(blocking.as_slice()[0].address, "module.test.azurerm_storage_container.example_container_1");
        assert_eq!(rest.len(), 2);
        assert_eq!(rest.as_slice()[0].kind, "azurerm_resource_group");
        assert!(rest.moved_with_parent().is_empty());
    }

    #[test]
    fn data_sources_are_left_alone() {
        let mut items = sample().into_iter().collect::<Vec<_>>();
        let mut vault = entry(
            "/subscriptions/00000000-0000-0000-0000-000000000000/resourceGroups/myresourcegroup/providers/Microsoft.KeyVault/vaults/kv",
            "/subscriptions/00000000-0000-0000-0000-000000000001/resourceGroups/myresourcegroup2/providers/Microsoft.KeyVault/vaults/kv",
            "data.azurerm_key_vault.shared",
            "azurerm_key_vault",
        );
        vault.data_source = true;
        items.push(vault);
        let s = ResourceInstanceSummaries::from(items);

        assert_eq!(s.data_sources(), vec!["data.azurerm_key_vault.shared"]);
        assert_eq!(s.movable_on_azure().len(), 1);
        assert!(!s.to_correct_in_state().contains_key("data.azurerm_key_vault.shared"));

        let kinds: BTreeSet<String> = ["azurerm_key_vault".to_string()].into();
        let (blocking, rest) = s.partition_blocking(&kinds);
        assert!(blocking.is_empty());
        assert_eq!(rest.len(), 5);
    }

    #[test]
    fn unsupported_data_source_stays_unsupported() {
        let mut config = entry("Y2xpZW50", "Y2xpZW50", "data.azurerm_client_config.current", "azurerm_client_config");
        config.data_source = true;
        assert_eq!(config.move_class(), MoveClass::Unsupported);
    }

    #[test]
    fn empty_projections() {
        let s = ResourceInstanceSummaries::default();
        assert!(s.not_supported().is_empty());
        assert!(s.movable_on_azure().is_empty());
        assert!(s.to_correct_in_state().is_empty());
    }
}
