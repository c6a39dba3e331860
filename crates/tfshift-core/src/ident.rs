//! Identifier derivation over instance attributes.
//!
//! ARM ids have the shape `/subscriptions/{sub}/resourceGroups/{rg}/...`.
//! Not every kind stores one in `id`: storage containers expose a blob URL,
//! key vault secrets a vault URL, and so on. For those the ARM id is read from a
//! side-channel attribute. Candidates are tried in the order of
//! [`ARM_ID_SOURCES`]; adding a new attribute shape means adding one entry.

use crate::model::{Attributes, Instance};

const SUBSCRIPTIONS: &str = "/subscriptions/";
const RESOURCE_GROUPS: &str = "/resourceGroups/";

/// Reads one candidate ARM id out of the attributes.
pub type IdSource = fn(&Attributes) -> Option<&str>;

fn id(a: &Attributes) -> Option<&str> {
    Some(a.id.as_str())
}

fn resource_manager_id(a: &Attributes) -> Option<&str> {
    a.resource_manager_id.as_deref()
}

fn key_vault_id(a: &Attributes) -> Option<&str> {
    a.key_vault_id.as_deref()
}

/// Attributes that may hold an ARM id, highest priority first.
pub const ARM_ID_SOURCES: &[IdSource] = &[id, resource_manager_id, key_vault_id];

/// Subscription segment of an ARM id. Empty segments count as absent.
pub fn arm_subscription(value: &str) -> Option<&str> {
    let rest = value.strip_prefix(SUBSCRIPTIONS)?;
    let seg = rest.split('/').next()?;
    (!seg.is_empty()).then_some(seg)
}

/// Resource group segment of an ARM id living in `subscription`.
pub fn arm_resource_group<'a>(value: &'a str, subscription: &str) -> Option<&'a str> {
    let rest = value
        .strip_prefix(SUBSCRIPTIONS)?
        .strip_prefix(subscription)?
        .strip_prefix(RESOURCE_GROUPS)?;
    let seg = rest.split('/').next()?;
    (!seg.is_empty()).then_some(seg)
}

/// `/subscriptions/{subscription}/resourceGroups/{resource_group}`
pub fn resource_group_id(subscription: &str, resource_group: &str) -> String {
    format!("{SUBSCRIPTIONS}{subscription}{RESOURCE_GROUPS}{resource_group}")
}

/// Subscription the instance lives in.
///
/// The ARM id sources are tried first; the flat `subscription_id` attribute
/// (exposed by e.g. `azurerm_client_config`) is the last resort.
pub fn subscription_of(attrs: &Attributes) -> Option<&str> {
    ARM_ID_SOURCES
        .iter()
        .filter_map(|source| source(attrs))
        .find_map(arm_subscription)
        .or_else(|| attrs.subscription_id.as_deref().filter(|s| !s.is_empty()))
}

/// Resource group the instance lives in. Requires a resolvable subscription,
/// because the group segment is matched under that subscription's prefix.
pub fn resource_group_of(attrs: &Attributes) -> Option<&str> {
    let subscription = subscription_of(attrs)?;
    ARM_ID_SOURCES
        .iter()
        .filter_map(|source| source(attrs))
        .find_map(|value| arm_resource_group(value, subscription))
}

/// Replace the `from` resource group prefix of `id` with `to`.
///
/// Returns `None` when `id` does not start with `from` followed by a segment
/// boundary, so `.../resourceGroups/rg1` never matches `.../resourceGroups/rg10`.
pub fn rebase_id(id: &str, from: &str, to: &str) -> Option<String> {
    let rest = id.strip_prefix(from)?;
    if !(rest.is_empty() || rest.starts_with('/')) {
        return None;
    }
    Some(format!("{to}{rest}"))
}

impl Instance {
    pub fn subscription_id(&self) -> Option<&str> {
        subscription_of(&self.attributes)
    }

    pub fn resource_group(&self) -> Option<&str> {
        resource_group_of(&self.attributes)
    }
}
