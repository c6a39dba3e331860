//! Typed Terraform state models.
//!
//! Only the parts of the state document that the selection engine looks at are
//! modelled; every other key is ignored on decode. Models are read-only data
//! with a few derived accessors (addresses, provider source). Policy lives in
//! `crate::select`, derivations over attributes live in `crate::ident`.
//!
//! Recommended imports:
//! - `use tfshift_core::model::*;`
//! - or `use tfshift_core::prelude::*;`

use std::fmt;

use serde::{Deserialize, Deserializer};

pub mod provider;

pub use provider::ProviderAddress;

/// A decoded Terraform state document.
///
/// `resources` keeps declaration order; selection output follows it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TerraformState {
    #[serde(default)]
    pub version: u64,

    #[serde(default)]
    pub terraform_version: Option<String>,

    #[serde(default)]
    pub serial: Option<u64>,

    #[serde(default)]
    pub lineage: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub resources: Vec<Resource>,
}

/// Whether a resource is managed by Terraform or read through a data source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceMode {
    #[default]
    Managed,
    Data,
}

/// One `resource` or `data` block as recorded in state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Resource {
    #[serde(rename = "type")]
    pub kind: String,

    pub name: String,

    #[serde(default)]
    pub provider: String,

    /// Module path, e.g. `module.storage`; empty for the root module.
    #[serde(default, deserialize_with = "null_as_default")]
    pub module: String,

    #[serde(default)]
    pub mode: ResourceMode,

    #[serde(default, deserialize_with = "null_as_default")]
    pub instances: Vec<Instance>,
}

impl Resource {
    /// Terraform address of the resource block, without any index.
    ///
    /// `module.storage.azurerm_storage_account.example`,
    /// `azurerm_storage_account.example`, `data.azurerm_client_config.current`.
    pub fn address(&self) -> String {
        let mut out = String::new();
        if !self.module.is_empty() {
            out.push_str(&self.module);
            out.push('.');
        }
        if self.mode == ResourceMode::Data {
            out.push_str("data.");
        }
        out.push_str(&self.kind);
        out.push('.');
        out.push_str(&self.name);
        out
    }

    /// Parsed provider address; `None` when the `provider` string is not in the
    /// `provider["<source>"]` form.
    pub fn provider_address(&self) -> Option<ProviderAddress> {
        ProviderAddress::parse(&self.provider)
    }
}

/// Index key of a `count` or `for_each` instance.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum IndexKey {
    Int(i64),
    Str(String),
}

impl fmt::Display for IndexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Instance {
    #[serde(default)]
    pub index_key: Option<IndexKey>,

    #[serde(default)]
    pub attributes: Attributes,
}

impl Instance {
    /// Terraform address of this instance: the owning resource's address,
    /// suffixed with `["<key>"]` when the instance has an index key.
    pub fn address(&self, resource: &Resource) -> String {
        match &self.index_key {
            Some(key) => format!("{}[\"{key}\"]", resource.address()),
            None => resource.address(),
        }
    }
}

/// The subset of instance attributes used to locate a resource in Azure.
///
/// `id` is normally an ARM id (`/subscriptions/{sub}/resourceGroups/{rg}/...`).
/// Some kinds expose a data-plane URL instead and carry the ARM id in one of
/// the side-channel attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Attributes {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,

    #[serde(default)]
    pub resource_manager_id: Option<String>,

    #[serde(default)]
    pub key_vault_id: Option<String>,

    #[serde(default)]
    pub subscription_id: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
