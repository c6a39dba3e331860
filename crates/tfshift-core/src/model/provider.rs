//! Provider addresses as written in Terraform state.
//!
//! State records the provider of each resource as
//! `provider["registry.terraform.io/hashicorp/azurerm"]`, optionally followed by
//! `.alias` when a provider alias is used.

/// A parsed `provider["<source>"]` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderAddress {
    pub source: String,
    pub alias: Option<String>,
}

impl ProviderAddress {
    pub const AZURERM: &'static str = "registry.terraform.io/hashicorp/azurerm";

    pub fn parse(s: &str) -> Option<Self> {
        let rest = s.strip_prefix("provider[\"")?;
        let end = rest.find("\"]")?;
        let source = &rest[..end];
        if source.is_empty() {
            return None;
        }

        let tail = &rest[end + 2..];
        let alias = if tail.is_empty() {
            None
        } else {
            let alias = tail.strip_prefix('.')?;
            if alias.is_empty() {
                return None;
            }
            Some(alias.to_string())
        };

        Some(Self {
            source: source.to_string(),
            alias,
        })
    }
}
