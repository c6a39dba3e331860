//! Move classification by resource kind.

use serde::Serialize;

/// Kinds Azure cannot move with `moveResources`.
///
/// These are exempt from the resource group checks during selection and are
/// never submitted to Azure nor corrected in state.
pub const UNSUPPORTED_KINDS: &[&str] = &[
    "azurerm_client_config",
    "azurerm_kubernetes_cluster",
    "azurerm_monitor_diagnostic_setting",
    "azurerm_resource_group",
];

/// Kinds Azure moves implicitly together with their parent.
///
/// Submitting them to `moveResources` is a no-op or an error, but their ids
/// embed the parent's path, so their state entries still need correcting.
pub const STATE_ONLY_KINDS: &[&str] = &[
    "azurerm_key_vault_access_policy",
    "azurerm_key_vault_secret",
    "azurerm_mysql_firewall_rule",
    "azurerm_storage_container",
    "azurerm_storage_share",
];

/// How an instance of a given kind takes part in a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MoveClass {
    /// Moved through the Azure API and corrected in state.
    Azure,
    /// Moved by Azure with its parent; corrected in state only.
    StateOnly,
    /// Not movable at all.
    Unsupported,
    /// Read through a data source; Terraform refreshes it on its own.
    DataSource,
}

impl MoveClass {
    /// Class of a managed resource of `kind`.
    pub fn of(kind: &str) -> Self {
        if is_unsupported(kind) {
            Self::Unsupported
        } else if is_state_only(kind) {
            Self::StateOnly
        } else {
            Self::Azure
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Azure => "azure",
            Self::StateOnly => "state-only",
            Self::Unsupported => "unsupported",
            Self::DataSource => "data-source",
        }
    }
}

pub fn is_unsupported(kind: &str) -> bool {
    UNSUPPORTED_KINDS.contains(&kind)
}

pub fn is_state_only(kind: &str) -> bool {
    STATE_ONLY_KINDS.contains(&kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_do_not_overlap() {
        for k in STATE_ONLY_KINDS {
            assert!(!is_unsupported(k), "{k} is in both tables");
        }
    }

    #[test]
    fn classify_kinds() {
        assert_eq!(MoveClass::of("azurerm_resource_group"), MoveClass::Unsupported);
        assert_eq!(MoveClass::of("azurerm_storage_container"), MoveClass::StateOnly);
        assert_eq!(MoveClass::of("azurerm_storage_account"), MoveClass::Azure);
        assert_eq!(MoveClass::of("azurerm_resource_group_x"), MoveClass::Azure);
    }
}
