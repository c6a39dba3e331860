//! Error types for tfshift-core.
//!
//! Every variant is fatal to the selection call that produced it. Variants carry
//! the Terraform address of the offending instance and, where relevant, the
//! conflicting values so callers can report without re-deriving state.

use thiserror::Error;

pub type RelocateResult<T> = Result<T, RelocateError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelocateError {
    #[error("subscription ID is not found for {address}")]
    MissingSubscription { address: String },

    #[error(
        "resource instance `{address}` has a different subscription specified, unable to start moving. \
         Resource instance subscription ID: {found}, specified subscription ID: {expected}"
    )]
    SubscriptionMismatch {
        address: String,
        found: String,
        expected: String,
    },

    #[error("resource group is not found for {address}")]
    MissingResourceGroup { address: String },

    #[error(
        "multiple resource groups found within your selection, unable to start moving. \
         Resource groups found: [{first}, {second}]"
    )]
    MultipleResourceGroups { first: String, second: String },

    #[error("the selected resource {address} is already in the target resource group")]
    AlreadyInTargetGroup { address: String },

    #[error("terraform state is not available: {0}")]
    SnapshotUnavailable(String),

    #[error("unsupported terraform state format version: {0}")]
    UnsupportedStateVersion(u64),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl RelocateError {
    pub fn snapshot_unavailable(msg: impl Into<String>) -> Self {
        Self::SnapshotUnavailable(msg.into())
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
