//! tfshift-core
//!
//! Engine behind `tfshift`, which moves Azure resources to another resource
//! group (and optionally another subscription) and corrects Terraform state to
//! match:
//! - Terraform state models and parsing
//! - subscription / resource group derivation from instance attributes
//! - classification of resource kinds by how they move
//! - the selection engine and the projections the CLI acts on
//!
//! The crate performs no I/O and does not log.

pub mod classify;
pub mod config;
pub mod errors;
pub mod ident;
pub mod model;
pub mod parse;
pub mod select;
pub mod summary;
pub mod version;

pub use crate::errors::{RelocateError, RelocateResult};

/// Convenience re-exports.
pub mod prelude {
    pub use crate::classify::{MoveClass, STATE_ONLY_KINDS, UNSUPPORTED_KINDS};
    pub use crate::config::{SelectionConfig, UnresolvedGroupPolicy};
    pub use crate::model::{Attributes, IndexKey, Instance, Resource, ResourceMode, TerraformState};
    pub use crate::parse::{parse_state_bytes, DEFAULT_MAX_STATE_BYTES};
    pub use crate::select::{Selection, SelectionOutcome, Selector};
    pub use crate::summary::{ResourceInstanceSummaries, ResourceInstanceSummary};
    pub use crate::{RelocateError, RelocateResult};
}
