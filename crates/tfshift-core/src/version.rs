//! Terraform state format versions.
//!
//! Only the v4 layout (Terraform 0.12 and later) keeps resources as a flat list
//! with `module`, `type`, `name` and `instances`; older layouts are rejected.

use crate::errors::{RelocateError, RelocateResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateVersion {
    V4,
}

impl StateVersion {
    pub fn parse(v: u64) -> RelocateResult<Self> {
        match v {
            4 => Ok(Self::V4),
            other => Err(RelocateError::UnsupportedStateVersion(other)),
        }
    }
}
