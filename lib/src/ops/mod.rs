//! One function per CLI command, composing the reconciliation core
//! ([`crate::classify`], [`crate::resolve`]) with the transport boundary
//! ([`crate::store`]) and persisted state ([`crate::config`],
//! [`crate::inventory`]).
//!
//! Every function here takes the working root and a `&dyn
//! crate::store::ObjectStore` as explicit parameters rather than reading
//! an ambient global — there is no process-wide "current repository" the
//! way the original tool relied on `chdir`.

pub mod checkin;
pub mod checkout;
pub mod clone;
pub mod delete;
pub mod init;
pub mod overwrite_master;
pub mod pull;
pub mod push;
pub mod repair_master;
pub mod stash;
pub mod status;

use crate::inventory::RelPath;

/// The result of resolving and applying a set of candidate paths.
///
/// Shared by [`push`], [`pull`], [`checkin`], and [`checkout`]: each
/// either finds nothing to do, or applies some actionable paths while
/// reporting any conflicts it found along the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Paths that were resolved as actionable and had their transport
    /// operation applied.
    pub applied: Vec<RelPath>,
    /// Paths that could not be auto-resolved and were left untouched.
    pub conflicts: Vec<RelPath>,
}

impl SyncOutcome {
    /// Whether nothing needed to be applied and nothing conflicted.
    pub fn is_up_to_date(&self) -> bool {
        self.applied.is_empty() && self.conflicts.is_empty()
    }
}
