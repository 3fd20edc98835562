use std::collections::BTreeSet;

use crate::{
    fingerprint::Fingerprint,
    inventory::{Inventory, RelPath},
};

/// The outcome of resolving a single candidate path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Both sides diverged from the snapshot in incompatible ways; the tool
    /// refuses to auto-merge and reports the path instead.
    Conflict,
    /// The divergence reduces to a no-op because one side already matches
    /// the target state.
    Resolved,
    /// The path should be mutated and included in the transport sync.
    Actionable,
}

/// What a resolution does to one side of the reconciliation (`local` or
/// `master`) for a single path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// Leave this inventory's entry for the path untouched.
    Unchanged,
    /// Set the entry to the given fingerprint (insert or overwrite).
    Set(Fingerprint),
    /// Remove the entry entirely.
    Deleted,
}

impl Change {
    /// Apply this change to an inventory entry.
    fn apply(self, inventory: &mut Inventory, path: &RelPath) {
        match self {
            Change::Unchanged => {}
            Change::Set(fingerprint) => inventory.insert(path.clone(), fingerprint),
            Change::Deleted => {
                inventory.remove(path);
            }
        }
    }
}

/// A single path's resolution: what verdict it reached and what it implies
/// for `local`/`master` if applied.
///
/// Resolvers are pure functions that return these as a delta rather than
/// mutating inventories directly, so a caller can inspect the verdicts
/// (e.g. for a `status -r` dry-run report) without ever touching disk or
/// the remote, and without one resolver's effects leaking into another's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The path this resolution concerns.
    pub path: RelPath,
    /// The reconciliation verdict reached for this path.
    pub verdict: Verdict,
    /// What happens to the `local` inventory if this resolution is applied.
    pub local_after: Change,
    /// What happens to the `master` inventory if this resolution is applied.
    pub master_after: Change,
}

impl Resolution {
    fn conflict(path: RelPath) -> Self {
        Self {
            path,
            verdict: Verdict::Conflict,
            local_after: Change::Unchanged,
            master_after: Change::Unchanged,
        }
    }

    fn resolved(path: RelPath, local_after: Change) -> Self {
        Self {
            path,
            verdict: Verdict::Resolved,
            local_after,
            master_after: Change::Unchanged,
        }
    }

    fn actionable(path: RelPath, local_after: Change, master_after: Change) -> Self {
        Self {
            path,
            verdict: Verdict::Actionable,
            local_after,
            master_after,
        }
    }
}

/// Apply a resolution's deltas to the live inventories.
///
/// This is the only mutating step in the resolve module; callers that only
/// want a dry-run report simply never call it.
pub fn apply_resolution(local: &mut Inventory, master: &mut Inventory, resolution: &Resolution) {
    resolution.local_after.apply(local, &resolution.path);
    resolution.master_after.apply(master, &resolution.path);
}

/// Resolve the `push` candidate set.
///
/// `current[p]` is assumed present for every `p` in `candidates` (push
/// candidates are by definition paths present in `current`).
pub fn resolve_push(
    current: &Inventory,
    local: &Inventory,
    master: &Inventory,
    candidates: &BTreeSet<RelPath>,
) -> Vec<Resolution> {
    candidates
        .iter()
        .map(|path| {
            let c = current.get(path).expect("push candidate missing from current");
            let l = local.get(path);
            let m = master.get(path);
            match l {
                Some(lv) => match m {
                    Some(mv) if mv == lv => {
                        Resolution::actionable(path.clone(), Change::Set(c), Change::Set(c))
                    }
                    Some(mv) if mv == c => Resolution::resolved(path.clone(), Change::Set(c)),
                    Some(_) => Resolution::conflict(path.clone()),
                    None => Resolution::actionable(path.clone(), Change::Set(c), Change::Set(c)),
                },
                None => match m {
                    Some(mv) if mv == c => Resolution::resolved(path.clone(), Change::Set(c)),
                    Some(_) => Resolution::conflict(path.clone()),
                    None => Resolution::actionable(path.clone(), Change::Set(c), Change::Set(c)),
                },
            }
        })
        .collect()
}

/// Resolve the `purge` candidate set.
///
/// `local[p]` is assumed present for every `p` in `candidates` (purge
/// candidates are by definition paths present in `local`).
///
/// The `present, m ≠ l` branch is resolved as `conflict`, per the project's
/// adoption of the later revision of the original tool's ambiguous
/// behavior: silently purging a remote modification is a worse failure
/// mode than refusing and asking the user to look.
pub fn resolve_purge(
    local: &Inventory,
    master: &Inventory,
    candidates: &BTreeSet<RelPath>,
) -> Vec<Resolution> {
    candidates
        .iter()
        .map(|path| {
            let lv = local.get(path).expect("purge candidate missing from local");
            match master.get(path) {
                Some(mv) if mv == lv => {
                    Resolution::actionable(path.clone(), Change::Deleted, Change::Deleted)
                }
                Some(_) => Resolution::conflict(path.clone()),
                None => Resolution::resolved(path.clone(), Change::Deleted),
            }
        })
        .collect()
}

/// Resolve the `pull` candidate set.
///
/// `master[p]` is assumed present for every `p` in `candidates` (pull
/// candidates are by definition paths present in `master`).
pub fn resolve_pull(
    current: &Inventory,
    local: &Inventory,
    master: &Inventory,
    candidates: &BTreeSet<RelPath>,
) -> Vec<Resolution> {
    candidates
        .iter()
        .map(|path| {
            let mv = master.get(path).expect("pull candidate missing from master");
            let l = local.get(path);
            let c = current.get(path);
            match l {
                Some(lv) => match c {
                    None => Resolution::conflict(path.clone()),
                    Some(cv) if cv == lv => {
                        Resolution::actionable(path.clone(), Change::Set(mv), Change::Unchanged)
                    }
                    Some(cv) if cv == mv => Resolution::resolved(path.clone(), Change::Set(mv)),
                    Some(_) => Resolution::conflict(path.clone()),
                },
                None => match c {
                    Some(cv) if cv == mv => Resolution::resolved(path.clone(), Change::Set(mv)),
                    Some(_) => Resolution::conflict(path.clone()),
                    None => {
                        Resolution::actionable(path.clone(), Change::Set(mv), Change::Unchanged)
                    }
                },
            }
        })
        .collect()
}

/// Resolve the `kill` candidate set.
///
/// `local[p]` is assumed present for every `p` in `candidates` (kill
/// candidates are by definition paths present in `local`).
pub fn resolve_kill(current: &Inventory, local: &Inventory, candidates: &BTreeSet<RelPath>) -> Vec<Resolution> {
    candidates
        .iter()
        .map(|path| {
            let lv = local.get(path).expect("kill candidate missing from local");
            match current.get(path) {
                Some(cv) if cv == lv => {
                    Resolution::actionable(path.clone(), Change::Deleted, Change::Unchanged)
                }
                Some(_) => Resolution::conflict(path.clone()),
                None => Resolution::resolved(path.clone(), Change::Deleted),
            }
        })
        .collect()
}
