use std::collections::BTreeSet;

use crate::inventory::{Inventory, RelPath};

/// The four candidate sets produced by comparing the three inventories.
///
/// Computed without consulting each other; overlap between sets is
/// expected and handled in [`crate::resolve`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidates {
    /// Paths present (and new or changed) in `current` relative to `local`.
    pub push: BTreeSet<RelPath>,
    /// Paths present in `local` but gone from `current`.
    pub purge: BTreeSet<RelPath>,
    /// Paths present (and new or changed) in `master` relative to `local`.
    pub pull: BTreeSet<RelPath>,
    /// Paths present in `local` but gone from `master`.
    pub kill: BTreeSet<RelPath>,
}

/// Classify paths across the three inventories into push/purge/pull/kill.
///
/// Pure and side-effect free: safe to call repeatedly on the same
/// inventories and compare results, which is what makes `status -r`'s
/// dry-run report possible without mutating anything.
pub fn classify(current: &Inventory, local: &Inventory, master: &Inventory) -> Candidates {
    let push = if local.is_empty() {
        current.path_set()
    } else {
        current
            .keys()
            .filter(|p| local.get(p) != current.get(p))
            .cloned()
            .collect()
    };

    let purge = local
        .keys()
        .filter(|p| !current.contains(p))
        .cloned()
        .collect();

    let pull = master
        .keys()
        .filter(|p| local.get(p) != master.get(p))
        .cloned()
        .collect();

    let kill = local
        .keys()
        .filter(|p| !master.contains(p))
        .cloned()
        .collect();

    Candidates {
        push,
        purge,
        pull,
        kill,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::Fingerprint;
    use pretty_assertions::assert_eq;

    fn fp(hex: &str) -> Fingerprint {
        hex.parse().expect("parse fingerprint")
    }

    fn inventory(entries: &[(&str, &str)]) -> Inventory {
        Inventory::from_entries(
            entries
                .iter()
                .map(|(p, h)| (RelPath::new(*p).unwrap(), fp(h))),
        )
    }

    #[test_log::test]
    fn empty_local_makes_everything_push() {
        let current = inventory(&[("a.txt", Fingerprint::EMPTY_HEX)]);
        let local = Inventory::default();
        let master = Inventory::default();
        let candidates = classify(&current, &local, &master);
        assert_eq!(candidates.push, current.path_set());
    }

    #[test_log::test]
    fn purge_and_kill_detect_local_only_entries() {
        let current = Inventory::default();
        let local = inventory(&[("a.txt", Fingerprint::EMPTY_HEX)]);
        let master = Inventory::default();
        let candidates = classify(&current, &local, &master);
        assert!(candidates.purge.contains(&RelPath::new("a.txt").unwrap()));
        assert!(candidates.kill.contains(&RelPath::new("a.txt").unwrap()));
    }

    #[test_log::test]
    fn push_and_purge_are_disjoint() {
        let current = inventory(&[("a.txt", Fingerprint::EMPTY_HEX)]);
        let local = inventory(&[("b.txt", Fingerprint::EMPTY_HEX)]);
        let master = Inventory::default();
        let candidates = classify(&current, &local, &master);
        assert!(candidates.push.is_disjoint(&candidates.purge));
    }

    #[test_log::test]
    fn pull_and_kill_are_disjoint() {
        let current = Inventory::default();
        let local = inventory(&[("a.txt", Fingerprint::EMPTY_HEX)]);
        let master = inventory(&[("b.txt", Fingerprint::EMPTY_HEX)]);
        let candidates = classify(&current, &local, &master);
        assert!(candidates.pull.is_disjoint(&candidates.kill));
    }
}
