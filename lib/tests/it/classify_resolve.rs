use std::collections::BTreeSet;

use dat_core::{
    classify::classify,
    fingerprint::Fingerprint,
    inventory::{Inventory, RelPath},
    resolve::{resolve_kill, resolve_pull, resolve_push, Verdict},
};
use proptest::prelude::*;

/// A handful of distinct fingerprints, cheap to generate and compare, so
/// proptest can explore "all three agree", "two agree", "all three
/// diverge" without needing real file contents.
fn some_fingerprint(tag: u8) -> Fingerprint {
    Fingerprint::from_bytes([tag; 16])
}

fn arb_fingerprint() -> impl Strategy<Value = Fingerprint> {
    (0u8..4).prop_map(some_fingerprint)
}

/// Build an inventory over a fixed path universe, with each path present
/// with probability ~2/3 and, when present, one of a few fingerprints.
fn arb_inventory(paths: &'static [&'static str]) -> impl Strategy<Value = Inventory> {
    proptest::collection::vec(proptest::option::weighted(0.65, arb_fingerprint()), paths.len()).prop_map(
        move |fingerprints| {
            Inventory::from_entries(paths.iter().zip(fingerprints).filter_map(|(path, fp)| {
                fp.map(|fp| (RelPath::new(*path).expect("valid literal path"), fp))
            }))
        },
    )
}

const PATHS: &[&str] = &["a.txt", "b.txt", "c.txt"];

proptest! {
    /// Property 1 (partition): push/purge are disjoint, and pull/kill are
    /// disjoint, for arbitrary triples of inventories.
    #[test]
    fn push_purge_and_pull_kill_partitions_hold(
        current in arb_inventory(PATHS),
        local in arb_inventory(PATHS),
        master in arb_inventory(PATHS),
    ) {
        let candidates = classify(&current, &local, &master);
        prop_assert!(candidates.push.is_disjoint(&candidates.purge));
        prop_assert!(candidates.pull.is_disjoint(&candidates.kill));
    }

    /// Property 4 (round-trip): rendering an inventory built from sorted
    /// input and re-parsing it reproduces the same entries, byte-exact.
    #[test]
    fn inventory_render_parse_round_trips(inventory in arb_inventory(PATHS)) {
        let rendered = inventory.render();
        let parsed = Inventory::parse(&rendered).expect("render output always parses");
        prop_assert_eq!(parsed, inventory.clone());
        prop_assert_eq!(parsed.render(), rendered);
    }

    /// Property 5 (conflict symmetry): a path that `resolve_push` calls a
    /// conflict for peer A's `(current, local, master)` is a conflict under
    /// `resolve_pull` for peer B's mirrored view, where what was `current`
    /// for the pusher becomes `master` for the puller and vice versa.
    #[test]
    fn push_pull_conflict_symmetry(
        c in arb_fingerprint(),
        l in arb_fingerprint(),
        m in arb_fingerprint(),
    ) {
        let path = RelPath::new("a.txt").expect("valid literal path");
        let single = |fp: Fingerprint| Inventory::from_entries([(path.clone(), fp)]);
        let candidates: BTreeSet<_> = [path.clone()].into_iter().collect();

        let push_current = single(c);
        let push_local = single(l);
        let push_master = single(m);
        let push_verdict = resolve_push(&push_current, &push_local, &push_master, &candidates)[0].verdict;

        let pull_current = single(m);
        let pull_local = single(l);
        let pull_master = single(c);
        let pull_verdict = resolve_pull(&pull_current, &pull_local, &pull_master, &candidates)[0].verdict;

        prop_assert_eq!(push_verdict == Verdict::Conflict, pull_verdict == Verdict::Conflict);
    }

    /// Property 6 (exclusion): no generated inventory ever contains a path
    /// under `.dat/`, `.git/`, or named `.DS_Store` — `RelPath::new` is the
    /// only constructor and it refuses those outright, so this is really a
    /// property of the constructor rather than of any one generator, but we
    /// exercise it through a small path universe that includes the
    /// excluded names to confirm the walker-facing check they rely on
    /// (`RelPath::is_excluded`) flags exactly them.
    #[test]
    fn excluded_paths_are_always_flagged(suffix in "[a-z]{1,6}") {
        for excluded in [format!(".dat/{suffix}"), format!(".git/{suffix}"), format!("{suffix}/.DS_Store")] {
            let path = RelPath::new(excluded).expect("slashes and word chars are always valid");
            prop_assert!(path.is_excluded());
        }
        let kept = RelPath::new(format!("src/{suffix}.rs")).expect("valid path");
        prop_assert!(!kept.is_excluded());
        // A leaf that merely ends with `.DS_Store` (not equal to it) must
        // not be excluded.
        let near_miss = RelPath::new(format!("{suffix}.DS_Store")).expect("valid path");
        prop_assert!(!near_miss.is_excluded());
    }
}

/// Spot-check the "kill" resolver's delete-coherence: once `resolve_kill`
/// calls a path `Actionable`, applying every resolution from the same
/// batch never leaves `local` disagreeing with `current` for that path.
#[test]
fn kill_actionable_matches_current_when_present() {
    let path = RelPath::new("a.txt").expect("valid literal path");
    let fp = some_fingerprint(1);
    let current = Inventory::from_entries([(path.clone(), fp)]);
    let local = Inventory::from_entries([(path.clone(), fp)]);
    let candidates: BTreeSet<_> = [path].into_iter().collect();

    let resolutions = resolve_kill(&current, &local, &candidates);
    assert_eq!(resolutions[0].verdict, Verdict::Actionable);
}
