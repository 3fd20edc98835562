use std::{collections::BTreeSet, path::Path};

use color_eyre::eyre::{Context, Result};

use crate::{
    classify::classify,
    config::Config,
    inventory::{Inventory, RelPath},
    resolve::{resolve_kill, resolve_pull, resolve_purge, resolve_push, Verdict},
    store::ObjectStore,
    RepoPaths,
};

/// `status` with no flags: what a plain push/pull would do, without asking
/// the remote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalStatus {
    /// Paths a `push` would upload (new or changed locally).
    pub push: BTreeSet<RelPath>,
    /// Paths a `push` would delete remotely (removed locally).
    pub purge: BTreeSet<RelPath>,
    /// Whether this repository has never completed a push.
    pub never_pushed: bool,
}

#[tracing::instrument]
pub async fn status_local(root: &Path, config: &Config) -> Result<LocalStatus> {
    let paths = RepoPaths::new(root);
    let walk_root = paths.walk_root(config.subdir.as_deref());
    let current = crate::walker::walk(&walk_root).await.context("walk working tree")?;
    let local = Inventory::read(&paths.local()).await.context("read local snapshot")?;

    // push/purge classification never consults master.
    let candidates = classify(&current, &local, &Inventory::default());
    Ok(LocalStatus {
        push: candidates.push,
        purge: candidates.purge,
        never_pushed: !config.pushed,
    })
}

/// `status -r`: the full picture including what the remote has, partitioned
/// per spec into the categories a user actually wants to act on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteStatus {
    /// New or changed on the remote, safe to `pull`.
    pub modified_remotely: BTreeSet<RelPath>,
    /// New or changed locally, safe to `push`.
    pub modified_locally: BTreeSet<RelPath>,
    /// Removed on the remote, safe to let `pull` delete locally.
    pub deleted_remotely: BTreeSet<RelPath>,
    /// Removed locally, safe to let `push` delete remotely.
    pub deleted_locally: BTreeSet<RelPath>,
    /// Three-way divergences that need manual attention.
    ///
    /// Excludes [`RemoteStatus::deleted_remotely_modified_locally`], which
    /// is reported separately even though it is also a `kill` conflict.
    pub conflicts: BTreeSet<RelPath>,
    /// Deleted on the remote but modified in the working tree: `kill_conflict
    /// ∩ push`. Singled out because neither "conflicts" nor "deleted
    /// remotely" describes it precisely: the file is gone from master, but
    /// the working copy has moved on and would otherwise look like a new
    /// push candidate.
    pub deleted_remotely_modified_locally: BTreeSet<RelPath>,
}

/// Run the pull and push resolvers in dry form (never calling
/// [`crate::resolve::apply_resolution`]) and partition the results.
///
/// Leaves `.dat/local` and the remote master untouched: this is the
/// property spec'd as dry-run purity.
#[tracing::instrument(skip(store))]
pub async fn status_remote(root: &Path, store: &dyn ObjectStore, config: &Config) -> Result<RemoteStatus> {
    let paths = RepoPaths::new(root);
    let walk_root = paths.walk_root(config.subdir.as_deref());
    let current = crate::walker::walk(&walk_root).await.context("walk working tree")?;
    let local = Inventory::read(&paths.local()).await.context("read local snapshot")?;
    let master = store.fetch_master().await.context("fetch remote master")?.unwrap_or_default();

    let candidates = classify(&current, &local, &master);

    let push_resolutions = resolve_push(&current, &local, &master, &candidates.push);
    let purge_resolutions = resolve_purge(&local, &master, &candidates.purge);
    let pull_resolutions = resolve_pull(&current, &local, &master, &candidates.pull);
    let kill_resolutions = resolve_kill(&current, &local, &candidates.kill);

    let kill_conflicts: BTreeSet<RelPath> = kill_resolutions
        .iter()
        .filter(|r| r.verdict == Verdict::Conflict)
        .map(|r| r.path.clone())
        .collect();
    let cross = kill_conflicts.intersection(&candidates.push).cloned().collect::<BTreeSet<_>>();

    let modified_remotely = actionable_paths(&pull_resolutions);
    let modified_locally = actionable_paths(&push_resolutions);
    let deleted_remotely = actionable_paths(&kill_resolutions);
    let deleted_locally = actionable_paths(&purge_resolutions);

    let mut conflicts: BTreeSet<RelPath> = [&push_resolutions, &purge_resolutions, &pull_resolutions, &kill_resolutions]
        .into_iter()
        .flatten()
        .filter(|r| r.verdict == Verdict::Conflict)
        .map(|r| r.path.clone())
        .collect();
    for path in &cross {
        conflicts.remove(path);
    }

    Ok(RemoteStatus {
        modified_remotely,
        modified_locally,
        deleted_remotely,
        deleted_locally,
        conflicts,
        deleted_remotely_modified_locally: cross,
    })
}

fn actionable_paths(resolutions: &[crate::resolve::Resolution]) -> BTreeSet<RelPath> {
    resolutions
        .iter()
        .filter(|r| r.verdict == Verdict::Actionable)
        .map(|r| r.path.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{fingerprint::Fingerprint, store::local::LocalStore};
    use pretty_assertions::assert_eq;

    fn fp(hex: &str) -> Fingerprint {
        hex.parse().expect("parse fingerprint")
    }

    #[test_log::test(tokio::test)]
    async fn local_status_reports_never_pushed() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("a.txt"), "hi").expect("write");
        let config = Config::new("bucket");
        let status = status_local(dir.path(), &config).await.expect("status");
        assert!(status.never_pushed);
        assert!(status.push.contains(&RelPath::new("a.txt").unwrap()));
    }

    #[test_log::test(tokio::test)]
    async fn remote_status_partitions_modified_remotely() {
        let working = tempfile::tempdir().expect("tempdir");
        let remote = tempfile::tempdir().expect("tempdir");
        let store = LocalStore::new(remote.path());

        let mut master = Inventory::default();
        master.insert(RelPath::new("a.txt").unwrap(), fp(Fingerprint::EMPTY_HEX));
        store
            .sync_upload(working.path(), &BTreeSet::new(), &master)
            .await
            .expect("seed master");

        let config = Config::new("bucket");
        let status = status_remote(working.path(), &store, &config).await.expect("status");
        assert!(status.modified_remotely.contains(&RelPath::new("a.txt").unwrap()));
        assert!(status.conflicts.is_empty());
    }
}
