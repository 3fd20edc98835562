use std::path::Path;

use color_eyre::eyre::{Context, Result};
use tracing::{info, warn};

use crate::{
    classify::classify,
    config::Config,
    inventory::Inventory,
    resolve::{apply_resolution, resolve_kill, resolve_pull, Verdict},
    store::ObjectStore,
    RepoPaths,
};

use super::SyncOutcome;

/// `pull` — download remote adds/modifies, remove local files that were
/// deleted remotely, and advance `.dat/local` once the transport call
/// confirms success.
///
/// `dry_run` reports the same [`SyncOutcome`] a real pull would produce
/// without downloading anything or rewriting `.dat/local`.
#[tracing::instrument(skip(store, config))]
pub async fn pull(root: &Path, store: &dyn ObjectStore, config: &Config, dry_run: bool) -> Result<SyncOutcome> {
    let paths = RepoPaths::new(root);
    let walk_root = paths.walk_root(config.subdir.as_deref());

    let current = crate::walker::walk(&walk_root).await.context("walk working tree")?;
    let local = Inventory::read(&paths.local()).await.context("read local snapshot")?;
    let master = store.fetch_master().await.context("fetch remote master")?.unwrap_or_default();

    let candidates = classify(&current, &local, &master);
    if candidates.pull.is_empty() && candidates.kill.is_empty() {
        info!("everything up-to-date");
        return Ok(SyncOutcome::default());
    }

    let pull_resolutions = resolve_pull(&current, &local, &master, &candidates.pull);
    let kill_resolutions = resolve_kill(&current, &local, &candidates.kill);

    let mut local_after = local.clone();
    let mut master_after = master.clone();
    let mut outcome = SyncOutcome::default();
    let mut download_paths = std::collections::BTreeSet::new();

    for resolution in pull_resolutions.iter().chain(kill_resolutions.iter()) {
        match resolution.verdict {
            Verdict::Conflict => {
                warn!(path = %resolution.path, "pull conflict");
                outcome.conflicts.push(resolution.path.clone());
            }
            Verdict::Resolved => {
                apply_resolution(&mut local_after, &mut master_after, resolution);
            }
            Verdict::Actionable => {
                apply_resolution(&mut local_after, &mut master_after, resolution);
                outcome.applied.push(resolution.path.clone());
            }
        }
    }

    // `sync_download` reconciles every path it's given against the remote
    // store, downloading what's present there and deleting what isn't — so
    // both the pull (add/modify) and kill (delete) actionable sets must be
    // passed in together, not just the downloads.
    for resolution in pull_resolutions.iter().chain(kill_resolutions.iter()) {
        if resolution.verdict == Verdict::Actionable {
            download_paths.insert(resolution.path.clone());
        }
    }

    if outcome.applied.is_empty() {
        if outcome.conflicts.is_empty() {
            info!("everything up-to-date");
        } else {
            warn!(conflicts = outcome.conflicts.len(), "nothing pulled: every candidate is a conflict");
        }
        return Ok(outcome);
    }

    if dry_run {
        info!(applied = outcome.applied.len(), conflicts = outcome.conflicts.len(), "dry run: not downloading");
        return Ok(outcome);
    }

    store
        .sync_download(&walk_root, &download_paths)
        .await
        .context("download changes")?;

    local_after.write_atomic(&paths.local()).await.context("write local snapshot")?;

    Ok(outcome)
}
