use std::path::Path;

use color_eyre::eyre::{Context, Result};
use tracing::{info, warn};

use crate::{
    classify::classify,
    config::Config,
    inventory::Inventory,
    resolve::{apply_resolution, resolve_purge, resolve_push, Verdict},
    store::ObjectStore,
    RepoPaths,
};

use super::SyncOutcome;

/// `push` — upload local adds/modifies, delete remote objects that were
/// removed locally, and advance `.dat/local` and the remote master to
/// match once the transport call confirms success.
///
/// `dry_run` computes and reports the same [`SyncOutcome`] a real push
/// would produce, but returns before touching the remote, `.dat/local`, or
/// `.dat/config` — matching spec's "`push -d` ... changes nothing on disk
/// or in the store".
#[tracing::instrument(skip(store, config))]
pub async fn push(root: &Path, store: &dyn ObjectStore, config: &mut Config, dry_run: bool) -> Result<SyncOutcome> {
    let paths = RepoPaths::new(root);
    let walk_root = paths.walk_root(config.subdir.as_deref());

    let current = crate::walker::walk(&walk_root).await.context("walk working tree")?;
    let local = Inventory::read(&paths.local()).await.context("read local snapshot")?;

    // push/purge classification never consults master, so this is safe to
    // compute before paying for a network round trip.
    let candidates = classify(&current, &local, &Inventory::default());
    if candidates.push.is_empty() && candidates.purge.is_empty() {
        info!("everything up-to-date");
        return Ok(SyncOutcome::default());
    }

    if !config.pushed && !dry_run {
        store
            .create_prefix(config.region())
            .await
            .context("create remote prefix")?;
    }

    let master = store.fetch_master().await.context("fetch remote master")?.unwrap_or_default();

    let push_resolutions = resolve_push(&current, &local, &master, &candidates.push);
    let purge_resolutions = resolve_purge(&local, &master, &candidates.purge);

    let mut local_after = local.clone();
    let mut master_after = master.clone();
    let mut outcome = SyncOutcome::default();
    let mut upload_paths = std::collections::BTreeSet::new();

    for resolution in push_resolutions.iter().chain(purge_resolutions.iter()) {
        match resolution.verdict {
            Verdict::Conflict => {
                warn!(path = %resolution.path, "push conflict");
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

    // `sync_upload` reconciles every path it's given against the working
    // tree, uploading what's present and deleting what isn't — so both the
    // push (add/modify) and purge (delete) actionable sets must be passed
    // in together, not just the uploads.
    for resolution in push_resolutions.iter().chain(purge_resolutions.iter()) {
        if resolution.verdict == Verdict::Actionable {
            upload_paths.insert(resolution.path.clone());
        }
    }

    if outcome.applied.is_empty() {
        if outcome.conflicts.is_empty() {
            info!("everything up-to-date");
        } else {
            warn!(conflicts = outcome.conflicts.len(), "nothing pushed: every candidate is a conflict");
        }
        return Ok(outcome);
    }

    if dry_run {
        info!(applied = outcome.applied.len(), conflicts = outcome.conflicts.len(), "dry run: not uploading");
        return Ok(outcome);
    }

    store
        .sync_upload(&walk_root, &upload_paths, &master_after)
        .await
        .context("upload changes")?;

    local_after.write_atomic(&paths.local()).await.context("write local snapshot")?;

    if !config.pushed {
        config.pushed = true;
        config.write(&paths.config()).await.context("write config")?;
    }

    Ok(outcome)
}
