use std::path::Path;

use color_eyre::eyre::{bail, Context, Result};
use tracing::{info, warn};

use crate::{
    classify::classify,
    config::Config,
    error::DatError,
    inventory::Inventory,
    resolve::{resolve_kill, resolve_pull, Verdict},
    store::ObjectStore,
    RepoPaths,
};

/// `stash` — quarantine every conflicted path so a `pull` can proceed.
///
/// Runs the pull and kill resolvers in dry form to find the conflict set
/// (mirroring spec's "run the pull+kill resolvers to derive the conflict
/// set"), moves each conflicted working-tree file into `.dat/stash/`, and
/// drops it from `.dat/local` so the next `pull` no longer sees it as a
/// three-way divergence. Refuses if a stash already exists.
#[tracing::instrument(skip(store))]
pub async fn stash(root: &Path, store: &dyn ObjectStore, config: &Config) -> Result<Vec<String>> {
    let paths = RepoPaths::new(root);
    if tokio::fs::try_exists(paths.stash()).await.unwrap_or(false) {
        return Err(DatError::StashExists).context("stash");
    }

    let walk_root = paths.walk_root(config.subdir.as_deref());
    let current = crate::walker::walk(&walk_root).await.context("walk working tree")?;
    let local = Inventory::read(&paths.local()).await.context("read local snapshot")?;
    let master = store.fetch_master().await.context("fetch remote master")?.unwrap_or_default();

    let candidates = classify(&current, &local, &master);
    let pull_conflicts: Vec<_> = resolve_pull(&current, &local, &master, &candidates.pull)
        .into_iter()
        .filter(|r| r.verdict == Verdict::Conflict)
        .collect();
    let kill_conflicts: Vec<_> = resolve_kill(&current, &local, &candidates.kill)
        .into_iter()
        .filter(|r| r.verdict == Verdict::Conflict)
        .collect();

    let mut local_after = local.clone();
    let mut stashed = Vec::new();

    for resolution in pull_conflicts.iter().chain(kill_conflicts.iter()) {
        let src = walk_root.join(resolution.path.as_str());
        let dst = paths.stash().join(resolution.path.as_str());
        if let Some(parent) = dst.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("create {}", parent.display()))?;
        }
        tokio::fs::rename(&src, &dst)
            .await
            .with_context(|| format!("move {} -> {}", src.display(), dst.display()))?;
        local_after.remove(&resolution.path);
        info!(path = %resolution.path, "stashed conflicted file");
        stashed.push(resolution.path.as_str().to_string());
    }

    if stashed.is_empty() {
        info!("nothing to stash");
        return Ok(stashed);
    }

    local_after.write_atomic(&paths.local()).await.context("write local snapshot")?;
    Ok(stashed)
}

/// `stash pop` — restore every stashed file to its original path.
///
/// Refuses to overwrite an existing working-tree file unless `hard` is set,
/// matching the original tool's `--hard` escape hatch.
#[tracing::instrument]
pub async fn stash_pop(root: &Path, config: &Config, hard: bool) -> Result<Vec<String>> {
    let paths = RepoPaths::new(root);
    let stash_dir = paths.stash();
    if !tokio::fs::try_exists(&stash_dir).await.unwrap_or(false) {
        return Err(DatError::StashMissing).context("stash pop");
    }

    let entries = crate::walker::walk(&stash_dir).await.context("walk stash")?;
    if entries.is_empty() {
        tokio::fs::remove_dir_all(&stash_dir).await.with_context(|| format!("remove {}", stash_dir.display()))?;
        return Ok(Vec::new());
    }

    let walk_root = paths.walk_root(config.subdir.as_deref());
    let mut restored = Vec::new();

    for path in entries.keys() {
        let src = stash_dir.join(path.as_str());
        let dst = walk_root.join(path.as_str());
        if !hard && tokio::fs::try_exists(&dst).await.unwrap_or(false) {
            bail!(DatError::StashWouldOverwrite { path: dst });
        }
        if let Some(parent) = dst.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("create {}", parent.display()))?;
        }
        tokio::fs::rename(&src, &dst)
            .await
            .with_context(|| format!("move {} -> {}", src.display(), dst.display()))?;
        if hard {
            warn!(path = %path, "overwrote existing file while popping stash");
        }
        restored.push(path.as_str().to_string());
    }

    match tokio::fs::remove_dir_all(&stash_dir).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e).with_context(|| format!("remove {}", stash_dir.display())),
    }

    Ok(restored)
}
