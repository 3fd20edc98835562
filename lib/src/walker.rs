use std::path::Path;

use color_eyre::eyre::{Context, Result};
use tokio::task::JoinSet;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::{
    fingerprint::fingerprint_file,
    inventory::{Inventory, RelPath},
};

/// Recursively enumerate `root` into a fresh [`Inventory`].
///
/// Excludes any entry whose first path component is `.dat` or `.git`, and
/// the literal leaf `.DS_Store`. Symlinks are followed only when they
/// resolve inside `root`; anything else is skipped rather than fingerprinted,
/// mirroring the fingerprinter's own symlink rule.
///
/// File fingerprinting is parallelized across a bounded [`JoinSet`], capped
/// at the number of available cores, since it's the only part of a walk
/// that's meaningfully CPU/IO bound per file.
#[tracing::instrument]
pub async fn walk(root: &Path) -> Result<Inventory> {
    let cap = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4);

    let mut candidates = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry.context("walk directory")?;
        if !entry.file_type().is_file() && !entry.file_type().is_symlink() {
            continue;
        }

        let absolute = entry.path().to_path_buf();
        let relative = absolute
            .strip_prefix(root)
            .context("make path relative to root")?
            .to_string_lossy()
            .replace(std::path::MAIN_SEPARATOR, "/");

        let rel_path = match RelPath::new(relative) {
            Ok(rel_path) => rel_path,
            Err(err) => {
                warn!(?err, path = %absolute.display(), "skipping path that cannot be represented in the inventory format");
                continue;
            }
        };

        if rel_path.is_excluded() {
            continue;
        }

        if entry.file_type().is_symlink() && !symlink_resolves_inside(&absolute, root)? {
            debug!(path = %absolute.display(), "skipping symlink that escapes the walk root");
            continue;
        }

        candidates.push((rel_path, absolute));
    }

    let mut inventory = Inventory::default();
    let mut tasks = JoinSet::new();
    let mut pending = candidates.into_iter();

    // Seed up to `cap` tasks, then top up as each completes.
    for _ in 0..cap {
        let Some((rel_path, absolute)) = pending.next() else {
            break;
        };
        tasks.spawn(async move {
            let fingerprint = fingerprint_file(&absolute).await;
            (rel_path, fingerprint)
        });
    }

    while let Some(result) = tasks.join_next().await {
        let (rel_path, fingerprint) = result.context("join fingerprint task")?;
        inventory.insert(rel_path, fingerprint?);

        if let Some((rel_path, absolute)) = pending.next() {
            tasks.spawn(async move {
                let fingerprint = fingerprint_file(&absolute).await;
                (rel_path, fingerprint)
            });
        }
    }

    Ok(inventory)
}

/// Whether a symlink's target resolves to a location inside `root`.
fn symlink_resolves_inside(path: &Path, root: &Path) -> Result<bool> {
    let Ok(resolved) = path.canonicalize() else {
        return Ok(false);
    };
    let Ok(root) = root.canonicalize() else {
        return Ok(false);
    };
    Ok(resolved.starts_with(root))
}
