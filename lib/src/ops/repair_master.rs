use std::path::Path;

use color_eyre::eyre::{Context, Result};

use crate::{inventory::Inventory, store::ObjectStore};

/// `repair-master` — rebuild the remote master object by walking what the
/// remote store actually holds, rather than trusting whatever `.dat/master`
/// currently claims.
///
/// Fingerprinting requires real content, not just an object listing, so
/// this downloads every tracked remote path into a scratch directory and
/// reuses the same walk-and-fingerprint pipeline [`crate::walker::walk`]
/// uses for the working tree, then writes the result back as the one true
/// master object.
#[tracing::instrument(skip(store))]
pub async fn repair_master(store: &dyn ObjectStore) -> Result<Inventory> {
    let remote_paths = store.list_paths().await.context("list remote paths")?;

    let scratch = tempfile::tempdir().context("create scratch directory")?;
    store
        .sync_download(scratch.path(), &remote_paths)
        .await
        .context("download remote tree into scratch directory")?;

    let rebuilt = crate::walker::walk(scratch.path()).await.context("walk scratch directory")?;
    store.write_master(&rebuilt).await.context("write rebuilt master")?;

    Ok(rebuilt)
}
