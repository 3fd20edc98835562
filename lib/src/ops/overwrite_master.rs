use std::path::Path;

use color_eyre::eyre::{Context, Result};

use crate::{config::Config, error::DatError, inventory::Inventory, store::ObjectStore, RepoPaths};

/// The confirmation phrase `overwrite-master` requires.
pub const CONFIRMATION: &str = "overwrite master with local";

/// `overwrite-master` — unconditionally replace the remote with the local
/// tree, bypassing classification and conflict detection entirely.
///
/// An escape hatch for "master is corrupt, the working tree is right, fix
/// it" situations; requires a typed confirmation phrase rather than a
/// one-letter y/N prompt, per the project's adoption of spec's redesign
/// recommendation.
#[tracing::instrument(skip(store))]
pub async fn overwrite_master(root: &Path, store: &dyn ObjectStore, config: &Config, confirmation: &str) -> Result<()> {
    if confirmation != CONFIRMATION {
        return Err(DatError::UserAbort).context("overwrite-master");
    }

    let paths = RepoPaths::new(root);
    let walk_root = paths.walk_root(config.subdir.as_deref());
    let current = crate::walker::walk(&walk_root).await.context("walk working tree")?;

    store
        .sync_upload(&walk_root, &current.path_set(), &current)
        .await
        .context("upload full working tree")?;

    current.write_atomic(&paths.local()).await.context("write local snapshot")
}
