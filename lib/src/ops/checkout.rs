use std::path::Path;

use color_eyre::eyre::{bail, Context, Result};

use crate::{config::Config, inventory::Inventory, store::ObjectStore, RepoPaths};

/// `checkout <file>` — download a single path, updating `.dat/local` for
/// that path only.
#[tracing::instrument(skip(store))]
pub async fn checkout(root: &Path, store: &dyn ObjectStore, config: &Config, file: &str) -> Result<()> {
    let paths = RepoPaths::new(root);
    let walk_root = paths.walk_root(config.subdir.as_deref());
    let rel_path = crate::inventory::RelPath::new(file)?;

    let master = store.fetch_master().await.context("fetch remote master")?.unwrap_or_default();
    let Some(fingerprint) = master.get(&rel_path) else {
        bail!("{} is not tracked on the remote", rel_path);
    };

    let download_set = [rel_path.clone()].into_iter().collect();
    store
        .sync_download(&walk_root, &download_set)
        .await
        .context("download file")?;

    let mut local = Inventory::read(&paths.local()).await.context("read local snapshot")?;
    local.insert(rel_path, fingerprint);
    local.write_atomic(&paths.local()).await.context("write local snapshot")?;

    Ok(())
}
