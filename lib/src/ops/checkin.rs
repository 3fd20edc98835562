use std::path::Path;

use color_eyre::eyre::{bail, Context, Result};

use crate::{
    config::Config, fingerprint::fingerprint_file, inventory::Inventory, store::ObjectStore, RepoPaths,
};

/// `checkin <file>` — upload a single path and the master object, updating
/// `.dat/local` for that path only.
///
/// One-shot administrative command: skips classification/resolution
/// entirely and just pushes the named file's current content, the way the
/// original tool's single-file commands bypass the sync machinery.
#[tracing::instrument(skip(store))]
pub async fn checkin(root: &Path, store: &dyn ObjectStore, config: &Config, file: &str) -> Result<()> {
    let paths = RepoPaths::new(root);
    let walk_root = paths.walk_root(config.subdir.as_deref());
    let rel_path = crate::inventory::RelPath::new(file)?;
    let absolute = walk_root.join(rel_path.as_str());

    if !tokio::fs::try_exists(&absolute).await.unwrap_or(false) {
        bail!("{} does not exist", absolute.display());
    }

    let fingerprint = fingerprint_file(&absolute).await.context("fingerprint file")?;
    let mut master = store.fetch_master().await.context("fetch remote master")?.unwrap_or_default();
    master.insert(rel_path.clone(), fingerprint);

    let upload_set = [rel_path.clone()].into_iter().collect();
    store
        .sync_upload(&walk_root, &upload_set, &master)
        .await
        .context("upload file")?;

    let mut local = Inventory::read(&paths.local()).await.context("read local snapshot")?;
    local.insert(rel_path, fingerprint);
    local.write_atomic(&paths.local()).await.context("write local snapshot")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::local::LocalStore;
    use pretty_assertions::assert_eq;

    #[test_log::test(tokio::test)]
    async fn checkin_uploads_and_updates_local() {
        let working = tempfile::tempdir().expect("tempdir");
        let remote = tempfile::tempdir().expect("tempdir");
        std::fs::write(working.path().join("a.txt"), "hi").expect("write");

        let store = LocalStore::new(remote.path());
        let config = Config::new("bucket");
        checkin(working.path(), &store, &config, "a.txt").await.expect("checkin");

        let paths = RepoPaths::new(working.path());
        let local = Inventory::read(&paths.local()).await.expect("read local");
        assert!(local.contains(&crate::inventory::RelPath::new("a.txt").unwrap()));

        let master = store.fetch_master().await.expect("fetch").expect("some master");
        assert!(master.contains(&crate::inventory::RelPath::new("a.txt").unwrap()));
    }

    #[test_log::test(tokio::test)]
    async fn checkin_missing_file_errors() {
        let working = tempfile::tempdir().expect("tempdir");
        let remote = tempfile::tempdir().expect("tempdir");
        let store = LocalStore::new(remote.path());
        let config = Config::new("bucket");
        let result = checkin(working.path(), &store, &config, "missing.txt").await;
        assert!(result.is_err());
    }
}
