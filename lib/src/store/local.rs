use std::{collections::BTreeSet, future::Future, path::PathBuf, pin::Pin};
use std::path::Path;

use color_eyre::eyre::{Context, Result};
use tracing::debug;

use crate::{
    inventory::{Inventory, RelPath},
    store::{ObjectStore, MASTER_KEY},
};

/// A filesystem-backed [`ObjectStore`], standing in for a real bucket.
///
/// The reconciliation core and the orchestrator are exercised against a
/// plain directory tree here, so integration tests (and anyone
/// experimenting locally) never need real AWS credentials.
#[derive(Debug, Clone)]
pub struct LocalStore {
    remote_root: PathBuf,
}

impl LocalStore {
    /// Point a store at the given directory, which is created on first use.
    pub fn new(remote_root: impl Into<PathBuf>) -> Self {
        Self {
            remote_root: remote_root.into(),
        }
    }

    fn master_path(&self) -> PathBuf {
        self.remote_root.join(MASTER_KEY)
    }
}

impl ObjectStore for LocalStore {
    fn fetch_master(&self) -> Pin<Box<dyn Future<Output = Result<Option<Inventory>>> + Send + '_>> {
        Box::pin(async move {
            let path = self.master_path();
            match tokio::fs::read_to_string(&path).await {
                Ok(text) => Inventory::parse(&text).context("parse master inventory").map(Some),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e).with_context(|| format!("read {}", path.display())),
            }
        })
    }

    fn create_prefix<'a>(&'a self, _region: &'a str) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            tokio::fs::create_dir_all(&self.remote_root)
                .await
                .with_context(|| format!("create {}", self.remote_root.display()))
        })
    }

    fn sync_upload<'a>(
        &'a self,
        root: &'a Path,
        paths: &'a BTreeSet<RelPath>,
        master: &'a Inventory,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            reconcile(root, &self.remote_root, paths).await.context("reconcile uploads")?;
            self.write_master(master).await.context("write master inventory")?;
            Ok(())
        })
    }

    fn sync_download<'a>(
        &'a self,
        root: &'a Path,
        paths: &'a BTreeSet<RelPath>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move { reconcile(&self.remote_root, root, paths).await.context("reconcile downloads") })
    }

    fn remove_prefix(&self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            match tokio::fs::remove_dir_all(&self.remote_root).await {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e).with_context(|| format!("remove {}", self.remote_root.display())),
            }
        })
    }

    fn list_paths(&self) -> Pin<Box<dyn Future<Output = Result<BTreeSet<RelPath>>> + Send + '_>> {
        Box::pin(async move {
            if !tokio::fs::try_exists(&self.remote_root).await.unwrap_or(false) {
                return Ok(BTreeSet::new());
            }
            // `walk` already excludes `.dat/*`, so the master object never
            // shows up here.
            let remote = crate::walker::walk(&self.remote_root).await.context("walk remote tree")?;
            Ok(remote.path_set())
        })
    }

    fn write_master<'a>(&'a self, master: &'a Inventory) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            let master_path = self.master_path();
            if let Some(parent) = master_path.parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("create {}", parent.display()))?;
            }
            tokio::fs::write(&master_path, master.render())
                .await
                .with_context(|| format!("write {}", master_path.display()))
        })
    }
}

/// For each path in `paths`, copy it from `src_root` to `dst_root` if it
/// exists at the source, or remove it from `dst_root` if it doesn't.
///
/// `paths` is the exact scope of this call: anything outside it is left
/// untouched, matching `--exclude "*" --include <p1> --include <p2> …`.
async fn reconcile(src_root: &Path, dst_root: &Path, paths: &BTreeSet<RelPath>) -> Result<()> {
    for path in paths {
        let src = src_root.join(path.as_str());
        let dst = dst_root.join(path.as_str());

        if tokio::fs::try_exists(&src).await.unwrap_or(false) {
            if let Some(parent) = dst.parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("create {}", parent.display()))?;
            }
            tokio::fs::copy(&src, &dst)
                .await
                .with_context(|| format!("copy {} -> {}", src.display(), dst.display()))?;
        } else {
            match tokio::fs::remove_file(&dst).await {
                Ok(()) => {
                    debug!(path = %dst.display(), "removed file absent from source");
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e).with_context(|| format!("remove {}", dst.display())),
            }
        }
    }
    Ok(())
}
