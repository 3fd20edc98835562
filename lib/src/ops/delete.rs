use std::path::Path;

use color_eyre::eyre::{Context, Result};

use crate::{error::DatError, store::ObjectStore, RepoPaths};

/// The confirmation phrase `delete` requires, since this is irreversible.
pub const CONFIRMATION: &str = "delete this repository";

/// `delete` — remove the remote prefix/bucket and the local `.dat/`
/// directory.
///
/// Per the project's adoption of spec's redesign recommendation, this
/// requires the caller to have already obtained the exact confirmation
/// phrase from the user (a typed string, not a one-letter y/N prompt); the
/// orchestrator itself just enforces that the phrase matches before doing
/// anything irreversible.
#[tracing::instrument(skip(store))]
pub async fn delete(root: &Path, store: &dyn ObjectStore, confirmation: &str) -> Result<()> {
    if confirmation != CONFIRMATION {
        return Err(DatError::UserAbort).context("delete");
    }

    store.remove_prefix().await.context("remove remote data")?;

    let paths = RepoPaths::new(root);
    match tokio::fs::remove_dir_all(paths.dat_dir()).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("remove {}", paths.dat_dir().display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::local::LocalStore;

    #[test_log::test(tokio::test)]
    async fn refuses_without_exact_confirmation() {
        let working = tempfile::tempdir().expect("tempdir");
        let remote = tempfile::tempdir().expect("tempdir");
        let store = LocalStore::new(remote.path());
        let result = delete(working.path(), &store, "yes").await;
        assert!(result.is_err());
    }

    #[test_log::test(tokio::test)]
    async fn removes_local_dat_dir_and_remote() {
        let working = tempfile::tempdir().expect("tempdir");
        let remote = tempfile::tempdir().expect("tempdir");
        tokio::fs::create_dir_all(working.path().join(".dat")).await.unwrap();
        tokio::fs::write(working.path().join(".dat").join("config"), "aws: bucket\n").await.unwrap();

        let store = LocalStore::new(remote.path());
        delete(working.path(), &store, CONFIRMATION).await.expect("delete");

        assert!(!tokio::fs::try_exists(working.path().join(".dat")).await.unwrap());
    }
}
