use color_eyre::eyre::{Context, Result};
use dat_core::store::{local::LocalStore, s3::S3Store, ObjectStore};

/// Set to a directory to redirect every command at a [`LocalStore`] rooted
/// there instead of S3, so integration tests can exercise the full CLI
/// without real credentials or network access.
pub const LOCAL_STORE_ROOT_VAR: &str = "DAT_LOCAL_STORE_ROOT";

/// Build the object store for a config's `aws` id and optional profile.
///
/// Factored out of the per-command modules since every command except
/// `init` needs one.
pub async fn connect(id: &str, profile: Option<&str>) -> Result<Box<dyn ObjectStore>> {
    if let Ok(root) = std::env::var(LOCAL_STORE_ROOT_VAR) {
        return Ok(Box::new(LocalStore::new(std::path::PathBuf::from(root).join(id))));
    }

    S3Store::builder()
        .id(id)
        .maybe_profile(profile.map(str::to_string))
        .call()
        .await
        .context("connect to object store")
        .map(|store| Box::new(store) as Box<dyn ObjectStore>)
}
