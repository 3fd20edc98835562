use std::path::Path;

use color_eyre::eyre::{Context, Result};

use crate::{config::Config, store::ObjectStore, RepoPaths};

/// `clone <bucket> [folder]` — download a full remote prefix into a new
/// local folder and write a config with `pushed = true`.
#[tracing::instrument(skip(store))]
pub async fn clone(
    store: &dyn ObjectStore,
    folder: &Path,
    id: String,
    profile: Option<String>,
    subdir: Option<String>,
) -> Result<Config> {
    tokio::fs::create_dir_all(folder)
        .await
        .with_context(|| format!("create {}", folder.display()))?;

    let master = store
        .fetch_master()
        .await
        .context("fetch remote master")?
        .context("remote has no master object; nothing to clone")?;

    let paths = master.path_set();
    let paths_root = RepoPaths::new(folder).walk_root(subdir.as_deref());
    store
        .sync_download(&paths_root, &paths)
        .await
        .context("download remote files")?;

    let mut config = Config::new(id);
    config.pushed = true;
    config.profile = profile;
    config.subdir = subdir;

    let paths = RepoPaths::new(folder);
    config.write(&paths.config()).await.context("write config")?;
    master
        .write_atomic(&paths.local())
        .await
        .context("write local snapshot")?;

    Ok(config)
}
