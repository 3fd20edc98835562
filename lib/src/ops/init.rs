use std::path::Path;

use color_eyre::eyre::{ensure, Context, Result};

use crate::{config::default_id, config::Config, RepoPaths};

/// `init [bucket]` — create `.dat/` and write the initial config.
///
/// If `id` is not given, it is derived as `<user>.<cwd-path-dotted>`,
/// mirroring the original tool's default bucket naming.
#[tracing::instrument]
pub async fn init(
    root: &Path,
    id: Option<String>,
    profile: Option<String>,
    subdir: Option<String>,
) -> Result<Config> {
    let paths = RepoPaths::new(root);
    ensure!(
        !tokio::fs::try_exists(paths.config()).await.unwrap_or(false),
        "{} already exists; this directory is already a dat repository",
        paths.config().display()
    );

    let id = match id {
        Some(id) => id,
        None => default_id(root).context("derive default bucket id")?,
    };

    let mut config = Config::new(id);
    config.profile = profile;
    config.subdir = subdir;

    config.write(&paths.config()).await.context("write config")?;
    Ok(config)
}
