use std::path::{Path, PathBuf};

use color_eyre::eyre::{Context, Result};
use dat_core::{config::Config, error::DatError, RepoPaths, CONFIG_FILE, DAT_DIR};

/// Walk upward from `start` looking for a `.dat/config`, the way a VCS
/// client locates its repository root from an arbitrary working directory.
pub fn find_root(start: &Path) -> Result<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        if dir.join(DAT_DIR).join(CONFIG_FILE).is_file() {
            return Ok(dir);
        }
        if !dir.pop() {
            return Err(DatError::NotARepo).context("locate .dat directory");
        }
    }
}

/// Locate the repository root from the current directory and load its
/// config in one step, the common case for every command except `init` and
/// `clone`.
pub async fn current_repo() -> Result<(PathBuf, Config)> {
    let cwd = std::env::current_dir().context("get current directory")?;
    let root = find_root(&cwd)?;
    let config = Config::read(&RepoPaths::new(&root).config()).await.context("read config")?;
    Ok((root, config))
}
