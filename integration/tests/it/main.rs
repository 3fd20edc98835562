use std::path::{Path, PathBuf};

use assert_cmd::Command;

mod conflicts;
mod stash;
mod status;
mod sync;

/// The root directory of the workspace.
pub fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("workspace root")
        .to_path_buf()
}

/// Build a `dat` invocation rooted at `cwd`, redirected at a [`LocalStore`]
/// under `store_root` instead of a real S3 bucket.
///
/// [`LocalStore`]: dat_core::store::local::LocalStore
pub fn dat(cwd: &Path, store_root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("dat").expect("find dat binary");
    cmd.current_dir(cwd);
    cmd.env("DAT_LOCAL_STORE_ROOT", store_root);
    cmd
}
