use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use dat_core::ops::clone::clone;
use tracing::info;

use crate::store::connect;

#[derive(Debug, Parser)]
pub struct Options {
    /// Bucket, or `bucket/prefix`, to clone.
    bucket: String,

    /// Destination directory. Defaults to the last path component of
    /// `bucket`.
    folder: Option<PathBuf>,

    /// Named AWS credential profile to use for this repository.
    #[clap(long)]
    profile: Option<String>,

    /// Treat only this subdirectory of the working tree as the synced root.
    #[clap(long)]
    subdir: Option<String>,
}

#[tracing::instrument]
pub async fn main(opts: Options) -> Result<()> {
    let folder = opts.folder.unwrap_or_else(|| {
        PathBuf::from(opts.bucket.rsplit('/').next().unwrap_or(&opts.bucket))
    });

    let store = connect(&opts.bucket, opts.profile.as_deref()).await?;
    let config = clone(&store, &folder, opts.bucket, opts.profile, opts.subdir).await?;
    info!(folder = %folder.display(), bucket = %config.aws, "cloned");
    Ok(())
}
