use clap::Parser;
use color_eyre::eyre::{Context, Result};
use dat_core::ops::init::init;
use tracing::info;

#[derive(Debug, Parser)]
pub struct Options {
    /// Bucket, or `bucket/prefix`, to sync with.
    ///
    /// If omitted, derived from the invoking user and the current
    /// directory.
    bucket: Option<String>,

    /// Named AWS credential profile to use for this repository.
    #[clap(long)]
    profile: Option<String>,

    /// Treat only this subdirectory of the working tree as the synced root.
    #[clap(long)]
    subdir: Option<String>,
}

#[tracing::instrument]
pub async fn main(opts: Options) -> Result<()> {
    let root = std::env::current_dir().context("get current directory")?;
    let config = init(&root, opts.bucket, opts.profile, opts.subdir).await?;
    info!(bucket = %config.aws, "initialized dat repository");
    Ok(())
}
