use clap::Parser;
use color_eyre::eyre::Result;
use dat_core::ops::checkin::checkin;
use tracing::info;

use crate::{repo::current_repo, store::connect};

#[derive(Debug, Parser)]
pub struct Options {
    /// Path, relative to the working root, to upload.
    file: String,
}

#[tracing::instrument]
pub async fn main(opts: Options) -> Result<()> {
    let (root, config) = current_repo().await?;
    let store = connect(&config.aws, config.profile.as_deref()).await?;
    checkin(&root, &store, &config, &opts.file).await?;
    info!(file = %opts.file, "checked in");
    Ok(())
}
