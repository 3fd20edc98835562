use clap::Parser;
use color_eyre::{eyre::Result, Section};
use dat_core::ops::overwrite_master::{overwrite_master, CONFIRMATION};
use tracing::info;

use crate::{repo::current_repo, store::connect};

#[derive(Debug, Parser)]
pub struct Options {
    /// Must equal the exact confirmation phrase; this command discards
    /// whatever the remote currently holds.
    confirm: String,
}

#[tracing::instrument]
pub async fn main(opts: Options) -> Result<()> {
    let (root, config) = current_repo().await?;
    let store = connect(&config.aws, config.profile.as_deref()).await?;
    overwrite_master(&root, &store, &config, &opts.confirm)
        .await
        .with_note(|| format!("pass `{CONFIRMATION}` exactly to confirm"))?;
    info!("remote master overwritten with the local tree");
    Ok(())
}
