use clap::Parser;
use color_eyre::{eyre::Result, Section};
use dat_core::ops::delete::{delete, CONFIRMATION};
use tracing::info;

use crate::{repo::current_repo, store::connect};

#[derive(Debug, Parser)]
pub struct Options {
    /// Must equal the exact confirmation phrase; this command is
    /// irreversible.
    confirm: String,
}

#[tracing::instrument]
pub async fn main(opts: Options) -> Result<()> {
    let (root, config) = current_repo().await?;
    let store = connect(&config.aws, config.profile.as_deref()).await?;
    delete(&root, &store, &opts.confirm)
        .await
        .with_note(|| format!("pass `{CONFIRMATION}` exactly to confirm"))?;
    info!("repository deleted");
    Ok(())
}
