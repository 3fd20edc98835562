use clap::Parser;
use color_eyre::eyre::Result;
use dat_core::ops::push::push;
use tracing::{info, warn};

use crate::{repo::current_repo, store::connect};

#[derive(Debug, Parser)]
pub struct Options {
    /// Report what would be uploaded/deleted without touching the remote
    /// or rewriting `.dat/local`.
    #[clap(short = 'd', long = "dry-run")]
    dry_run: bool,

    /// Override the region used when the remote prefix must be created.
    #[clap(long)]
    region: Option<String>,
}

#[tracing::instrument]
pub async fn main(opts: Options) -> Result<()> {
    let (root, mut config) = current_repo().await?;
    if let Some(region) = opts.region {
        config.region = Some(region);
    }
    let store = connect(&config.aws, config.profile.as_deref()).await?;

    let outcome = push(&root, &store, &mut config, opts.dry_run).await?;
    for path in &outcome.applied {
        info!(%path, "pushed");
    }
    for path in &outcome.conflicts {
        warn!(%path, "conflict, not pushed");
    }
    if outcome.is_up_to_date() {
        info!("everything up-to-date");
    }
    Ok(())
}
