use clap::Parser;
use color_eyre::eyre::Result;
use dat_core::ops::pull::pull;
use tracing::{info, warn};

use crate::{repo::current_repo, store::connect};

#[derive(Debug, Parser)]
pub struct Options {
    /// Report what would be downloaded/deleted without touching the
    /// working tree or rewriting `.dat/local`.
    #[clap(short = 'd', long = "dry-run")]
    dry_run: bool,

    /// Override the region used for this pull (currently unused by reads,
    /// kept for CLI symmetry with `push --region`).
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

    let outcome = pull(&root, &store, &config, opts.dry_run).await?;
    for path in &outcome.applied {
        info!(%path, "pulled");
    }
    for path in &outcome.conflicts {
        warn!(%path, "conflict, not pulled");
    }
    if outcome.is_up_to_date() {
        info!("everything up-to-date");
    }
    Ok(())
}
