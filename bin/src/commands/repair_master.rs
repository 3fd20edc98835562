use clap::Parser;
use color_eyre::eyre::Result;
use dat_core::ops::repair_master::repair_master;
use tracing::info;

use crate::{repo::current_repo, store::connect};

#[derive(Debug, Parser)]
pub struct Options {}

#[tracing::instrument]
pub async fn main(_opts: Options) -> Result<()> {
    let (_root, config) = current_repo().await?;
    let store = connect(&config.aws, config.profile.as_deref()).await?;
    let rebuilt = repair_master(&store).await?;
    info!(entries = rebuilt.len(), "rebuilt remote master");
    Ok(())
}
