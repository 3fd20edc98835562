use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use dat_core::ops::stash::{stash, stash_pop};
use tracing::info;

use crate::{repo::current_repo, store::connect};

#[derive(Debug, Parser)]
pub struct Options {
    #[command(subcommand)]
    command: Option<StashCommand>,
}

#[derive(Debug, Subcommand)]
enum StashCommand {
    /// Restore stashed files to their original paths.
    Pop {
        /// Overwrite an existing working-tree file instead of refusing.
        #[clap(long)]
        hard: bool,
    },
}

#[tracing::instrument]
pub async fn main(opts: Options) -> Result<()> {
    let (root, config) = current_repo().await?;

    match opts.command {
        None => {
            let store = connect(&config.aws, config.profile.as_deref()).await?;
            let stashed = stash(&root, &store, &config).await?;
            if stashed.is_empty() {
                info!("nothing to stash");
            } else {
                for path in &stashed {
                    info!(%path, "stashed");
                }
            }
            Ok(())
        }
        Some(StashCommand::Pop { hard }) => {
            let restored = stash_pop(&root, &config, hard).await?;
            for path in &restored {
                info!(%path, "restored");
            }
            Ok(())
        }
    }
}
