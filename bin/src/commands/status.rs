use clap::Parser;
use color_eyre::eyre::Result;
use dat_core::ops::status::{status_local, status_remote};

use crate::{repo::current_repo, store::connect};

#[derive(Debug, Parser)]
pub struct Options {
    /// Also contact the remote, reporting what a pull would bring in.
    #[clap(short = 'r', long)]
    remote: bool,
}

#[tracing::instrument]
pub async fn main(opts: Options) -> Result<()> {
    let (root, config) = current_repo().await?;

    if !opts.remote {
        let status = status_local(&root, &config).await?;
        if status.never_pushed {
            println!("this repository has never been pushed");
        }
        print_set("modified locally (would push)", &status.push);
        print_set("deleted locally (would purge remotely)", &status.purge);
        return Ok(());
    }

    let store = connect(&config.aws, config.profile.as_deref()).await?;
    let status = status_remote(&root, &store, &config).await?;
    print_set("modified remotely", &status.modified_remotely);
    print_set("modified locally", &status.modified_locally);
    print_set("deleted remotely", &status.deleted_remotely);
    print_set("deleted locally", &status.deleted_locally);
    print_set("deleted remotely but modified locally", &status.deleted_remotely_modified_locally);
    print_set("conflicts", &status.conflicts);
    Ok(())
}

fn print_set(label: &str, paths: &std::collections::BTreeSet<dat_core::inventory::RelPath>) {
    if paths.is_empty() {
        return;
    }
    println!("{label}:");
    for path in paths {
        println!("  {path}");
    }
}
