#![deny(clippy::uninlined_format_args)]
#![deny(clippy::unwrap_used)]
#![deny(unsafe_code)]
#![warn(rust_2018_idioms)]

use clap::{
    builder::{styling::AnsiColor, Styles},
    Parser,
};
use color_eyre::{eyre::Result, Section};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{self, prelude::*};

mod commands;
mod repo;
mod store;

#[derive(Debug, Parser)]
#[command(version, about, styles = style())]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Parser)]
enum Commands {
    /// Create a `.dat/` repository in the current directory
    Init(commands::init::Options),

    /// Clone a remote bucket/prefix into a new local folder
    Clone(commands::clone::Options),

    /// Upload local changes and delete remote objects removed locally
    Push(commands::push::Options),

    /// Download remote changes and delete local files removed remotely
    Pull(commands::pull::Options),

    /// Show what a push (and, with `-r`, a pull) would do
    Status(commands::status::Options),

    /// Quarantine conflicted files so a pull can proceed
    Stash(commands::stash::Options),

    /// Upload a single file and the master object
    Checkin(commands::checkin::Options),

    /// Download a single file
    Checkout(commands::checkout::Options),

    /// Remove the remote data and the local `.dat/` directory
    Delete(commands::delete::Options),

    /// Unconditionally replace the remote with the local tree
    OverwriteMaster(commands::overwrite_master::Options),

    /// Rebuild the remote master object by walking the remote tree
    RepairMaster(commands::repair_master::Options),
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::registry()
        .with(tracing_error::ErrorLayer::default())
        .with(
            tracing_tree::HierarchicalLayer::default()
                .with_indent_lines(true)
                .with_indent_amount(2)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_verbose_exit(false)
                .with_verbose_entry(false)
                .with_deferred_spans(true)
                .with_bracketed_fields(true)
                .with_span_retrace(true)
                .with_targets(false),
        )
        .with(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    match Cli::parse().command {
        Commands::Init(opts) => commands::init::main(opts).await,
        Commands::Clone(opts) => commands::clone::main(opts).await,
        Commands::Push(opts) => commands::push::main(opts).await,
        Commands::Pull(opts) => commands::pull::main(opts).await,
        Commands::Status(opts) => commands::status::main(opts).await,
        Commands::Stash(opts) => commands::stash::main(opts).await,
        Commands::Checkin(opts) => commands::checkin::main(opts).await,
        Commands::Checkout(opts) => commands::checkout::main(opts).await,
        Commands::Delete(opts) => commands::delete::main(opts).await,
        Commands::OverwriteMaster(opts) => commands::overwrite_master::main(opts).await,
        Commands::RepairMaster(opts) => commands::repair_master::main(opts).await,
    }
    .with_warning(|| {
        "Authentication errors are sometimes reported when the actual issue \
        is that the object store rejected the request for an unrelated reason. \
        This depends on the behavior of the remote object store."
    })
}

fn style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Yellow.on_default())
        .usage(AnsiColor::Green.on_default())
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
        .error(AnsiColor::Red.on_default())
        .invalid(AnsiColor::Red.on_default())
        .valid(AnsiColor::Blue.on_default())
}
