pub mod local;
pub mod s3;

use std::{collections::BTreeSet, future::Future, path::Path, pin::Pin};

use color_eyre::eyre::Result;

use crate::inventory::{Inventory, RelPath};

/// Transport abstraction over a remote object-store prefix.
///
/// This is the only place that talks to a concrete backend; the
/// reconciliation core (`classify`/`resolve`) and the orchestrator never
/// need real credentials to be tested, since both backends in this crate
/// implement the same contract. Orchestrator functions take `&dyn
/// ObjectStore`, so methods are expressed as manually boxed futures rather
/// than `impl Future` return-position-impl-trait, which isn't object-safe
/// — the same technique the wider codebase already uses for returning a
/// boxed stream from a trait method.
pub trait ObjectStore: std::fmt::Debug + Send + Sync {
    /// Download and parse the remote `.dat/master` object.
    ///
    /// Returns `Ok(None)` when the object does not exist (first use, or a
    /// prefix that was never pushed to).
    fn fetch_master(&self) -> Pin<Box<dyn Future<Output = Result<Option<Inventory>>> + Send + '_>>;

    /// Create the backing bucket, if the configured id is bucket-only (no
    /// `/prefix` suffix). Idempotent.
    fn create_prefix<'a>(&'a self, region: &'a str) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

    /// Reconcile every path in `paths` against `root`: a path present under
    /// `root` is uploaded, a path absent from `root` is deleted remotely.
    /// Also (re-)uploads the rendered `master` inventory.
    ///
    /// `paths` is the full scope of this call, not a filter over a larger
    /// listing: this mirrors `--exclude "*" --include <p1> --include <p2>
    /// …`, where only the included patterns are ever touched and every
    /// other object is left alone. Callers pass the union of the
    /// actionable add/modify set and the actionable delete set, never a
    /// subset — passing only the adds here would delete everything the
    /// caller forgot to mention. Uploads never follow symlinks.
    fn sync_upload<'a>(
        &'a self,
        root: &'a Path,
        paths: &'a BTreeSet<RelPath>,
        master: &'a Inventory,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

    /// Reconcile every path in `paths` against the remote store: a path
    /// present remotely is downloaded into `root`, a path absent remotely
    /// is deleted from `root`. Same include-list discipline as
    /// [`sync_upload`](ObjectStore::sync_upload), with source and
    /// destination swapped.
    fn sync_download<'a>(
        &'a self,
        root: &'a Path,
        paths: &'a BTreeSet<RelPath>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

    /// Recursively remove every object under the prefix, and the bucket
    /// itself when the configured id is bare (no `/prefix` suffix).
    fn remove_prefix(&self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

    /// List every tracked path under the prefix (excluding `.dat/master`
    /// itself), without downloading any content.
    ///
    /// Used by `repair-master`, which needs to enumerate what the remote
    /// actually holds independently of whatever `.dat/master` currently
    /// claims.
    fn list_paths(&self) -> Pin<Box<dyn Future<Output = Result<BTreeSet<RelPath>>> + Send + '_>>;

    /// Overwrite the remote `.dat/master` object directly, without touching
    /// any other object.
    fn write_master<'a>(&'a self, master: &'a Inventory) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;
}

/// The object key under which the master inventory is stored, relative to
/// the configured prefix.
pub const MASTER_KEY: &str = ".dat/master";
