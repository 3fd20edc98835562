use std::path::PathBuf;

use thiserror::Error;

/// Domain-specific error taxonomy for `dat`.
///
/// These variants carry the structured data needed to render the single
/// colored line spec'd for user-facing failures; narration (`Section`,
/// "Examples:" blocks, etc) is attached at the call site with
/// `color_eyre::eyre::Context`/`Section`, not baked in here.
#[derive(Debug, Error)]
pub enum DatError {
    /// No `.dat/config` was found in the working directory or any ancestor.
    #[error("not a dat repository (no .dat/config found)")]
    NotARepo,

    /// The remote responded with an authentication or credential failure.
    #[error("authentication failed talking to the object store")]
    TransportAuth,

    /// The remote failed for some other reason (network, service error, etc).
    #[error("object store request failed: {message}")]
    TransportOther {
        /// Description of what went wrong, as reported by the transport.
        message: String,
    },

    /// A local file could not be read or written.
    #[error("local I/O error at {path:?}: {message}")]
    LocalIo {
        /// The path that could not be read or written.
        path: PathBuf,
        /// Description of the underlying failure.
        message: String,
    },

    /// `.dat/config` exists but could not be parsed.
    #[error("malformed config at line {line}: {content:?}")]
    ConfigMalformed {
        /// The 1-indexed line number of the offending entry.
        line: usize,
        /// The raw content of the offending line.
        content: String,
    },

    /// `stash` was run while `.dat/stash/` already exists.
    #[error("a stash already exists; run `stash pop` first")]
    StashExists,

    /// `stash pop` was run with nothing stashed.
    #[error("no stash exists")]
    StashMissing,

    /// `stash pop` would overwrite an existing working-tree file.
    #[error("{path:?} already exists; rerun with --hard to overwrite")]
    StashWouldOverwrite {
        /// The path that would have been overwritten.
        path: PathBuf,
    },

    /// The configured bucket does not exist and the command cannot create it.
    #[error("bucket {id:?} does not exist")]
    BucketMissing {
        /// The bucket (or bucket/prefix) id that was missing.
        id: String,
    },

    /// The user declined an interactive confirmation.
    #[error("aborted: confirmation did not match")]
    UserAbort,
}
