use std::{
    collections::{btree_map, BTreeMap, BTreeSet},
    fmt,
    path::Path,
};

use color_eyre::{
    eyre::{ensure, Context, Result},
    Section,
};

use crate::{error::DatError, fingerprint::Fingerprint};

/// A validated relative path within a working tree.
///
/// Forward-slash separated, never absolute, never `./`-prefixed, and never
/// containing a literal tab or newline (the on-disk inventory format has no
/// escaping, so such paths would silently corrupt it).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RelPath(String);

impl RelPath {
    /// Validate and wrap a path string.
    pub fn new(s: impl Into<String>) -> Result<Self> {
        let s = s.into();
        ensure!(!s.is_empty(), "path cannot be empty");
        ensure!(!s.starts_with('/'), "path must be relative: {s:?}");
        ensure!(!s.starts_with("./"), "path must not be `./`-prefixed: {s:?}");
        ensure!(
            !s.contains('\t') && !s.contains('\n'),
            "path contains a literal tab or newline, which would corrupt the inventory format: {s:?}"
        );
        Ok(Self(s.replace('\\', "/")))
    }

    /// Borrow the path as a plain string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this path (or any of its ancestors) is excluded from walks:
    /// the first component is `.dat` or `.git`, or the leaf is `.DS_Store`.
    pub fn is_excluded(&self) -> bool {
        let mut components = self.0.split('/');
        matches!(components.next(), Some(".dat") | Some(".git")) || self.0.rsplit('/').next() == Some(".DS_Store")
    }
}

impl fmt::Display for RelPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for RelPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// An in-memory mapping of path to fingerprint.
///
/// Backed by a [`BTreeMap`] so that iteration (and therefore rendering) is
/// always path-sorted, satisfying the on-disk format's determinism
/// requirement without any extra sorting step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory(BTreeMap<RelPath, Fingerprint>);

impl Inventory {
    /// Build an inventory directly from an iterator of entries.
    pub fn from_entries(entries: impl IntoIterator<Item = (RelPath, Fingerprint)>) -> Self {
        Self(entries.into_iter().collect())
    }

    /// Whether the inventory has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Look up the fingerprint for a path.
    pub fn get(&self, path: &RelPath) -> Option<Fingerprint> {
        self.0.get(path).copied()
    }

    /// Whether a path is present.
    pub fn contains(&self, path: &RelPath) -> bool {
        self.0.contains_key(path)
    }

    /// Insert or overwrite an entry.
    pub fn insert(&mut self, path: RelPath, fingerprint: Fingerprint) {
        self.0.insert(path, fingerprint);
    }

    /// Remove an entry, returning its prior fingerprint if present.
    pub fn remove(&mut self, path: &RelPath) -> Option<Fingerprint> {
        self.0.remove(path)
    }

    /// Iterate paths in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &RelPath> {
        self.0.keys()
    }

    /// Iterate entries in sorted order.
    pub fn iter(&self) -> btree_map::Iter<'_, RelPath, Fingerprint> {
        self.0.iter()
    }

    /// Collect all paths into a set.
    pub fn path_set(&self) -> BTreeSet<RelPath> {
        self.0.keys().cloned().collect()
    }

    /// Parse the line-oriented `path\tfingerprint\n` text format.
    ///
    /// Tolerates a trailing `\r` on each line (for CRLF-edited files) and
    /// rejects any line that doesn't split into exactly one tab-separated
    /// pair.
    pub fn parse(text: &str) -> Result<Self> {
        let mut map = BTreeMap::new();
        for (idx, line) in text.lines().enumerate() {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.is_empty() {
                continue;
            }

            let Some((path, fingerprint)) = line.split_once('\t') else {
                return Err(DatError::ConfigMalformed {
                    line: idx + 1,
                    content: line.to_string(),
                })
                .context("parse inventory line")
                .with_note(|| "expected exactly one tab per line".to_string());
            };

            if fingerprint.contains('\t') {
                return Err(DatError::ConfigMalformed {
                    line: idx + 1,
                    content: line.to_string(),
                })
                .context("parse inventory line")
                .with_note(|| "expected exactly one tab per line".to_string());
            }

            let path = RelPath::new(path).with_context(|| format!("line {}", idx + 1))?;
            let fingerprint = fingerprint
                .parse::<Fingerprint>()
                .with_context(|| format!("line {}", idx + 1))?;
            map.insert(path, fingerprint);
        }
        Ok(Self(map))
    }

    /// Render the sorted `path\tfingerprint\n` text format.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (path, fingerprint) in &self.0 {
            out.push_str(path.as_str());
            out.push('\t');
            out.push_str(&fingerprint.to_hex());
            out.push('\n');
        }
        out
    }

    /// Read an inventory from disk.
    ///
    /// A missing file is treated as an empty inventory, matching the
    /// behavior of reading `.dat/local` before any successful sync.
    pub async fn read(path: &Path) -> Result<Self> {
        match tokio::fs::read_to_string(path).await {
            Ok(text) => Self::parse(&text).with_context(|| format!("parse {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e).with_context(|| format!("read {}", path.display())),
        }
    }

    /// Write the inventory atomically: write to a temp file in the same
    /// directory, fsync, then rename over the target.
    pub async fn write_atomic(&self, path: &Path) -> Result<()> {
        let dir = path
            .parent()
            .ok_or_else(|| color_eyre::eyre::eyre!("inventory path has no parent: {path:?}"))?;
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("create {}", dir.display()))?;

        let tmp_name = format!(
            ".{}.tmp-{}",
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "inventory".to_string()),
            std::process::id()
        );
        let tmp_path = dir.join(tmp_name);

        let mut file = tokio::fs::File::create(&tmp_path)
            .await
            .with_context(|| format!("create {}", tmp_path.display()))?;
        tokio::io::AsyncWriteExt::write_all(&mut file, self.render().as_bytes())
            .await
            .with_context(|| format!("write {}", tmp_path.display()))?;
        file.sync_all()
            .await
            .with_context(|| format!("fsync {}", tmp_path.display()))?;
        drop(file);

        tokio::fs::rename(&tmp_path, path)
            .await
            .with_context(|| format!("rename {} -> {}", tmp_path.display(), path.display()))?;
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Inventory {
    type Item = (&'a RelPath, &'a Fingerprint);
    type IntoIter = btree_map::Iter<'a, RelPath, Fingerprint>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
