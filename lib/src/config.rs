use std::path::Path;

use color_eyre::eyre::{Context, Result};

use crate::{error::DatError, homedir};

/// The persisted `.dat/config` record.
///
/// Recognized keys mirror the original tool's format exactly: a small
/// `key: value` text file, not TOML/YAML, so the on-disk format stays
/// wire-compatible with existing repositories. This is a deliberate,
/// intentional exception to reaching for `serde` everywhere — the format
/// is externally fixed and isn't a serde-friendly shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Bucket, or `bucket/prefix`, identifying the remote.
    pub aws: String,
    /// Whether a push has ever succeeded for this repository.
    pub pushed: bool,
    /// Optional named credential profile.
    pub profile: Option<String>,
    /// Optional region override; defaults to `us-east-1` when absent.
    pub region: Option<String>,
    /// Optional relative subtree to treat as the working root.
    pub subdir: Option<String>,
}

impl Config {
    /// The region used when none is configured.
    pub const DEFAULT_REGION: &'static str = "us-east-1";

    /// Create a fresh config for `init`, with `pushed = false`.
    pub fn new(aws: impl Into<String>) -> Self {
        Self {
            aws: aws.into(),
            pushed: false,
            profile: None,
            region: None,
            subdir: None,
        }
    }

    /// The region to use, falling back to [`Config::DEFAULT_REGION`].
    pub fn region(&self) -> &str {
        self.region.as_deref().unwrap_or(Self::DEFAULT_REGION)
    }

    /// Parse the `key: value` text format.
    pub fn parse(text: &str) -> Result<Self> {
        let mut aws = None;
        let mut pushed = false;
        let mut profile = None;
        let mut region = None;
        let mut subdir = None;

        for (idx, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let Some((key, value)) = line.split_once(':') else {
                return Err(DatError::ConfigMalformed {
                    line: idx + 1,
                    content: line.to_string(),
                })
                .context("parse config line");
            };
            let key = key.trim();
            let value = value.trim();

            match key {
                "aws" => aws = Some(value.to_string()),
                "pushed" => pushed = value.eq_ignore_ascii_case("true"),
                "profile" if !value.is_empty() => profile = Some(value.to_string()),
                "region" if !value.is_empty() => region = Some(value.to_string()),
                "subdir" if !value.is_empty() => subdir = Some(value.to_string()),
                _ => {}
            }
        }

        let aws = aws.ok_or(DatError::ConfigMalformed {
            line: 0,
            content: "missing required key `aws`".to_string(),
        })?;

        Ok(Self {
            aws,
            pushed,
            profile,
            region,
            subdir,
        })
    }

    /// Render the `key: value` text format.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("aws: {}\n", self.aws));
        out.push_str(&format!("pushed: {}\n", if self.pushed { "True" } else { "False" }));
        if let Some(profile) = &self.profile {
            out.push_str(&format!("profile: {profile}\n"));
        }
        if let Some(region) = &self.region {
            out.push_str(&format!("region: {region}\n"));
        }
        if let Some(subdir) = &self.subdir {
            out.push_str(&format!("subdir: {subdir}\n"));
        }
        out
    }

    /// Read `.dat/config` from disk.
    pub async fn read(path: &Path) -> Result<Self> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|_| DatError::NotARepo)
            .with_context(|| format!("read {}", path.display()))?;
        Self::parse(&text)
    }

    /// Write `.dat/config` to disk (not via the atomic rename dance; the
    /// config is written once at `init`/`clone` time and only flipped once
    /// by `push` thereafter, so plain truncate-and-write is sufficient).
    pub async fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("create {}", parent.display()))?;
        }
        tokio::fs::write(path, self.render())
            .await
            .with_context(|| format!("write {}", path.display()))
    }
}

/// Derive the default id for `init` when no bucket is given on the command
/// line: `<user>.<cwd-path-dotted>`, mirroring the original tool's
/// derivation but substituting the actual invoking user for its
/// hardcoded author name.
pub fn default_id(cwd: &Path) -> Result<String> {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "user".to_string());

    let relative = match homedir() {
        Ok(home) => cwd.strip_prefix(&home).unwrap_or(cwd),
        Err(_) => cwd,
    };

    let dotted = relative
        .to_string_lossy()
        .replace(std::path::MAIN_SEPARATOR, ".")
        .trim_matches('.')
        .to_lowercase();

    Ok(if dotted.is_empty() {
        user
    } else {
        format!("{user}.{dotted}")
    })
}
