use std::{fmt, path::Path, str::FromStr};

use color_eyre::{
    eyre::{eyre, Context, Result},
    Section,
};
use md5::{Digest as _, Md5};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tokio::io::AsyncReadExt;

/// Size of the read buffer used while streaming a file through the hasher.
///
/// 4 KiB, matching the chunking the original tool used.
const CHUNK_SIZE: usize = 4096;

/// A content fingerprint: the MD5 digest of a file's bytes.
///
/// This is used purely for change detection, not as a security primitive;
/// MD5 is retained only because the on-disk and remote inventory formats
/// are bit-compatible with an existing tool that already uses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fingerprint([u8; 16]);

impl Fingerprint {
    /// The fingerprint of the empty string, for reference in tests.
    pub const EMPTY_HEX: &'static str = "d41d8cd98f00b204e9800998ecf8427e";

    /// Build a fingerprint from raw digest bytes.
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Render the fingerprint as lowercase hex.
    pub fn to_hex(self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.to_hex())
    }
}

impl FromStr for Fingerprint {
    type Err = color_eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s)
            .map_err(|e| eyre!("invalid fingerprint hex: {e}"))
            .with_note(|| s.to_string())?;
        let bytes: [u8; 16] = bytes
            .try_into()
            .map_err(|b: Vec<u8>| eyre!("fingerprint must be 16 bytes, got {}", b.len()))?;
        Ok(Self(bytes))
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_hex().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Fingerprint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        FromStr::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Compute the content fingerprint of a regular file on disk.
///
/// The file is streamed through the hasher in [`CHUNK_SIZE`] chunks rather
/// than read fully into memory. A read failure partway through aborts the
/// whole operation; partial digests are never returned.
#[tracing::instrument]
pub async fn fingerprint_file(path: &Path) -> Result<Fingerprint> {
    let mut file = tokio::fs::File::open(path)
        .await
        .with_context(|| format!("open {}", path.display()))?;

    let mut hasher = Md5::new();
    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        let n = file
            .read(&mut buf)
            .await
            .with_context(|| format!("read {}", path.display()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    let digest: [u8; 16] = hasher.finalize().into();
    Ok(Fingerprint(digest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test_log::test(tokio::test)]
    async fn empty_file_hashes_to_known_constant() {
        let file = NamedTempFile::new().expect("create temp file");
        let fp = fingerprint_file(file.path()).await.expect("fingerprint");
        assert_eq!(fp.to_hex(), Fingerprint::EMPTY_HEX);
    }

    #[test_log::test(tokio::test)]
    async fn known_contents_hash_matches_reference() {
        let mut file = NamedTempFile::new().expect("create temp file");
        file.write_all(b"hi").expect("write");
        file.flush().expect("flush");
        let fp = fingerprint_file(file.path()).await.expect("fingerprint");
        assert_eq!(fp.to_hex(), "49f68a5c8493ec2c0bf489821c21fc3b");
    }

    #[test_log::test]
    fn round_trip_through_display_and_from_str() {
        let fp = Fingerprint::from_str("49f68a5c8493ec2c0bf489821c21fc3b").expect("parse");
        assert_eq!(fp.to_string(), "49f68a5c8493ec2c0bf489821c21fc3b");
    }

    #[test_log::test]
    fn rejects_wrong_length() {
        assert!(Fingerprint::from_str("abcd").is_err());
    }
}
