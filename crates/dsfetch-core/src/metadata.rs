//! Dataset metadata documents.
//!
//! A metadata document names where a raw dataset lives, what it is called on
//! disk, and the SHA-256 its bytes must hash to:
//!
//! ```toml
//! url = "https://example.com/corpus/lines.txt"
//! filename = "lines.txt"
//! sha256 = "5891b5b522d5df086d0ff0b110fbd9d21bb4fc7163af34d08286a2e846f6be03"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::fetch::TEMP_SUFFIX;

/// Linux NAME_MAX.
const NAME_MAX: usize = 255;

/// Location, on-disk name, and expected checksum of one raw dataset file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatasetMetadata {
    url: String,
    filename: String,
    sha256: String,
}

impl DatasetMetadata {
    pub fn url(&self) -> &str {
        &self.url
    }

    /// File name under the target directory; always a single path component.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Expected SHA-256 of the file contents, hex encoded.
    pub fn sha256(&self) -> &str {
        &self.sha256
    }

    /// Builds and validates metadata from its three fields.
    pub fn new(
        url: impl Into<String>,
        filename: impl Into<String>,
        sha256: impl Into<String>,
    ) -> Result<Self> {
        let meta = Self {
            url: url.into(),
            filename: filename.into(),
            sha256: sha256.into(),
        };
        meta.validate()?;
        Ok(meta)
    }

    /// Parses a TOML metadata document. Unknown keys are ignored.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let meta: DatasetMetadata = toml::from_str(s).context("invalid metadata document")?;
        meta.validate()?;
        Ok(meta)
    }

    /// Reads and parses a TOML metadata document from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let data =
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        Self::from_toml_str(&data).with_context(|| format!("metadata {}", path.display()))
    }

    fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.url)
            .with_context(|| format!("invalid dataset URL: {}", self.url))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            anyhow::bail!("unsupported URL scheme {:?} (need http or https)", parsed.scheme());
        }
        if !is_plain_filename(&self.filename) {
            anyhow::bail!(
                "filename {:?} must be a single path component",
                self.filename
            );
        }
        let digest = self.sha256.trim();
        if digest.len() != 64 || !digest.bytes().all(|b| b.is_ascii_hexdigit()) {
            anyhow::bail!("sha256 must be 64 hex digits, got {:?}", self.sha256);
        }
        Ok(())
    }
}

/// True if `name` can be joined onto a directory without escaping it:
/// non-empty, not `.`/`..`, no `/`, `\`, NUL or control characters, and short
/// enough that the `.part` download name still fits in NAME_MAX.
fn is_plain_filename(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && name.len() + TEMP_SUFFIX.len() <= NAME_MAX
        && !name
            .chars()
            .any(|c| c == '/' || c == '\\' || c == '\0' || c.is_control())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIGEST: &str = "5891b5b522d5df086d0ff0b110fbd9d21bb4fc7163af34d08286a2e846f6be03";

    #[test]
    fn parses_document() {
        let doc = format!(
            r#"
            url = "https://example.com/a/lines.txt"
            filename = "lines.txt"
            sha256 = "{}"
            "#,
            DIGEST
        );
        let meta = DatasetMetadata::from_toml_str(&doc).unwrap();
        assert_eq!(meta.url, "https://example.com/a/lines.txt");
        assert_eq!(meta.filename, "lines.txt");
        assert_eq!(meta.sha256, DIGEST);
    }

    #[test]
    fn ignores_extra_keys() {
        let doc = format!(
            r#"
            url = "http://example.com/x.bin"
            filename = "x.bin"
            sha256 = "{}"
            source = "mirror"
            "#,
            DIGEST
        );
        assert!(DatasetMetadata::from_toml_str(&doc).is_ok());
    }

    #[test]
    fn missing_field_is_error() {
        let doc = "url = \"https://example.com/x\"\nfilename = \"x\"\n";
        assert!(DatasetMetadata::from_toml_str(doc).is_err());
    }

    #[test]
    fn rejects_non_http_scheme() {
        assert!(DatasetMetadata::new("ftp://example.com/x", "x", DIGEST).is_err());
        assert!(DatasetMetadata::new("not a url", "x", DIGEST).is_err());
    }

    #[test]
    fn rejects_path_like_filenames() {
        let too_long = "x".repeat(NAME_MAX);
        for bad in ["", ".", "..", "../escape", "a/b", "a\\b", "nul\0byte", too_long.as_str()] {
            assert!(
                DatasetMetadata::new("https://example.com/x", bad, DIGEST).is_err(),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn rejects_malformed_digest() {
        assert!(DatasetMetadata::new("https://example.com/x", "x", "abc123").is_err());
        let not_hex = "z".repeat(64);
        assert!(DatasetMetadata::new("https://example.com/x", "x", not_hex).is_err());
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata.toml");
        fs::write(
            &path,
            format!(
                "url = \"https://example.com/x.txt\"\nfilename = \"x.txt\"\nsha256 = \"{}\"\n",
                DIGEST
            ),
        )
        .unwrap();
        assert_eq!(DatasetMetadata::load(&path).unwrap().filename, "x.txt");
    }
}
