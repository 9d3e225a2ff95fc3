// Best-effort loading of the optional branding image. Absence is a normal
// outcome, reported as a value and never as an error.
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrandingAsset {
    pub path: PathBuf,
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub width: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum OptionalAsset {
    Present(BrandingAsset),
    Absent { path: PathBuf, reason: String },
}

impl OptionalAsset {
    pub fn is_present(&self) -> bool {
        matches!(self, OptionalAsset::Present(_))
    }

    pub fn as_present(&self) -> Option<&BrandingAsset> {
        match self {
            OptionalAsset::Present(asset) => Some(asset),
            OptionalAsset::Absent { .. } => None,
        }
    }
}

pub fn load_optional_asset(path: impl AsRef<Path>, width: u32) -> OptionalAsset {
    let path = path.as_ref();
    match std::fs::read(path) {
        Ok(bytes) if !bytes.is_empty() => {
            tracing::debug!(path = %path.display(), size = bytes.len(), "Loaded branding asset");
            OptionalAsset::Present(BrandingAsset {
                path: path.to_path_buf(),
                bytes,
                width,
            })
        }
        Ok(_) => {
            tracing::debug!(path = %path.display(), "Branding asset is empty, skipping");
            OptionalAsset::Absent {
                path: path.to_path_buf(),
                reason: "empty file".to_string(),
            }
        }
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Branding asset unavailable, skipping");
            OptionalAsset::Absent {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn present_when_readable() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"\x89PNG\r\n").unwrap();
        file.flush().unwrap();

        let asset = load_optional_asset(file.path(), 250);
        let loaded = asset.as_present().expect("asset should load");
        assert_eq!(loaded.width, 250);
        assert_eq!(loaded.bytes, b"\x89PNG\r\n");
    }

    #[test]
    fn absent_when_missing() {
        let asset = load_optional_asset("/no/such/logo.png", 250);
        assert!(!asset.is_present());
        assert!(matches!(asset, OptionalAsset::Absent { ref path, .. } if path == Path::new("/no/such/logo.png")));
    }

    #[test]
    fn absent_when_empty() {
        let file = NamedTempFile::new().unwrap();
        assert!(!load_optional_asset(file.path(), 250).is_present());
    }
}
