// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{Manifest, RawManifest};
use crate::errors::Result;
use crate::types::CommandSpec;

/// On-disk manifest encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Json,
    Toml,
}

impl ManifestFormat {
    /// `.toml` files are TOML; everything else is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ManifestFormat::Toml,
            _ => ManifestFormat::Json,
        }
    }
}

/// Parse manifest text without semantic validation.
pub fn parse_manifest(contents: &str, format: ManifestFormat) -> Result<RawManifest> {
    let raw = match format {
        ManifestFormat::Json => RawManifest {
            commands: serde_json::from_str::<Vec<CommandSpec>>(contents)?,
        },
        ManifestFormat::Toml => toml::from_str::<RawManifest>(contents)?,
    };
    Ok(raw)
}

/// Load a manifest from a given path and return the raw `RawManifest`.
///
/// This only performs deserialization; use [`load_and_validate`] for the
/// checked form.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawManifest> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let format = ManifestFormat::from_path(path);
    debug!(path = %path.display(), ?format, "parsing manifest");

    parse_manifest(&contents, format)
}

/// Load a manifest from path and validate it.
///
/// This is the entry point the rest of the application uses.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<Manifest> {
    let raw = load_from_path(&path)?;
    let manifest = Manifest::try_from(raw)?;
    Ok(manifest)
}

/// Manifest looked up in the working directory when `--manifest` is absent.
pub fn default_manifest_path() -> PathBuf {
    PathBuf::from("prun.json")
}
