// src/config/mod.rs

//! Command manifest loading and validation.
//!
//! - `model.rs`: the raw and validated manifest types.
//! - `loader.rs`: reading JSON or TOML manifests from disk.
//! - `validate.rs`: the `RawManifest` → `Manifest` checks.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{
    ManifestFormat, default_manifest_path, load_and_validate, load_from_path, parse_manifest,
};
pub use model::{Manifest, RawManifest};
