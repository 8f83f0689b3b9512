// src/config/validate.rs

use crate::config::model::{Manifest, RawManifest};
use crate::errors::{PrunError, Result};

impl TryFrom<RawManifest> for Manifest {
    type Error = crate::errors::PrunError;

    fn try_from(raw: RawManifest) -> std::result::Result<Self, Self::Error> {
        validate_raw_manifest(&raw)?;
        Ok(Manifest::new_unchecked(raw.commands))
    }
}

fn validate_raw_manifest(raw: &RawManifest) -> Result<()> {
    for (index, cmd) in raw.commands.iter().enumerate() {
        if cmd.program.trim().is_empty() {
            return Err(PrunError::ManifestError(format!(
                "command #{} has an empty program name",
                index + 1
            )));
        }
    }
    Ok(())
}
