// src/config/model.rs

use serde::Deserialize;

use crate::types::CommandSpec;

/// Manifest as deserialized, before validation.
///
/// The JSON form is a bare array, matching `prun.json`:
///
/// ```json
/// [
///   { "Command": "make", "Args": ["test"] },
///   { "Command": "cargo", "Args": ["clippy"] }
/// ]
/// ```
///
/// The TOML form uses an array of tables:
///
/// ```toml
/// [[command]]
/// program = "make"
/// args = ["test"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawManifest {
    #[serde(default, rename = "command")]
    pub commands: Vec<CommandSpec>,
}

/// A validated manifest. Only constructible through `TryFrom<RawManifest>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    commands: Vec<CommandSpec>,
}

impl Manifest {
    pub(crate) fn new_unchecked(commands: Vec<CommandSpec>) -> Self {
        Self { commands }
    }

    pub fn commands(&self) -> &[CommandSpec] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<CommandSpec> {
        self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
