#![allow(dead_code)]

use prun::config::{Manifest, RawManifest};
use prun::types::CommandSpec;

/// Builder for `Manifest` to simplify test setup.
pub struct ManifestBuilder {
    raw: RawManifest,
}

impl ManifestBuilder {
    pub fn new() -> Self {
        Self {
            raw: RawManifest::default(),
        }
    }

    pub fn with_command(mut self, cmd: CommandSpec) -> Self {
        self.raw.commands.push(cmd);
        self
    }

    /// `program arg arg ...` split on whitespace.
    pub fn with(self, line: &str) -> Self {
        let mut parts = line.split_whitespace();
        let program = parts.next().expect("empty command line");
        let cmd = parts.fold(CommandSpec::new(program), |cmd, arg| cmd.arg(arg));
        self.with_command(cmd)
    }

    pub fn build(self) -> Manifest {
        Manifest::try_from(self.raw).expect("Failed to build valid manifest from builder")
    }
}

impl Default for ManifestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
