use std::fmt;
use std::num::NonZeroUsize;
use std::time::Duration;

use serde::{Deserialize, Deserializer};

use crate::errors::CommandFailure;

/// Number of commands run at the same time unless `-n` says otherwise.
pub const DEFAULT_CONCURRENCY: NonZeroUsize = NonZeroUsize::new(4).unwrap();

/// Wall-clock limit for a single command process.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// A program to run plus its ordered arguments.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommandSpec {
    #[serde(alias = "Command", alias = "command")]
    pub program: String,

    #[serde(
        default,
        alias = "Args",
        alias = "arguments",
        deserialize_with = "null_as_empty"
    )]
    pub args: Vec<String>,
}

/// `"Args": null` means no arguments.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append invocation-time arguments after the manifest's own ones.
    pub fn with_extra_args(mut self, extra: &[String]) -> Self {
        self.args.extend(extra.iter().cloned());
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{} {}'", self.program, self.args.join(" "))
    }
}

/// Label of a long-lived worker, `1..=concurrency`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkerId(pub usize);

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Terminal record for one command.
#[derive(Debug)]
pub struct CommandOutcome {
    pub failure: Option<CommandFailure>,
}

impl CommandOutcome {
    pub fn success() -> Self {
        Self { failure: None }
    }

    pub fn failed(failure: CommandFailure) -> Self {
        Self {
            failure: Some(failure),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.failure.is_none()
    }

    pub fn failure_reason(&self) -> Option<&CommandFailure> {
        self.failure.as_ref()
    }
}

/// Everything a run needs besides the manifest itself.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub concurrency: NonZeroUsize,
    pub timeout: Duration,
    /// Appended to every command's argument list.
    pub extra_args: Vec<String>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            timeout: DEFAULT_TIMEOUT,
            extra_args: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_log_announcement() {
        let cmd = CommandSpec::new("make").arg("-j").arg("8");
        assert_eq!(cmd.to_string(), "'make -j 8'");
    }

    #[test]
    fn extra_args_go_after_manifest_args() {
        let cmd = CommandSpec::new("cargo")
            .arg("test")
            .with_extra_args(&["--release".to_string(), "-q".to_string()]);
        assert_eq!(cmd.args, vec!["test", "--release", "-q"]);
    }

    #[test]
    fn outcome_reports_failure_reason() {
        let ok = CommandOutcome::success();
        assert!(ok.succeeded());
        assert!(ok.failure_reason().is_none());

        let bad = CommandOutcome::failed(CommandFailure::NonZeroExit { code: Some(3) });
        assert!(!bad.succeeded());
        assert_eq!(
            bad.failure_reason().map(|f| f.to_string()).as_deref(),
            Some("exited with non-zero exit code")
        );
    }
}
