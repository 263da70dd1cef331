//! AWS CLI process execution
//!
//! Builds `aws` command lines with region/profile injection and runs them as
//! child processes. The runner is domain-agnostic plumbing: it never inspects
//! what the subcommand means, it only reports how the process ended.
//!
//! One OS process is spawned per call, with no retry and no timeout: the
//! process runs to completion or the operation hangs with it. That is a
//! documented limitation of the tool, matching the deploy flows it drives.

use std::process::Command;

use crate::config::AwsConfig;

/// A single composed CLI invocation.
///
/// Immutable once built: callers construct one per command, execute it, and
/// discard it. Region and profile are injected into the final argv only when
/// set and non-empty, in that order, before the subcommand arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    args: Vec<String>,
    region: Option<String>,
    profile: Option<String>,
}

impl Invocation {
    /// Create an invocation from subcommand arguments, without modifiers
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            region: None,
            profile: None,
        }
    }

    /// Attach the region/profile modifiers from the AWS config section
    pub fn for_aws(self, aws: &AwsConfig) -> Self {
        Self {
            region: aws.region.clone(),
            profile: aws.profile.clone(),
            ..self
        }
    }

    /// The full argument vector: region flags, profile flags, then subcommand
    pub fn argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.args.len() + 4);
        if let Some(region) = non_empty(&self.region) {
            argv.push("--region".to_string());
            argv.push(region.to_string());
        }
        if let Some(profile) = non_empty(&self.profile) {
            argv.push("--profile".to_string());
            argv.push(profile.to_string());
        }
        argv.extend(self.args.iter().cloned());
        argv
    }

    /// Append trailing arguments, preserving the modifier prefix
    pub fn with_args<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(extra.into_iter().map(Into::into));
        self
    }

    /// Space-joined argv for log lines and dry-run output
    pub fn rendered(&self) -> String {
        self.argv().join(" ")
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Outcome of one executed invocation.
///
/// Owned solely by the caller that issued the invocation. A process that
/// could not be launched at all is a `Failure` with neither exit code nor
/// signal, carrying the launch error as its diagnostic.
#[derive(Debug, Clone)]
pub enum ExecutionResult {
    Success {
        stdout: String,
    },
    Failure {
        exit_code: Option<i32>,
        signal: Option<i32>,
        detail: String,
    },
}

impl ExecutionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Port for executing composed CLI invocations.
///
/// The deploy orchestration only ever sees this trait; tests substitute
/// scripted runners, the binary installs [`AwsCli`].
pub trait CommandRunner {
    fn run(&self, invocation: &Invocation) -> ExecutionResult;
}

/// Runs invocations against the real `aws` binary
pub struct AwsCli {
    program: String,
}

impl AwsCli {
    pub fn new() -> Self {
        Self {
            program: "aws".to_string(),
        }
    }

    /// Use a different program name (tests point this at stub binaries)
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Check if the AWS CLI is installed and runnable
    pub fn check_available(&self) -> bool {
        Command::new(&self.program)
            .arg("--version")
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }
}

impl Default for AwsCli {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for AwsCli {
    fn run(&self, invocation: &Invocation) -> ExecutionResult {
        let output = match Command::new(&self.program).args(invocation.argv()).output() {
            Ok(output) => output,
            Err(e) => {
                return ExecutionResult::Failure {
                    exit_code: None,
                    signal: None,
                    detail: format!("failed to launch '{}': {}", self.program, e),
                }
            }
        };

        if output.status.success() {
            ExecutionResult::Success {
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            }
        } else {
            ExecutionResult::Failure {
                exit_code: output.status.code(),
                signal: exit_signal(&output.status),
                detail: summarize_stderr(&output.stderr),
            }
        }
    }
}

#[cfg(unix)]
fn exit_signal(status: &std::process::ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn exit_signal(_status: &std::process::ExitStatus) -> Option<i32> {
    None
}

/// First meaningful stderr line, truncated to a short diagnostic
fn summarize_stderr(stderr: &[u8]) -> String {
    const MAX_DETAIL: usize = 200;

    let text = String::from_utf8_lossy(stderr);
    let line = text
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("(no diagnostic output)");

    if line.len() > MAX_DETAIL {
        let cut = line
            .char_indices()
            .take_while(|(i, _)| *i < MAX_DETAIL)
            .map(|(i, c)| i + c.len_utf8())
            .last()
            .unwrap_or(0);
        format!("{}...", &line[..cut])
    } else {
        line.to_string()
    }
}
