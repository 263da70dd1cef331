//! CloudFormation stack output resolution
//!
//! Derives stack names from the service name and deployment stage, then
//! queries `cloudformation describe-stacks` for a single named output value.
//! The query is read-only and idempotent; every call fetches a fresh
//! snapshot, so no caching or staleness handling is needed.

use serde::Deserialize;

use crate::config::AwsConfig;
use crate::error::{StagehandError, StagehandResult};
use crate::runner::{CommandRunner, ExecutionResult, Invocation};

/// Fully-qualified stack name for a deployment stage
pub fn stack_name(service: &str, stage: &str) -> String {
    format!("{}-{}", service, stage)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeStacksResponse {
    #[serde(default)]
    stacks: Vec<StackDescription>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct StackDescription {
    #[serde(default)]
    outputs: Vec<StackOutput>,
}

/// One key/value output entry of a described stack
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StackOutput {
    pub output_key: String,
    #[serde(default)]
    pub output_value: String,
}

/// Resolves named outputs from deployed CloudFormation stacks
pub struct StackOutputResolver<'a, R: CommandRunner> {
    runner: &'a R,
    aws: &'a AwsConfig,
}

impl<'a, R: CommandRunner> StackOutputResolver<'a, R> {
    pub fn new(runner: &'a R, aws: &'a AwsConfig) -> Self {
        Self { runner, aws }
    }

    /// Fetch the value of a single named output from a deployed stack.
    ///
    /// Scans the first described stack's outputs in order and returns the
    /// first entry whose key matches. A missing key and an empty value are
    /// both reported as [`StagehandError::OutputNotFound`].
    pub fn resolve_output(&self, stack: &str, output_key: &str) -> StagehandResult<String> {
        let invocation = Invocation::new([
            "cloudformation",
            "describe-stacks",
            "--stack-name",
            stack,
            "--output",
            "json",
        ])
        .for_aws(self.aws);

        let stdout = match self.runner.run(&invocation) {
            ExecutionResult::Success { stdout } => stdout,
            ExecutionResult::Failure {
                exit_code,
                signal,
                detail,
            } => {
                return Err(StagehandError::CommandFailed {
                    program: "aws".to_string(),
                    exit_code,
                    signal,
                    detail,
                })
            }
        };

        let response: DescribeStacksResponse =
            serde_json::from_str(&stdout).map_err(|e| StagehandError::MalformedResponse {
                context: "cloudformation describe-stacks".to_string(),
                message: e.to_string(),
            })?;

        let description =
            response
                .stacks
                .first()
                .ok_or_else(|| StagehandError::MalformedResponse {
                    context: "cloudformation describe-stacks".to_string(),
                    message: format!("no stack named '{}' in response", stack),
                })?;

        description
            .outputs
            .iter()
            .find(|output| output.output_key == output_key)
            .map(|output| output.output_value.clone())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| StagehandError::OutputNotFound {
                stack: stack.to_string(),
                key: output_key.to_string(),
            })
    }
}
