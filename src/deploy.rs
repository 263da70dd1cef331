//! Deploy orchestration
//!
//! Three independent entry points over one runner: `sync` mirrors the local
//! asset directory into the bucket, `domain_info` resolves the CloudFront
//! domain from stack outputs, and `invalidate_cache` chains domain resolution,
//! distribution lookup, and the invalidation request. Each stage completes
//! before the next begins; a failed stage logs its detail and terminates the
//! operation. No retries, no rollback - a failed sync may leave the bucket
//! partially mirrored.

use std::thread;
use std::time::Duration;

use serde::Deserialize;

use crate::config::Config;
use crate::distribution::DistributionLocator;
use crate::error::{StagehandError, StagehandResult};
use crate::runner::{CommandRunner, ExecutionResult, Invocation};
use crate::stack::{stack_name, StackOutputResolver};

/// Fire-and-forget logging port.
///
/// Ordering is preserved within one call chain; the binary installs a
/// console or JSON implementation, tests record the lines.
pub trait LogSink {
    fn log(&self, message: &str);
}

/// Logs to stderr, line per message
pub struct StderrLog;

impl LogSink for StderrLog {
    fn log(&self, message: &str) {
        eprintln!("{}", message);
    }
}

/// Options shared by the deploy entry points
#[derive(Debug, Clone)]
pub struct DeployOptions {
    /// Log composed mutating commands instead of executing them
    pub dry_run: bool,
    /// Poll the invalidation until the edge reports it Completed
    pub wait: bool,
    /// Log each composed command line before execution
    pub verbose: bool,
    /// Sleep between completion polls
    pub poll_interval: Duration,
    /// Maximum number of completion polls before giving up
    pub poll_budget: u32,
}

impl Default for DeployOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            wait: false,
            verbose: false,
            poll_interval: Duration::from_secs(10),
            poll_budget: 90,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InvalidationEnvelope {
    invalidation: InvalidationStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InvalidationStatus {
    id: String,
    status: String,
}

/// Sequences the deploy operations against one runner and one config
pub struct Deployer<'a, R: CommandRunner> {
    runner: &'a R,
    config: &'a Config,
    log: &'a dyn LogSink,
    options: DeployOptions,
}

impl<'a, R: CommandRunner> Deployer<'a, R> {
    pub fn new(
        runner: &'a R,
        config: &'a Config,
        log: &'a dyn LogSink,
        options: DeployOptions,
    ) -> Self {
        Self {
            runner,
            config,
            log,
            options,
        }
    }

    /// Mirror the local asset directory into the S3 bucket.
    ///
    /// Remote objects absent locally are deleted, so after a successful run
    /// the bucket's object set exactly matches the local tree.
    pub fn sync(&self) -> StagehandResult<()> {
        let source = format!("{}/", self.config.site.app_dir.trim_end_matches('/'));
        let target = format!("s3://{}/", self.config.site.bucket);
        let invocation = Invocation::new([
            "s3",
            "sync",
            source.as_str(),
            target.as_str(),
            "--delete",
        ])
        .for_aws(&self.config.aws);

        if self.options.dry_run {
            self.log
                .log(&format!("dry run: aws {}", invocation.rendered()));
            return Ok(());
        }

        match self.execute(&invocation) {
            ExecutionResult::Success { .. } => {
                self.log.log("Successfully synced to the S3 bucket");
                Ok(())
            }
            ExecutionResult::Failure {
                exit_code,
                signal,
                detail,
            } => {
                self.log_failure("sync", &detail, exit_code, signal);
                Err(StagehandError::SyncFailed)
            }
        }
    }

    /// Resolve and log the public domain of the configured stage's app.
    pub fn domain_info(&self) -> StagehandResult<String> {
        let stack = stack_name(&self.config.stack.service, &self.config.stack.stage);
        let resolver = StackOutputResolver::new(self.runner, &self.config.aws);

        match resolver.resolve_output(&stack, &self.config.stack.domain_output) {
            Ok(domain) => {
                self.log.log(&format!("Web App Domain: {}", domain));
                Ok(domain)
            }
            Err(err) => {
                self.log.log(&format!("Web App Domain: Not Found ({})", err));
                Err(StagehandError::DomainNotFound)
            }
        }
    }

    /// Invalidate the edge cache of the distribution serving this stage.
    ///
    /// The purge itself completes out-of-band at the edge after the request
    /// returns; pass `wait` in [`DeployOptions`] to poll for completion.
    pub fn invalidate_cache(&self) -> StagehandResult<()> {
        let domain = self.domain_info()?;

        let locator = DistributionLocator::new(self.runner, &self.config.aws);
        let distribution = match locator.find_by_domain(&domain) {
            Ok(distribution) => distribution,
            Err(
                err @ (StagehandError::DistributionNotFound { .. }
                | StagehandError::AmbiguousDistribution { .. }),
            ) => {
                self.log.log(&err.to_string());
                return Err(err);
            }
            Err(err) => {
                self.log.log(&err.to_string());
                return Err(StagehandError::InvalidationFailed);
            }
        };

        let mut invocation = Invocation::new([
            "cloudfront",
            "create-invalidation",
            "--distribution-id",
            distribution.id.as_str(),
            "--paths",
            "/*",
        ])
        .for_aws(&self.config.aws);
        if self.options.wait {
            // The response must be parsed for the invalidation id, whatever
            // output format the operator's CLI config selects.
            invocation = invocation.with_args(["--output", "json"]);
        }

        if self.options.dry_run {
            self.log
                .log(&format!("dry run: aws {}", invocation.rendered()));
            return Ok(());
        }

        match self.execute(&invocation) {
            ExecutionResult::Success { stdout } => {
                self.log.log("Successfully invalidated CloudFront cache");
                if self.options.wait {
                    let invalidation =
                        parse_invalidation(&stdout, "cloudfront create-invalidation")?;
                    self.wait_for_completion(&distribution.id, &invalidation.id)?;
                }
                Ok(())
            }
            ExecutionResult::Failure {
                exit_code,
                signal,
                detail,
            } => {
                self.log_failure("create-invalidation", &detail, exit_code, signal);
                Err(StagehandError::InvalidationFailed)
            }
        }
    }

    fn wait_for_completion(
        &self,
        distribution_id: &str,
        invalidation_id: &str,
    ) -> StagehandResult<()> {
        self.log
            .log(&format!("Waiting for invalidation {}", invalidation_id));

        for attempt in 0..self.options.poll_budget {
            if attempt > 0 {
                thread::sleep(self.options.poll_interval);
            }

            let invocation = Invocation::new([
                "cloudfront",
                "get-invalidation",
                "--distribution-id",
                distribution_id,
                "--id",
                invalidation_id,
                "--output",
                "json",
            ])
            .for_aws(&self.config.aws);

            match self.execute(&invocation) {
                ExecutionResult::Success { stdout } => {
                    let invalidation =
                        parse_invalidation(&stdout, "cloudfront get-invalidation")?;
                    if invalidation.status == "Completed" {
                        self.log
                            .log(&format!("Invalidation {} completed", invalidation_id));
                        return Ok(());
                    }
                }
                ExecutionResult::Failure {
                    exit_code,
                    signal,
                    detail,
                } => {
                    self.log_failure("get-invalidation", &detail, exit_code, signal);
                    return Err(StagehandError::InvalidationFailed);
                }
            }
        }

        Err(StagehandError::InvalidationTimeout {
            id: invalidation_id.to_string(),
        })
    }

    fn execute(&self, invocation: &Invocation) -> ExecutionResult {
        if self.options.verbose {
            self.log.log(&format!("running: aws {}", invocation.rendered()));
        }
        self.runner.run(invocation)
    }

    fn log_failure(
        &self,
        what: &str,
        detail: &str,
        exit_code: Option<i32>,
        signal: Option<i32>,
    ) {
        self.log.log(&format!("{} failed: {}", what, detail));
        if let Some(code) = exit_code {
            self.log.log(&format!("exit code: {}", code));
        }
        if let Some(sig) = signal {
            self.log.log(&format!("terminated by signal: {}", sig));
        }
    }
}

fn parse_invalidation(stdout: &str, context: &str) -> StagehandResult<InvalidationStatus> {
    serde_json::from_str::<InvalidationEnvelope>(stdout)
        .map(|envelope| envelope.invalidation)
        .map_err(|e| StagehandError::MalformedResponse {
            context: context.to_string(),
            message: e.to_string(),
        })
}
