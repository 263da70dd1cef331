//! Stagehand - static web app deployment helper
//!
//! Stagehand mirrors a local asset directory into an S3 bucket, discovers the
//! CloudFront domain of a deployed stage from CloudFormation stack outputs,
//! and invalidates the distribution's edge cache after a deploy. All cloud
//! access goes through the `aws` CLI binary; the library never talks to the
//! network itself.

pub mod config;
pub mod deploy;
pub mod distribution;
pub mod error;
pub mod runner;
pub mod stack;

// Re-exports for convenience
pub use config::{AwsConfig, Config, ConfigWarning, SiteConfig, StackConfig};
pub use deploy::{DeployOptions, Deployer, LogSink, StderrLog};
pub use distribution::{Distribution, DistributionLocator};
pub use error::{StagehandError, StagehandResult};
pub use runner::{AwsCli, CommandRunner, ExecutionResult, Invocation};
pub use stack::{stack_name, StackOutput, StackOutputResolver};
