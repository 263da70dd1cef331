//! CloudFront distribution lookup
//!
//! Lists live distributions and correlates them against a domain resolved
//! from stack outputs. The listing is taken in a single unpaginated response;
//! matching is exact string equality on the public domain name. A domain that
//! matches more than one distribution is refused rather than silently
//! resolved to the first hit.

use serde::Deserialize;

use crate::config::AwsConfig;
use crate::error::{StagehandError, StagehandResult};
use crate::runner::{CommandRunner, ExecutionResult, Invocation};

/// A content-delivery distribution, as much of it as the deploy flow needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distribution {
    pub id: String,
    pub domain_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListDistributionsResponse {
    #[serde(default)]
    distribution_list: DistributionList,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
struct DistributionList {
    #[serde(default)]
    items: Vec<DistributionSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DistributionSummary {
    id: String,
    domain_name: String,
}

/// Finds the distribution serving a given public domain
pub struct DistributionLocator<'a, R: CommandRunner> {
    runner: &'a R,
    aws: &'a AwsConfig,
}

impl<'a, R: CommandRunner> DistributionLocator<'a, R> {
    pub fn new(runner: &'a R, aws: &'a AwsConfig) -> Self {
        Self { runner, aws }
    }

    /// Locate the single distribution whose domain name equals `domain`.
    ///
    /// Pure lookup with no side effects. Zero matches fail with
    /// [`StagehandError::DistributionNotFound`]; more than one match fails
    /// with [`StagehandError::AmbiguousDistribution`].
    pub fn find_by_domain(&self, domain: &str) -> StagehandResult<Distribution> {
        let invocation =
            Invocation::new(["cloudfront", "list-distributions", "--output", "json"])
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

        let response: ListDistributionsResponse =
            serde_json::from_str(&stdout).map_err(|e| StagehandError::MalformedResponse {
                context: "cloudfront list-distributions".to_string(),
                message: e.to_string(),
            })?;

        let mut matches = response
            .distribution_list
            .items
            .into_iter()
            .filter(|item| item.domain_name == domain);

        let first = matches.next().ok_or_else(|| {
            StagehandError::DistributionNotFound {
                domain: domain.to_string(),
            }
        })?;

        let extra = matches.count();
        if extra > 0 {
            return Err(StagehandError::AmbiguousDistribution {
                domain: domain.to_string(),
                count: extra + 1,
            });
        }

        Ok(Distribution {
            id: first.id,
            domain_name: first.domain_name,
        })
    }
}
