//! Configuration module for Stagehand
//!
//! Implements the configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (STAGEHAND_*)
//! 3. Project config (stagehand.toml)
//! 4. User config (~/.config/stagehand/config.toml)
//! 5. Built-in defaults (lowest priority)
//!
//! Every operation receives an explicit `Config`; nothing reads ambient
//! global state at call time.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{StagehandError, StagehandResult};

/// AWS access modifiers injected into every CLI invocation
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AwsConfig {
    /// Region flag value (omitted from invocations when unset or empty)
    #[serde(default)]
    pub region: Option<String>,

    /// Named credentials profile (omitted when unset or empty)
    #[serde(default)]
    pub profile: Option<String>,
}

/// Static site settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Target S3 bucket name
    #[serde(default)]
    pub bucket: String,

    /// Local directory mirrored into the bucket
    #[serde(default = "default_app_dir")]
    pub app_dir: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            app_dir: default_app_dir(),
        }
    }
}

fn default_app_dir() -> String {
    "app".to_string()
}

/// CloudFormation stack settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackConfig {
    /// Service name; stack names are derived as `<service>-<stage>`
    #[serde(default)]
    pub service: String,

    /// Default deployment stage
    #[serde(default = "default_stage")]
    pub stage: String,

    /// Stack output key holding the CloudFront domain
    #[serde(default = "default_domain_output")]
    pub domain_output: String,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            service: String::new(),
            stage: default_stage(),
            domain_output: default_domain_output(),
        }
    }
}

fn default_stage() -> String {
    "dev".to_string()
}

fn default_domain_output() -> String {
    "WebAppCloudFrontDistributionOutput".to_string()
}

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub aws: AwsConfig,

    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub stack: StackConfig,
}

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> StagehandResult<Self> {
        let (config, _warnings) = Self::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> StagehandResult<(Self, Vec<ConfigWarning>)> {
        let content = fs::read_to_string(path)?;

        let mut unknown_paths: Vec<String> = Vec::new();
        let deserializer = toml::de::Deserializer::new(&content);

        let config: Self = serde_ignored::deserialize(deserializer, |path| {
            unknown_paths.push(path.to_string());
        })
        .map_err(|e| StagehandError::InvalidConfig {
            file: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let warnings = unknown_paths
            .into_iter()
            .map(|path_str| {
                let key = path_str
                    .split('.')
                    .next_back()
                    .unwrap_or(path_str.as_str())
                    .to_string();
                ConfigWarning {
                    key: key.clone(),
                    file: path.to_path_buf(),
                    line: find_line_number(&content, &key),
                    suggestion: suggest_key(&key),
                }
            })
            .collect();

        Ok((config, warnings))
    }

    /// Load from project config, user config, or defaults
    pub fn load_or_default(project_root: Option<&Path>) -> Self {
        // Try project config first
        if let Some(root) = project_root {
            let project_config = root.join("stagehand.toml");
            if project_config.exists() {
                if let Ok(config) = Self::load(&project_config) {
                    return config.with_env_overrides();
                }
            }
        }

        // Try user config
        if let Some(user_config_dir) = dirs::config_dir() {
            let user_config = user_config_dir.join("stagehand/config.toml");
            if user_config.exists() {
                if let Ok(config) = Self::load(&user_config) {
                    return config.with_env_overrides();
                }
            }
        }

        // Return defaults with env overrides
        Self::default().with_env_overrides()
    }

    /// Apply environment variable overrides (STAGEHAND_* prefix)
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(region) = std::env::var("STAGEHAND_REGION") {
            if !region.is_empty() {
                self.aws.region = Some(region);
            }
        }

        if let Ok(profile) = std::env::var("STAGEHAND_PROFILE") {
            if !profile.is_empty() {
                self.aws.profile = Some(profile);
            }
        }

        if let Ok(bucket) = std::env::var("STAGEHAND_BUCKET") {
            if !bucket.is_empty() {
                self.site.bucket = bucket;
            }
        }

        if let Ok(stage) = std::env::var("STAGEHAND_STAGE") {
            if !stage.is_empty() {
                self.stack.stage = stage;
            }
        }

        self
    }

    /// Configuration problems that make the deploy operations unusable.
    ///
    /// Returned as messages rather than errors so the `check` command can
    /// report all of them at once.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.site.bucket.is_empty() {
            problems.push("site.bucket is not set - sync has no target".to_string());
        }
        if self.stack.service.is_empty() {
            problems.push(
                "stack.service is not set - stack names cannot be derived".to_string(),
            );
        }
        if self.site.app_dir.is_empty() {
            problems.push("site.app_dir is empty".to_string());
        }
        if self.stack.domain_output.is_empty() {
            problems.push("stack.domain_output is empty".to_string());
        }

        problems
    }
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    for (i, line) in content.lines().enumerate() {
        if line.contains(needle) {
            return Some(i + 1);
        }
    }
    None
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "aws",
        "region",
        "profile",
        "site",
        "bucket",
        "app_dir",
        "stack",
        "service",
        "stage",
        "domain_output",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = if ac == bc { 0 } else { 1 };
            curr[j + 1] = std::cmp::min(
                std::cmp::min(prev[j + 1] + 1, curr[j] + 1),
                prev[j] + cost,
            );
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
