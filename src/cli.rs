use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Stagehand - static web app deployment helper
#[derive(Parser, Debug)]
#[command(name = "stagehand")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format for CI
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to the configuration file (defaults to ./stagehand.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Mirror the local asset directory into the S3 bucket
    Sync {
        /// Bucket name (overrides config)
        #[arg(long)]
        bucket: Option<String>,

        /// Show the composed command without executing it
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the CloudFront domain serving a deployed stage
    DomainInfo {
        /// Deployment stage (overrides config)
        #[arg(short, long)]
        stage: Option<String>,
    },

    /// Invalidate the CloudFront cache for a deployed stage
    InvalidateCache {
        /// Deployment stage (overrides config)
        #[arg(short, long)]
        stage: Option<String>,

        /// Poll until the invalidation completes at the edge
        #[arg(long)]
        wait: bool,

        /// Show the composed command without executing it
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate configuration and AWS CLI availability
    Check,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_sync() {
        let cli = Cli::try_parse_from(["stagehand", "sync"]).unwrap();
        if let Commands::Sync { bucket, dry_run } = cli.command {
            assert_eq!(bucket, None);
            assert!(!dry_run);
        } else {
            panic!("Expected Sync command");
        }
    }

    #[test]
    fn test_cli_parse_sync_with_bucket_and_dry_run() {
        let cli =
            Cli::try_parse_from(["stagehand", "sync", "--bucket", "my-site", "--dry-run"])
                .unwrap();
        if let Commands::Sync { bucket, dry_run } = cli.command {
            assert_eq!(bucket.as_deref(), Some("my-site"));
            assert!(dry_run);
        } else {
            panic!("Expected Sync command");
        }
    }

    #[test]
    fn test_cli_parse_domain_info_with_stage() {
        let cli = Cli::try_parse_from(["stagehand", "domain-info", "--stage", "prod"]).unwrap();
        if let Commands::DomainInfo { stage } = cli.command {
            assert_eq!(stage.as_deref(), Some("prod"));
        } else {
            panic!("Expected DomainInfo command");
        }
    }

    #[test]
    fn test_cli_parse_invalidate_cache() {
        let cli = Cli::try_parse_from(["stagehand", "invalidate-cache", "-s", "prod", "--wait"])
            .unwrap();
        if let Commands::InvalidateCache {
            stage,
            wait,
            dry_run,
        } = cli.command
        {
            assert_eq!(stage.as_deref(), Some("prod"));
            assert!(wait);
            assert!(!dry_run);
        } else {
            panic!("Expected InvalidateCache command");
        }
    }

    #[test]
    fn test_cli_parse_check() {
        let cli = Cli::try_parse_from(["stagehand", "check"]).unwrap();
        assert!(matches!(cli.command, Commands::Check));
    }

    #[test]
    fn test_cli_json_flag() {
        let cli = Cli::try_parse_from(["stagehand", "--json", "sync"]).unwrap();
        assert!(cli.json);
    }

    #[test]
    fn test_cli_json_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["stagehand", "domain-info", "--json"]).unwrap();
        assert!(cli.json);
    }

    #[test]
    fn test_cli_verbose_flag() {
        let cli = Cli::try_parse_from(["stagehand", "-vv", "sync"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_config_flag() {
        let cli = Cli::try_parse_from([
            "stagehand",
            "--config",
            "deploy/stagehand.toml",
            "check",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("deploy/stagehand.toml")));
    }

    #[test]
    fn test_cli_requires_a_subcommand() {
        assert!(Cli::try_parse_from(["stagehand"]).is_err());
    }
}
