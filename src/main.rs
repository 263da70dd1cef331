//! Stagehand CLI - static web app deployment helper
//!
//! Usage: stagehand <COMMAND>
//!
//! Commands:
//!   sync              Mirror the local asset directory into the S3 bucket
//!   domain-info       Print the CloudFront domain serving a deployed stage
//!   invalidate-cache  Invalidate the CloudFront cache for a deployed stage
//!   check             Validate configuration and AWS CLI availability

mod cli;
mod output;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};
use output::ConsoleLog;
use stagehand::{AwsCli, Config, DeployOptions, Deployer};

fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    if let Err(err) = run(cli) {
        output::print_error(&err, json);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    let json = cli.json;
    let verbose = cli.verbose > 0;

    match cli.command {
        Commands::Sync { bucket, dry_run } => cmd_sync(config, bucket, dry_run, json, verbose),
        Commands::DomainInfo { stage } => cmd_domain_info(config, stage, json, verbose),
        Commands::InvalidateCache {
            stage,
            wait,
            dry_run,
        } => cmd_invalidate_cache(config, stage, wait, dry_run, json, verbose),
        Commands::Check => cmd_check(config, json),
    }
}

/// Resolve the effective config: explicit `--config` path, or the project /
/// user config hierarchy. Env overrides apply in both paths.
fn load_config(cli: &Cli) -> Result<Config> {
    if let Some(path) = &cli.config {
        let (config, warnings) = Config::load_with_warnings(path)?;
        if !cli.json {
            output::print_config_warnings(path, &warnings);
        }
        return Ok(config.with_env_overrides());
    }

    let cwd = std::env::current_dir()?;
    let project_config = cwd.join("stagehand.toml");
    if project_config.exists() {
        let (config, warnings) = Config::load_with_warnings(&project_config)?;
        if !cli.json {
            output::print_config_warnings(&project_config, &warnings);
        }
        return Ok(config.with_env_overrides());
    }

    Ok(Config::load_or_default(Some(&cwd)))
}

fn cmd_sync(
    mut config: Config,
    bucket: Option<String>,
    dry_run: bool,
    json: bool,
    verbose: bool,
) -> Result<()> {
    if let Some(bucket) = bucket {
        config.site.bucket = bucket;
    }
    if config.site.bucket.is_empty() {
        anyhow::bail!("no bucket configured - set site.bucket or pass --bucket");
    }

    if !json {
        println!("📦 Stagehand Sync");
        println!("Source: {}/", config.site.app_dir.trim_end_matches('/'));
        println!("Bucket: s3://{}/", config.site.bucket);
    }

    let runner = AwsCli::new();
    let log = ConsoleLog::new(json);
    let options = DeployOptions {
        dry_run,
        verbose,
        ..DeployOptions::default()
    };
    Deployer::new(&runner, &config, &log, options).sync()?;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "event": "sync",
                "status": "success",
                "bucket": config.site.bucket,
                "dry_run": dry_run,
            })
        );
    }

    Ok(())
}

fn cmd_domain_info(
    mut config: Config,
    stage: Option<String>,
    json: bool,
    verbose: bool,
) -> Result<()> {
    if let Some(stage) = stage {
        config.stack.stage = stage;
    }
    if config.stack.service.is_empty() {
        anyhow::bail!("no service configured - set stack.service");
    }

    let runner = AwsCli::new();
    let log = ConsoleLog::new(json);
    let options = DeployOptions {
        verbose,
        ..DeployOptions::default()
    };
    let domain = Deployer::new(&runner, &config, &log, options).domain_info()?;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "event": "domain-info",
                "stage": config.stack.stage,
                "domain": domain,
            })
        );
    }

    Ok(())
}

fn cmd_invalidate_cache(
    mut config: Config,
    stage: Option<String>,
    wait: bool,
    dry_run: bool,
    json: bool,
    verbose: bool,
) -> Result<()> {
    if let Some(stage) = stage {
        config.stack.stage = stage;
    }
    if config.stack.service.is_empty() {
        anyhow::bail!("no service configured - set stack.service");
    }

    let runner = AwsCli::new();
    let log = ConsoleLog::new(json);
    let options = DeployOptions {
        dry_run,
        wait,
        verbose,
        ..DeployOptions::default()
    };
    Deployer::new(&runner, &config, &log, options).invalidate_cache()?;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "event": "invalidate-cache",
                "stage": config.stack.stage,
                "status": "success",
                "dry_run": dry_run,
            })
        );
    }

    Ok(())
}

fn cmd_check(config: Config, json: bool) -> Result<()> {
    let problems = config.validate();
    let aws_available = AwsCli::new().check_available();

    if json {
        println!(
            "{}",
            serde_json::json!({
                "event": "check",
                "status": if problems.is_empty() && aws_available { "ok" } else { "failed" },
                "aws_cli": aws_available,
                "problems": problems,
            })
        );
    } else {
        println!("Stagehand Check");
        for problem in &problems {
            println!("  {} {}", output::fail_marker(), problem);
        }
        if problems.is_empty() {
            println!("  {} configuration complete", output::ok_marker());
        }
        if aws_available {
            println!("  {} aws CLI available", output::ok_marker());
        } else {
            println!("  {} aws CLI not found on PATH", output::fail_marker());
        }
    }

    if !problems.is_empty() || !aws_available {
        anyhow::bail!("check failed");
    }

    Ok(())
}
