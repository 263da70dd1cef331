//! Common test utilities for Stagehand integration tests.
//!
//! `TestEnv` builds an isolated project directory with a `stagehand.toml` and
//! a scripted fake `aws` binary on PATH, then runs the real stagehand binary
//! inside it. The fake script appends every argv it receives to a log file,
//! so tests can assert the exact composed invocations.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

use tempfile::TempDir;

pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    pub fn combined_output(&self) -> String {
        format!("stdout:\n{}\nstderr:\n{}", self.stdout, self.stderr)
    }
}

pub struct TestEnv {
    project: TempDir,
    bin_dir: PathBuf,
    call_log: PathBuf,
}

impl TestEnv {
    /// Create an environment with the given config file content and a fake
    /// `aws` implemented by the given shell snippet. The snippet sees the
    /// original arguments; every call is logged before it runs.
    pub fn new(config: &str, aws_script_body: &str) -> Self {
        let project = tempfile::tempdir().expect("Failed to create temp project dir");
        fs::write(project.path().join("stagehand.toml"), config)
            .expect("Failed to write stagehand.toml");

        let bin_dir = project.path().join("test-bin");
        fs::create_dir_all(&bin_dir).expect("Failed to create bin dir");

        let call_log = project.path().join("aws-calls.log");
        let script = format!(
            "#!/bin/sh\nprintf '%s\\n' \"$*\" >> \"${{STAGEHAND_TEST_LOG:-/dev/null}}\"\n{}\n",
            aws_script_body
        );
        let script_path = bin_dir.join("aws");
        fs::write(&script_path, script).expect("Failed to write fake aws script");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&script_path, fs::Permissions::from_mode(0o755))
                .expect("Failed to mark fake aws executable");
        }

        Self {
            project,
            bin_dir,
            call_log,
        }
    }

    /// Run the stagehand binary in this environment.
    pub fn run(&self, args: &[&str]) -> TestResult {
        let bin = env!("CARGO_BIN_EXE_stagehand");
        let path = match std::env::var("PATH") {
            Ok(original) => format!("{}:{}", self.bin_dir.display(), original),
            Err(_) => self.bin_dir.display().to_string(),
        };

        let output = Command::new(bin)
            .current_dir(self.project.path())
            .args(args)
            .env("PATH", path)
            .env("STAGEHAND_TEST_LOG", &self.call_log)
            .output()
            .expect("Failed to execute stagehand");

        self.output_to_result(output)
    }

    /// The argv of every fake `aws` call, one entry per spawned process.
    pub fn aws_calls(&self) -> Vec<String> {
        match fs::read_to_string(&self.call_log) {
            Ok(content) => content.lines().map(String::from).collect(),
            Err(_) => Vec::new(),
        }
    }

    fn output_to_result(&self, output: Output) -> TestResult {
        TestResult {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

/// Config used by most tests: no region/profile, so the composed
/// invocations are exactly the subcommand arguments.
pub const BASIC_CONFIG: &str = r#"
[site]
bucket = "test-bucket"

[stack]
service = "myapp"
stage = "prod"
"#;

/// A describe-stacks response exposing the CloudFront domain output.
pub const DESCRIBE_STACKS_OK: &str = r#"cat <<'EOF'
{"Stacks": [{"Outputs": [{"OutputKey": "WebAppCloudFrontDistributionOutput", "OutputValue": "d123.cloudfront.net"}]}]}
EOF"#;

/// A listing containing the distribution serving that domain.
pub const LIST_DISTRIBUTIONS_OK: &str = r#"cat <<'EOF'
{"DistributionList": {"Items": [{"Id": "EDFGH", "DomainName": "d123.cloudfront.net"}]}}
EOF"#;
