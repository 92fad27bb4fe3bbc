//! Command helper methods for Test.

use super::fixtures::*;
use super::Test;
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// Create a gantry command bound to the project.
    ///
    /// Returns a Command configured with:
    /// - current directory set to the test project directory
    /// - the stub tool log path exported
    /// - no inherited gantry logging or tool overrides
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("gantry").expect("failed to find gantry binary");
        cmd.current_dir(self.dir.path());
        cmd.env("GANTRY_STUB_LOG", self.path(CALL_LOG));
        cmd.env("NO_COLOR", "1");
        cmd.env_remove("GANTRY_LOG");
        cmd.env_remove("GANTRY_LOG_FORMAT");
        cmd.env_remove("GANTRY_TOOL");
        cmd.env_remove("GANTRY_STUB_FAIL");
        cmd.env_remove("GANTRY_STUB_PROGRESS");
        cmd
    }

    /// A gantry command with the standard deploy flags.
    pub fn deploy_cmd(&self) -> Command {
        let mut cmd = self.cmd();
        cmd.arg("--tool")
            .arg(self.path(STUB_TOOL))
            .args(["--key-file", KEY_FILE, "--project-id", PROJECT_ID]);
        cmd
    }

    /// Shortcut for a deploy with environment `env`.
    pub fn deploy(&self, env: &[(&str, &str)]) -> Output {
        let mut cmd = self.deploy_cmd();
        cmd.envs(env.iter().copied());
        cmd.output().expect("failed to run gantry")
    }

    /// Shortcut for a deploy including the cron descriptor.
    pub fn deploy_with_cron(&self, env: &[(&str, &str)]) -> Output {
        let mut cmd = self.deploy_cmd();
        cmd.args(["--cron-file", CRON_FILE]);
        cmd.envs(env.iter().copied());
        cmd.output().expect("failed to run gantry")
    }

    /// Shortcut for a deploy where the stub fails on commands starting with `prefix`.
    pub fn deploy_failing_on(&self, prefix: &str) -> Output {
        let mut cmd = self.deploy_cmd();
        cmd.args(["--cron-file", CRON_FILE]);
        cmd.env("GANTRY_STUB_FAIL", prefix);
        cmd.output().expect("failed to run gantry")
    }
}
