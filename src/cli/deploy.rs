//! Deploy command.
//!
//! Assembles the configuration, runs the deployment pipeline and reports
//! the outcome.

use clap::Args;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::cli::output;
use crate::core::config::{self, CliOverrides, HostConfig};
use crate::core::constants;
use crate::core::deploy::{Deployment, Stage};
use crate::core::runner::{DryRun, Gcloud, Runner};
use crate::core::secrets::EnvSnapshot;
use crate::error::Result;

/// Deployment flags.
#[derive(Args, Debug, Clone)]
pub struct DeployArgs {
    /// Host build config holding the plugin list
    #[arg(long, value_name = "PATH", default_value = constants::HOST_CONFIG_FILE)]
    pub config: PathBuf,

    /// App descriptor to deploy [default: ./app.yml]
    #[arg(long, value_name = "PATH")]
    pub app_file: Option<PathBuf>,

    /// Service account key file
    #[arg(long, value_name = "PATH")]
    pub key_file: Option<PathBuf>,

    /// Target project
    #[arg(long = "project-id", value_name = "ID")]
    pub project: Option<String>,

    /// Version name for the deployed app
    #[arg(long, value_name = "VERSION")]
    pub app_version: Option<String>,

    /// Cron descriptor deployed after the app
    #[arg(long, value_name = "PATH")]
    pub cron_file: Option<PathBuf>,

    /// Deploy tool executable
    #[arg(long, value_name = "PROGRAM", env = "GANTRY_TOOL", default_value = constants::DEFAULT_TOOL)]
    pub tool: String,

    /// Validate and print the commands without writing or deploying
    #[arg(long)]
    pub dry_run: bool,
}

impl DeployArgs {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            app_file: self.app_file.clone(),
            key_file: self.key_file.clone(),
            project: self.project.clone(),
            app_version: self.app_version.clone(),
            cron_file: self.cron_file.clone(),
        }
    }

    fn runner(&self) -> Box<dyn Runner> {
        if self.dry_run {
            return Box::new(DryRun::new(&self.tool));
        }

        let gcloud = Gcloud::new(&self.tool);
        match gcloud.locate() {
            Some(path) => debug!(path = %path.display(), "deploy tool found"),
            None => warn!(tool = %self.tool, "deploy tool not found on PATH"),
        }
        Box::new(gcloud)
    }
}

/// Run a deployment.
pub fn execute(args: DeployArgs) -> Result<()> {
    let host = HostConfig::load(&args.config)?;
    let resolved = config::assemble(&host, args.overrides())?;

    let mut deployment =
        Deployment::new(resolved, EnvSnapshot::from_process(), args.runner()).dry_run(args.dry_run);

    if let Err(e) = deployment.run() {
        if deployment.stage() >= Stage::DescriptorMutated && !args.dry_run {
            output::warn(&format!(
                "{} was rewritten before the failure and was not restored",
                output::path(deployment.config().app_file_name.display())
            ));
        }
        return Err(e);
    }

    let config = deployment.config();
    if args.dry_run {
        output::header("Dry run");
        output::kv("descriptor", output::path(config.app_file_name.display()));
        output::kv("secrets", config.secrets.len());
        for command in deployment.commands() {
            output::list_item(&command);
        }
        return Ok(());
    }

    output::success(&format!(
        "deployed {}",
        output::path(config.app_file_name.display())
    ));
    if let Some(project) = &config.project {
        output::kv("project", project);
    }
    if let Some(cron) = &config.cron_file {
        output::kv("cron", output::path(cron.display()));
    }

    Ok(())
}
