//! Deployment pipeline.
//!
//! A run moves through a fixed sequence of [`Stage`]s. Each gate must pass
//! before the next stage starts, and the first failure ends the run.
//!
//! ```text
//! ConfigAssembled → DescriptorLoaded → SecretsResolved → KeyFileValidated
//!   → DescriptorMutated → Authenticated → ProjectSelected → Deployed
//!   → [CronDeployed] → Complete
//! ```
//!
//! The descriptor is written at `DescriptorMutated`, before the deploy tool
//! runs. It is not restored if a later stage fails.

use std::fmt;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::core::config::ResolvedConfig;
use crate::core::constants;
use crate::core::runner::{self, Runner};
use crate::core::secrets::{self, EnvSnapshot};
use crate::error::{DescriptorError, KeyFileError, Result};

/// Pipeline stages, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    ConfigAssembled,
    DescriptorLoaded,
    SecretsResolved,
    KeyFileValidated,
    DescriptorMutated,
    Authenticated,
    ProjectSelected,
    Deployed,
    CronDeployed,
    Complete,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::ConfigAssembled => "config assembled",
            Stage::DescriptorLoaded => "descriptor loaded",
            Stage::SecretsResolved => "secrets resolved",
            Stage::KeyFileValidated => "key file validated",
            Stage::DescriptorMutated => "descriptor written",
            Stage::Authenticated => "authenticated",
            Stage::ProjectSelected => "project selected",
            Stage::Deployed => "app deployed",
            Stage::CronDeployed => "cron deployed",
            Stage::Complete => "complete",
        };
        f.write_str(name)
    }
}

/// One deployment run.
pub struct Deployment {
    config: ResolvedConfig,
    env: EnvSnapshot,
    runner: Box<dyn Runner>,
    dry_run: bool,
    stage: Stage,
}

impl Deployment {
    /// Prepare a run from an assembled config.
    ///
    /// `env` is the environment secrets are resolved from.
    pub fn new(config: ResolvedConfig, env: EnvSnapshot, runner: Box<dyn Runner>) -> Self {
        Self {
            config,
            env,
            runner,
            dry_run: false,
            stage: Stage::ConfigAssembled,
        }
    }

    /// Skip writing the descriptor. Pair with a [`runner::DryRun`] runner.
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// The last stage reached.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// Deploy tool commands this run issues, in order.
    pub fn commands(&self) -> Vec<String> {
        self.steps()
            .iter()
            .map(|(_, args)| runner::render(self.runner.program(), args))
            .collect()
    }

    /// Run the pipeline to completion or the first failure.
    ///
    /// # Errors
    ///
    /// - `DescriptorError::Missing` if no descriptor was loaded
    /// - `SecretError::MissingVariable` for the first unset secret
    /// - `KeyFileError` if the key file is unset or doesn't exist
    /// - `DescriptorError::Write` if the descriptor can't be written
    /// - `CommandError` if the deploy tool fails; later commands don't run
    pub fn run(&mut self) -> Result<()> {
        let mut descriptor =
            self.config
                .app_file
                .clone()
                .ok_or_else(|| DescriptorError::Missing {
                    path: self.config.app_file_name.clone(),
                })?;
        self.advance(Stage::DescriptorLoaded);

        let secret_vars = secrets::resolve(&self.config.secrets, &self.env)?;
        self.advance(Stage::SecretsResolved);

        self.validate_key_file()?;
        self.advance(Stage::KeyFileValidated);

        descriptor.merge_env(constants::PRODUCTION_ENV.iter().copied());
        descriptor.merge_env(secret_vars.iter());
        debug!(
            env_variables = descriptor.env_variables().len(),
            secrets = secret_vars.len(),
            "descriptor env merged"
        );

        if self.dry_run {
            warn!(path = %self.config.app_file_name.display(), "dry run, descriptor not written");
        } else {
            descriptor.save(&self.config.app_file_name)?;
        }
        self.advance(Stage::DescriptorMutated);

        for (stage, args) in self.steps() {
            self.runner.run(&args)?;
            self.advance(stage);
        }

        self.advance(Stage::Complete);
        Ok(())
    }

    fn advance(&mut self, stage: Stage) {
        info!(stage = %stage, "stage reached");
        self.stage = stage;
    }

    fn validate_key_file(&self) -> Result<()> {
        let path = self.config.key_file.as_ref().ok_or(KeyFileError::Unspecified)?;
        if !path.exists() {
            return Err(KeyFileError::NotFound(path.clone()).into());
        }
        Ok(())
    }

    fn steps(&self) -> Vec<(Stage, Vec<String>)> {
        let key_file = self.config.key_file.clone().unwrap_or_default();

        let mut steps = vec![
            (Stage::Authenticated, authenticate_args(&key_file)),
            (
                Stage::ProjectSelected,
                set_project_args(self.config.project.as_deref()),
            ),
            (
                Stage::Deployed,
                deploy_args(&self.config.app_file_name, self.config.version.as_deref()),
            ),
        ];

        if let Some(cron) = &self.config.cron_file {
            steps.push((Stage::CronDeployed, deploy_cron_args(cron)));
        }

        steps
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn authenticate_args(key_file: &Path) -> Vec<String> {
    vec![
        "auth".into(),
        "activate-service-account".into(),
        "--key-file".into(),
        path_arg(key_file),
    ]
}

// An unset project is passed through as an empty argument for the tool to reject.
fn set_project_args(project: Option<&str>) -> Vec<String> {
    vec![
        "config".into(),
        "set".into(),
        "project".into(),
        project.unwrap_or_default().into(),
    ]
}

fn deploy_args(app_file: &Path, version: Option<&str>) -> Vec<String> {
    let mut args = vec![
        "app".into(),
        "deploy".into(),
        path_arg(app_file),
        "--quiet".into(),
        "--stop-previous-version".into(),
        "--promote".into(),
    ];
    if let Some(v) = version {
        args.push("--version".into());
        args.push(v.into());
    }
    args
}

fn deploy_cron_args(cron_file: &Path) -> Vec<String> {
    vec![
        "app".into(),
        "deploy".into(),
        path_arg(cron_file),
        "--quiet".into(),
    ]
}
