//! Constants used throughout gantry.
//!
//! Centralizes magic strings and configuration values.

/// Identifier of gantry's entry in the host build config plugin list.
pub const PLUGIN_NAME: &str = "gantry";

/// Host build config file name (build.toml).
pub const HOST_CONFIG_FILE: &str = "build.toml";

/// Default application descriptor path.
pub const DEFAULT_APP_FILE: &str = "./app.yml";

/// Descriptor field holding the runtime environment.
pub const ENV_VARIABLES_FIELD: &str = "env_variables";

/// Default external deploy tool.
pub const DEFAULT_TOOL: &str = "gcloud";

/// Documentation for configuring the plugin entry.
pub const DOCS_URL: &str = "https://github.com/gantry-deploy/gantry#configuration";

/// Environment block merged into every deployed descriptor.
///
/// Applied after the descriptor's own `env_variables` and before secrets.
pub const PRODUCTION_ENV: &[(&str, &str)] = &[("NODE_ENV", "production")];
