//! Gantry - deploy app.yml services with secrets injected from the environment.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── deploy        # Deploy command and flags
//! │   └── output        # Terminal output helpers
//! └── core/             # Core library components
//!     ├── config        # build.toml plugin entry + CLI overrides
//!     ├── constants     # Plugin name, defaults, production env block
//!     ├── descriptor    # app.yml load/save and env merge
//!     ├── secrets       # Secret resolution from an env snapshot
//!     ├── runner        # Deploy tool invocation (Runner trait)
//!     └── deploy        # The staged deployment pipeline
//! ```
//!
//! # Pipeline
//!
//! 1. Load the descriptor
//! 2. Resolve declared secrets from the environment
//! 3. Check the service account key file exists
//! 4. Merge `env_variables`, production block, then secrets; write app.yml
//! 5. `auth activate-service-account`, `config set project`, `app deploy`
//! 6. `app deploy` the cron descriptor, if one is given

pub mod cli;
pub mod core;
pub mod error;
