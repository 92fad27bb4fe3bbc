//! Test fixtures and constants.

/// Host build config file name.
pub const HOST_CONFIG: &str = "build.toml";

/// Descriptor file name.
pub const APP_FILE: &str = "app.yml";

/// Service account key file name.
pub const KEY_FILE: &str = "key.json";

/// Cron descriptor file name.
pub const CRON_FILE: &str = "cron.yaml";

/// Stub deploy tool file name.
pub const STUB_TOOL: &str = "fake-gcloud";

/// File the stub appends its arguments to.
pub const CALL_LOG: &str = "calls.log";

/// Project id passed on the command line.
pub const PROJECT_ID: &str = "demo-project";

/// Sample descriptor with existing env variables.
pub const SAMPLE_APP_YML: &str = r#"runtime: nodejs20
service: api
env_variables:
  A: "1"
  B: "2"
  NODE_ENV: development
handlers:
  - url: /.*
    script: auto
"#;

/// Sample cron descriptor.
pub const SAMPLE_CRON_YAML: &str = r#"cron:
  - description: nightly cleanup
    url: /tasks/cleanup
    schedule: every 24 hours
"#;

/// Contents of the fake key file.
pub const SAMPLE_KEY: &str = r#"{"type": "service_account", "project_id": "demo-project"}"#;

/// Stub deploy tool.
///
/// Appends its arguments to `$GANTRY_STUB_LOG`. Exits 1 when the arguments
/// start with `$GANTRY_STUB_FAIL`. With `$GANTRY_STUB_PROGRESS` set, each
/// call also writes `<progress>: <args>` to stderr.
pub const STUB_TOOL_SCRIPT: &str = r#"#!/bin/sh
echo "$*" >> "$GANTRY_STUB_LOG"
if [ -n "$GANTRY_STUB_PROGRESS" ]; then
  echo "$GANTRY_STUB_PROGRESS: $*" >&2
fi
if [ -n "$GANTRY_STUB_FAIL" ]; then
  case "$*" in
    "$GANTRY_STUB_FAIL"*)
      echo "ERROR: (stub) $GANTRY_STUB_FAIL failed" >&2
      exit 1
      ;;
  esac
fi
exit 0
"#;
