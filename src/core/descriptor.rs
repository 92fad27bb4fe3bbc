//! Application descriptor (app.yml) handling.
//!
//! A descriptor is a YAML mapping. Gantry only ever touches its
//! `env_variables` field; every other field is written back as it was read.

use serde_yaml_ng::{Mapping, Value};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::core::constants;
use crate::error::{DescriptorError, Result};

/// A parsed application descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    doc: Mapping,
}

impl Descriptor {
    /// Load a descriptor from disk.
    ///
    /// Returns `None` when the file is missing, unreadable, not valid YAML,
    /// or not a non-empty mapping. None of these are errors here; the
    /// pipeline decides what an absent descriptor means.
    pub fn load(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading app descriptor");

        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "app descriptor unreadable");
                None
            }
        }
    }

    /// Parse a descriptor from YAML text.
    pub fn parse(contents: &str) -> Option<Self> {
        match serde_yaml_ng::from_str::<Value>(contents) {
            Ok(Value::Mapping(doc)) if !doc.is_empty() => Some(Self { doc }),
            Ok(_) => {
                debug!("app descriptor is not a non-empty mapping");
                None
            }
            Err(e) => {
                debug!(error = %e, "app descriptor failed to parse");
                None
            }
        }
    }

    /// Write the descriptor to `path`, replacing any existing file.
    ///
    /// The YAML is written to a temporary file next to `path` and renamed
    /// over it, so readers never observe a half-written descriptor. The
    /// permissions of an existing file are carried over. A symlinked `path`
    /// is followed and its target is replaced; the link itself is kept.
    ///
    /// # Errors
    ///
    /// Returns `DescriptorError::Serialize` or `DescriptorError::Write`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let target = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        debug!(path = %path.display(), target = %target.display(), "saving app descriptor");

        let contents = serde_yaml_ng::to_string(&self.doc).map_err(DescriptorError::Serialize)?;

        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let write_err = |source| DescriptorError::Write {
            path: path.to_path_buf(),
            source,
        };

        let mut staged = NamedTempFile::new_in(dir).map_err(write_err)?;
        staged.write_all(contents.as_bytes()).map_err(write_err)?;
        staged.as_file().sync_all().map_err(write_err)?;

        if let Ok(meta) = std::fs::metadata(&target) {
            std::fs::set_permissions(staged.path(), meta.permissions()).map_err(write_err)?;
        }

        staged.persist(&target).map_err(|e| write_err(e.error))?;

        Ok(())
    }

    /// Layer key/value pairs over `env_variables`.
    ///
    /// Existing keys are overwritten in place, new keys are appended. A
    /// missing or non-mapping `env_variables` field starts out empty.
    /// Calling this once per source gives left-to-right precedence.
    pub fn merge_env<K, V>(&mut self, layer: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        let slot = self
            .doc
            .entry(Value::String(constants::ENV_VARIABLES_FIELD.to_string()))
            .or_insert(Value::Mapping(Mapping::new()));

        if !slot.is_mapping() {
            *slot = Value::Mapping(Mapping::new());
        }

        if let Value::Mapping(env) = slot {
            for (key, value) in layer {
                env.insert(Value::String(key.into()), Value::String(value.into()));
            }
        }
    }

    /// The `env_variables` field with scalar values rendered as strings.
    pub fn env_variables(&self) -> BTreeMap<String, String> {
        let Some(Value::Mapping(env)) = self.field(constants::ENV_VARIABLES_FIELD) else {
            return BTreeMap::new();
        };

        env.iter()
            .filter_map(|(k, v)| Some((scalar(k)?, scalar(v)?)))
            .collect()
    }

    /// A top-level field by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.doc.get(name)
    }
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        _ => None,
    }
}
