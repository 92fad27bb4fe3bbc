//! Secret resolution.
//!
//! Declared secret names are looked up in an environment snapshot taken by
//! the caller. Resolution never reads the process environment itself.

use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;
use zeroize::Zeroizing;

use crate::error::{Result, SecretError};

/// A point-in-time copy of environment variables.
#[derive(Debug, Clone, Default)]
pub struct EnvSnapshot {
    vars: BTreeMap<String, String>,
}

impl EnvSnapshot {
    /// Capture the current process environment.
    ///
    /// Entries whose name or value is not valid UTF-8 are skipped.
    pub fn from_process() -> Self {
        std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect()
    }

    /// Look up a variable. `Some("")` means set to the empty string.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Resolved secret values, keyed by secret name.
///
/// Values are wiped from memory when the map is dropped. Copies handed out
/// through [`SecretVars::iter`] or [`SecretVars::get`] are not covered; once
/// merged into a descriptor they live as ordinary YAML strings.
#[derive(Default)]
pub struct SecretVars {
    vars: BTreeMap<String, Zeroizing<String>>,
}

impl SecretVars {
    /// Value of a resolved secret.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(|v| v.as_str())
    }

    /// Resolved names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }

    /// Name/value pairs in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

// Never print values.
impl fmt::Debug for SecretVars {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

/// Resolve each declared secret from `env`.
///
/// Stops at the first name that is not set, in declaration order. A
/// variable set to the empty string resolves to `""`.
///
/// # Errors
///
/// Returns `SecretError::MissingVariable` naming the first unset variable.
pub fn resolve(declared: &[String], env: &EnvSnapshot) -> Result<SecretVars> {
    debug!(declared = declared.len(), "resolving secrets");

    let mut resolved = SecretVars::default();
    for name in declared {
        let value = env
            .get(name)
            .ok_or_else(|| SecretError::MissingVariable(name.clone()))?;
        resolved
            .vars
            .insert(name.clone(), Zeroizing::new(value.to_string()));
    }

    debug!(resolved = resolved.len(), "secrets resolved");
    Ok(resolved)
}
