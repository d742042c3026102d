//! Runtime credential resolution.
//!
//! Config YAML stores only env var **names**. Callers resolve once at
//! startup and pass [`PortalCredentials`] into the portal adapter; never
//! scatter `std::env::var` calls across the codebase. Error messages
//! reference the env var name, never the value.

use anyhow::{bail, Result};

use crate::CredentialEnvNames;

/// Portal sign-in credentials resolved from the environment.
/// The password is redacted in `Debug` output.
#[derive(Clone)]
pub struct PortalCredentials {
    pub username: String,
    password: String,
}

impl PortalCredentials {
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for PortalCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortalCredentials")
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .finish()
    }
}

fn resolve_env(var_name: &str) -> Option<String> {
    match std::env::var(var_name) {
        Ok(v) if !v.trim().is_empty() => Some(v),
        _ => None,
    }
}

/// Resolve both credential env vars or fail naming the missing variable.
pub fn resolve_credentials(names: &CredentialEnvNames) -> Result<PortalCredentials> {
    let Some(username) = resolve_env(&names.username) else {
        bail!(
            "SECRETS_MISSING: required env var '{}' (portal username) is not set or empty",
            names.username,
        );
    };
    let Some(password) = resolve_env(&names.password) else {
        bail!(
            "SECRETS_MISSING: required env var '{}' (portal password) is not set or empty",
            names.password,
        );
    };
    Ok(PortalCredentials { username, password })
}
