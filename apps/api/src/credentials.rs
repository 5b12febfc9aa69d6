//! Credential resolution — an ordered list of providers, polled in sequence,
//! first success wins. Resolution happens once, lazily, per analysis request
//! so the key is never cached across requests or baked into ambient state.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::errors::AppError;

/// Environment variable (and secrets-file key) holding the API key.
/// Name preserved for operational compatibility with existing deployments.
pub const API_KEY_NAME: &str = "OPENAI_API_KEY";

pub trait CredentialProvider: Send + Sync {
    fn name(&self) -> &str;
    /// Returns the key if this provider can supply a non-empty value.
    fn resolve(&self) -> Option<String>;
}

/// Reads the key from a process environment variable.
pub struct EnvProvider {
    var: String,
}

impl EnvProvider {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl CredentialProvider for EnvProvider {
    fn name(&self) -> &str {
        "environment"
    }

    fn resolve(&self) -> Option<String> {
        std::env::var(&self.var)
            .ok()
            .filter(|v| !v.trim().is_empty())
    }
}

/// Reads the key from a JSON object on disk — the stand-in for a
/// host-injected secrets store. A missing or malformed file is not an error,
/// it simply means this provider yields nothing.
pub struct SecretsFileProvider {
    path: PathBuf,
    key: String,
}

impl SecretsFileProvider {
    pub fn new(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
        }
    }
}

impl CredentialProvider for SecretsFileProvider {
    fn name(&self) -> &str {
        "secrets file"
    }

    fn resolve(&self) -> Option<String> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(_) => return None,
        };

        let secrets: serde_json::Value = match serde_json::from_str(&content) {
            Ok(value) => value,
            Err(e) => {
                warn!("secrets file {} is not valid JSON: {e}", self.path.display());
                return None;
            }
        };

        secrets
            .get(&self.key)
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(String::from)
    }
}

/// Ordered provider chain. Default order: secrets store first, environment
/// second.
pub struct CredentialChain {
    providers: Vec<Box<dyn CredentialProvider>>,
}

impl CredentialChain {
    pub fn new(providers: Vec<Box<dyn CredentialProvider>>) -> Self {
        Self { providers }
    }

    pub fn default_chain(secrets_file: Option<&Path>) -> Self {
        let mut providers: Vec<Box<dyn CredentialProvider>> = Vec::new();
        if let Some(path) = secrets_file {
            providers.push(Box::new(SecretsFileProvider::new(path, API_KEY_NAME)));
        }
        providers.push(Box::new(EnvProvider::new(API_KEY_NAME)));
        Self::new(providers)
    }

    /// Polls each provider in order; the first non-empty value wins.
    pub fn resolve(&self) -> Result<String, AppError> {
        for provider in &self.providers {
            if let Some(key) = provider.resolve() {
                debug!("API key resolved via {}", provider.name());
                return Ok(key);
            }
        }
        Err(AppError::MissingCredential)
    }
}
