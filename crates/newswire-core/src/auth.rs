use crate::error::AppError;
use crate::traits::ApiKeySource;

/// Default environment variable holding the upstream API key.
pub const API_KEY_VAR: &str = "API_KEY";

/// Reads the upstream API key from the process environment on every call.
#[derive(Debug, Clone)]
pub struct EnvApiKey {
    var: String,
}

impl EnvApiKey {
    pub fn new() -> Self {
        Self::from_var(API_KEY_VAR)
    }

    /// Read from a custom variable name instead of `API_KEY`.
    pub fn from_var(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvApiKey {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiKeySource for EnvApiKey {
    fn api_key(&self) -> Result<String, AppError> {
        match std::env::var(&self.var) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(AppError::MissingAuthKey),
        }
    }
}

/// A fixed key, for CLI overrides and tests.
#[derive(Debug, Clone)]
pub struct StaticApiKey(Option<String>);

impl StaticApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(Some(key.into()))
    }

    /// A source that always reports the key as missing.
    pub fn missing() -> Self {
        Self(None)
    }
}

impl ApiKeySource for StaticApiKey {
    fn api_key(&self) -> Result<String, AppError> {
        self.0.clone().ok_or(AppError::MissingAuthKey)
    }
}
