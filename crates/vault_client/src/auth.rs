//! Token loading.
//!
//! The token lives in a plain file (`.token` by default) next to where the
//! tool is run. `QMARK_TOKEN` in the environment takes precedence.

use std::path::Path;

use crate::client::VaultError;

pub const DEFAULT_TOKEN_FILE: &str = ".token";
pub const DEFAULT_BASE_URL: &str = "https://vault.cca.edu";
pub const TOKEN_ENV: &str = "QMARK_TOKEN";
pub const BASE_URL_ENV: &str = "QMARK_BASE_URL";

/// Everything needed to talk to the repository.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub token: String,
    /// API host, e.g. "https://vault.cca.edu" (no trailing slash needed)
    pub base_url: String,
}

impl Credentials {
    pub fn new(token: String, base_url: String) -> Self {
        Self { token, base_url }
    }
}

/// Read a token file, trimming surrounding whitespace.
pub fn load_token(path: &Path) -> Result<String, VaultError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| VaultError::Io(format!("{}: {}", path.display(), e)))?;
    let token = contents.trim();
    if token.is_empty() {
        return Err(VaultError::NotAuthenticated(format!("{} is empty", path.display())));
    }
    Ok(token.to_string())
}

/// Token from the environment value if set and non-blank, else from the file.
pub fn resolve_token(env_value: Option<&str>, path: &Path) -> Result<String, VaultError> {
    match env_value.map(str::trim) {
        Some(token) if !token.is_empty() => Ok(token.to_string()),
        _ => load_token(path),
    }
}
