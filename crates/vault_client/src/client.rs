//! Repository HTTP client.
//!
//! Blocking reqwest client (no Tokio runtime required). One request per
//! item: `GET /api/item/{id}/{version}?info=attachment,detail`.

use std::time::Duration;

use serde::Deserialize;

use qmark_recon::{AttachmentInfo, AttachmentSource, FetchError, OwnerKey};

use crate::auth::Credentials;

const USER_AGENT: &str = concat!("qmark/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT_SECS: u64 = 60;
const MAX_BODY_EXCERPT: usize = 200;

/// Repository API client (blocking). Cheap to share across threads.
#[derive(Clone)]
pub struct VaultClient {
    http: reqwest::blocking::Client,
    base_url: String,
    token: String,
}

/// Error type for repository requests.
#[derive(Debug)]
pub enum VaultError {
    /// No usable token
    NotAuthenticated(String),
    /// Network error (connect, TLS, timeout)
    Network(String),
    /// Non-2xx response: status code and server message
    Http(u16, String),
    /// Body was not the expected JSON
    Parse(String),
    /// Local file I/O error
    Io(String),
}

impl std::fmt::Display for VaultError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VaultError::NotAuthenticated(msg) => write!(f, "Not authenticated: {}", msg),
            VaultError::Network(msg) => write!(f, "Network error: {}", msg),
            VaultError::Http(code, msg) if msg.is_empty() => write!(f, "HTTP {}", code),
            VaultError::Http(code, msg) => write!(f, "HTTP {}: {}", code, msg),
            VaultError::Parse(msg) => write!(f, "Parse error: {}", msg),
            VaultError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for VaultError {}

// ── Wire types ──────────────────────────────────────────────────────

/// `info=attachment,detail` response. Only the fields we read.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemResponse {
    pub status: String,
    #[serde(default)]
    pub links: ItemLinks,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemLinks {
    #[serde(default)]
    pub view: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Attachment {
    /// Absent for link/resource attachments.
    #[serde(default)]
    pub filename: Option<String>,
}

impl From<ItemResponse> for AttachmentInfo {
    fn from(item: ItemResponse) -> Self {
        AttachmentInfo {
            status: item.status,
            view_link: item.links.view,
            filenames: item
                .attachments
                .into_iter()
                .filter_map(|a| a.filename)
                .filter(|f| !f.is_empty())
                .collect(),
        }
    }
}

impl VaultClient {
    pub fn new(creds: Credentials) -> Self {
        let http = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            base_url: creds.base_url.trim_end_matches('/').to_string(),
            token: creds.token,
        }
    }

    /// Point an existing token at a different host (tests, staging).
    pub fn with_base_url(token: String, base_url: String) -> Self {
        Self::new(Credentials::new(token, base_url))
    }

    pub fn item_url(&self, owner: &OwnerKey) -> String {
        format!(
            "{}/api/item/{}/{}?info=attachment,detail",
            self.base_url, owner.entity_id, owner.version
        )
    }

    /// Fetch item detail and attachment listing.
    pub fn fetch_item(&self, owner: &OwnerKey) -> Result<ItemResponse, VaultError> {
        let url = self.item_url(owner);
        log::debug!("GET {}", url);

        let response = self.http.get(&url)
            .header("Accept", "application/json")
            .header("X-Authorization", format!("access_token={}", self.token))
            .send()
            .map_err(|e| VaultError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response.text().map_err(|e| VaultError::Network(e.to_string()))?;

        if !(200..300).contains(&status) {
            return Err(VaultError::Http(status, error_message(&text)));
        }

        serde_json::from_str(text.trim_start_matches('\u{feff}')).map_err(|e| {
            VaultError::Parse(format!("{} (body: {})", e, excerpt(&text)))
        })
    }
}

impl AttachmentSource for VaultClient {
    fn fetch(&self, owner: &OwnerKey) -> Result<AttachmentInfo, FetchError> {
        self.fetch_item(owner)
            .map(AttachmentInfo::from)
            .map_err(|e| FetchError::new(e.to_string()))
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

/// Pull a readable message out of an error body. The API answers errors
/// with `{"code": .., "error": .., "error_description": ..}`.
fn error_message(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error_description", "error", "message"] {
            if let Some(msg) = json[key].as_str() {
                if !msg.is_empty() {
                    return msg.to_string();
                }
            }
        }
    }
    excerpt(body)
}

fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(MAX_BODY_EXCERPT) {
        Some((i, _)) => format!("{}…", &trimmed[..i]),
        None => trimmed.to_string(),
    }
}
