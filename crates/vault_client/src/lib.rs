//! Item repository API client.
//!
//! Fetches an item's status, view link and attachment list, authenticated
//! with a token read once at startup. Implements the engine's
//! [`qmark_recon::AttachmentSource`] so the driver never sees HTTP.
//!
//! No retries. No caching.

mod auth;
mod client;

pub use auth::{
    load_token, resolve_token, Credentials, BASE_URL_ENV, DEFAULT_BASE_URL, DEFAULT_TOKEN_FILE, TOKEN_ENV,
};
pub use client::{Attachment, ItemLinks, ItemResponse, VaultClient, VaultError};
