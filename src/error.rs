//! Error types shared by the CMS client, the assemblers and the preview resolver

use thiserror::Error;

/// Errors produced while talking to the CMS or shaping its documents
#[derive(Debug, Error)]
pub enum Error {
    #[error("post not found: {uid}")]
    NotFound { uid: String },

    #[error("Invalid token")]
    InvalidPreviewToken,

    #[error("CMS request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("CMS responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode CMS response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("repository exposes no master ref")]
    NoMasterRef,

    #[error("cursor does not point at the configured repository: {url}")]
    InvalidCursor { url: String },

    #[error("post {uid} was already loaded")]
    DuplicatePost { uid: String },

    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Whether the CMS refused the request itself (4xx), as opposed to being unreachable
    pub fn is_client_status(&self) -> bool {
        matches!(self, Error::Status { status, .. } if (400..500).contains(status))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
