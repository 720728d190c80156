//! CMS preview sessions
//!
//! The CMS sends editors to `/api/preview` with a preview ref and the id of
//! the document being edited. A valid pair turns into a redirect to that
//! document's page plus a [`PreviewSession`] that later renders read from.

use percent_encoding::{percent_decode_str, utf8_percent_encode, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

use crate::content::POST_TYPE;
use crate::error::{Error, Result};
use crate::prismic::{ContentSource, Document};

/// Where a document lives on the site
pub fn link_resolver(doc: &Document) -> String {
    match (doc.doc_type.as_str(), doc.uid.as_deref()) {
        (POST_TYPE, Some(uid)) => format!("/post/{}", uid),
        _ => "/".to_string(),
    }
}

/// An active preview: renders use `reference` instead of published content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewSession {
    #[serde(rename = "ref")]
    pub reference: String,
}

impl PreviewSession {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
        }
    }

    /// `Set-Cookie` value persisting this session
    pub fn to_cookie(&self, name: &str, secure: bool) -> String {
        format!(
            "{}={}; {}",
            name,
            utf8_percent_encode(&self.reference, NON_ALPHANUMERIC),
            cookie_attributes(secure)
        )
    }

    /// Recover a session from a `Cookie` request header
    pub fn from_cookie_header(header: &str, name: &str) -> Option<Self> {
        header
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(key, _)| *key == name)
            .and_then(|(_, value)| percent_decode_str(value).decode_utf8().ok())
            .filter(|value| !value.is_empty())
            .map(|value| Self::new(value.into_owned()))
    }
}

/// `Set-Cookie` value ending a preview session
pub fn clear_cookie(name: &str, secure: bool) -> String {
    format!("{}=; {}; Max-Age=0", name, cookie_attributes(secure))
}

fn cookie_attributes(secure: bool) -> &'static str {
    if secure {
        "Path=/; HttpOnly; SameSite=Lax; Secure"
    } else {
        "Path=/; HttpOnly; SameSite=Lax"
    }
}

/// Result of checking a preview request
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewOutcome {
    Redirect {
        location: String,
        session: PreviewSession,
    },
    Rejected,
}

impl PreviewOutcome {
    /// Turn a rejection into [`Error::InvalidPreviewToken`]
    pub fn into_result(self) -> Result<(String, PreviewSession)> {
        match self {
            PreviewOutcome::Redirect { location, session } => Ok((location, session)),
            PreviewOutcome::Rejected => Err(Error::InvalidPreviewToken),
        }
    }
}

/// Validate `token` against `document_id` and work out where to send the editor
///
/// The CMS is trusted completely: if it returns the document under the
/// preview ref, the token is good. An unknown document or a ref the CMS
/// refuses is a rejection; an unreachable CMS is an error.
pub async fn resolve_preview(
    source: &dyn ContentSource,
    token: &str,
    document_id: &str,
) -> Result<PreviewOutcome> {
    if token.is_empty() || document_id.is_empty() {
        return Ok(PreviewOutcome::Rejected);
    }

    match source.get_by_id(document_id, Some(token)).await {
        Ok(Some(doc)) => {
            let location = link_resolver(&doc);
            tracing::info!("Preview of {} resolved to {}", document_id, location);
            Ok(PreviewOutcome::Redirect {
                location,
                session: PreviewSession::new(token),
            })
        }
        Ok(None) => {
            tracing::warn!("Preview rejected: no document {} under ref", document_id);
            Ok(PreviewOutcome::Rejected)
        }
        Err(e) if e.is_client_status() => {
            tracing::warn!("Preview rejected by CMS: {}", e);
            Ok(PreviewOutcome::Rejected)
        }
        Err(e) => Err(e),
    }
}
