//! Post view models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::prismic::Document;

/// Custom type of blog posts in the repository
pub const POST_TYPE: &str = "posts";

/// A post as shown in the listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostSummary {
    pub uid: String,
    pub first_publication_date: Option<DateTime<Utc>>,
    pub title: String,
    pub subtitle: String,
    pub author: String,
}

/// A paragraph of rich text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    #[serde(default)]
    pub text: String,

    #[serde(default = "paragraph_kind", rename = "type")]
    pub kind: String,

    /// Inline formatting (strong, em, hyperlink, ...), passed through untouched
    #[serde(default)]
    pub spans: Vec<serde_json::Value>,
}

fn paragraph_kind() -> String {
    "paragraph".to_string()
}

/// A heading followed by its paragraphs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    pub heading: String,
    pub body: Vec<Paragraph>,
}

/// A full post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub summary: PostSummary,
    pub banner_url: Option<String>,
    pub last_publication_date: Option<DateTime<Utc>>,
    pub content: Vec<ContentBlock>,
}

/// The `data` object of a `posts` document
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PostData {
    title: Option<String>,
    subtitle: Option<String>,
    author: Option<String>,
    banner: Option<Banner>,
    content: Vec<RawBlock>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Banner {
    url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawBlock {
    heading: Option<String>,
    body: Vec<Paragraph>,
}

fn post_data(doc: &Document) -> Result<PostData> {
    if doc.data.is_null() {
        return Ok(PostData::default());
    }
    Ok(serde_json::from_value(doc.data.clone())?)
}

fn uid_of(doc: &Document) -> Result<String> {
    doc.uid.clone().ok_or_else(|| {
        Error::Decode(serde::de::Error::custom(format!(
            "document {} has no uid",
            doc.id
        )))
    })
}

impl PostSummary {
    pub fn from_document(doc: &Document) -> Result<Self> {
        let data = post_data(doc)?;
        Ok(Self::from_parts(doc, uid_of(doc)?, &data))
    }

    fn from_parts(doc: &Document, uid: String, data: &PostData) -> Self {
        Self {
            uid,
            first_publication_date: doc.first_publication_date,
            title: data.title.clone().unwrap_or_default(),
            subtitle: data.subtitle.clone().unwrap_or_default(),
            author: data.author.clone().unwrap_or_default(),
        }
    }
}

impl PostDetail {
    pub fn from_document(doc: &Document) -> Result<Self> {
        let data = post_data(doc)?;
        let summary = PostSummary::from_parts(doc, uid_of(doc)?, &data);
        let banner_url = data.banner.and_then(|b| b.url);
        let content = data
            .content
            .into_iter()
            .map(|block| ContentBlock {
                heading: block.heading.unwrap_or_default(),
                body: block.body,
            })
            .collect();

        Ok(Self {
            summary,
            banner_url,
            last_publication_date: doc.last_publication_date,
            content,
        })
    }

    pub fn uid(&self) -> &str {
        &self.summary.uid
    }

    pub fn title(&self) -> &str {
        &self.summary.title
    }

    /// Whether the post was edited after it was first published
    pub fn was_edited(&self) -> bool {
        match (self.summary.first_publication_date, self.last_publication_date) {
            (Some(first), Some(last)) => last > first,
            _ => false,
        }
    }
}
