//! Post listing with "load more" pagination

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::post::{PostSummary, POST_TYPE};
use crate::error::{Error, Result};
use crate::prismic::{ContentSource, Predicate, QueryOptions, SearchResponse, DOCUMENT_TYPE};

/// Fields requested for listing queries
pub const POST_FIELDS: [&str; 5] = ["title", "subtitle", "author", "banner", "content"];

/// Cursor pointing at the next page of a listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginationCursor {
    pub next_page: Option<String>,
}

impl PaginationCursor {
    pub fn is_exhausted(&self) -> bool {
        self.next_page.is_none()
    }
}

/// One page of post summaries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostsPage {
    pub next_page: Option<String>,
    pub results: Vec<PostSummary>,
}

impl PostsPage {
    pub fn cursor(&self) -> PaginationCursor {
        PaginationCursor {
            next_page: self.next_page.clone(),
        }
    }

    /// Slugs of the posts on this page, in order
    pub fn uids(&self) -> Vec<String> {
        self.results.iter().map(|p| p.uid.clone()).collect()
    }

    fn from_response(resp: SearchResponse) -> Result<Self> {
        let results = resp
            .results
            .iter()
            .map(PostSummary::from_document)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            next_page: resp.next_page,
            results,
        })
    }
}

/// Everything the home page renders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomePage {
    pub pagination: PostsPage,
    pub preview: bool,
}

fn listing_options(page_size: u32, preview_ref: Option<&str>) -> QueryOptions {
    QueryOptions {
        page_size: Some(page_size),
        fetch: POST_FIELDS
            .iter()
            .map(|field| format!("{}.{}", POST_TYPE, field))
            .collect(),
        orderings: None,
        reference: preview_ref.map(str::to_string),
    }
}

/// Fetch the first page of posts, newest first
pub async fn fetch_posts(
    source: &dyn ContentSource,
    page_size: u32,
    preview_ref: Option<&str>,
) -> Result<PostsPage> {
    let resp = source
        .query(
            &[Predicate::at(DOCUMENT_TYPE, POST_TYPE)],
            &listing_options(page_size, preview_ref),
        )
        .await?;
    let page = PostsPage::from_response(resp)?;
    tracing::debug!(
        "Fetched {} posts (more: {})",
        page.results.len(),
        page.next_page.is_some()
    );
    Ok(page)
}

/// Fetch the page a cursor points at
pub async fn load_more(source: &dyn ContentSource, next_page: &str) -> Result<PostsPage> {
    let resp = source.get_page(next_page).await?;
    PostsPage::from_response(resp)
}

/// Uids of the posts worth rendering ahead of time; the rest render on demand
pub async fn static_paths(source: &dyn ContentSource, page_size: u32) -> Result<Vec<String>> {
    Ok(fetch_posts(source, page_size, None).await?.uids())
}

/// Posts accumulated across "load more" requests
#[derive(Debug, Clone)]
pub struct PostListing {
    posts: Vec<PostSummary>,
    seen: HashSet<String>,
    next_page: Option<String>,
}

impl PostListing {
    /// Start a listing from its first page
    pub fn new(first: PostsPage) -> Result<Self> {
        let mut listing = Self {
            posts: Vec::new(),
            seen: HashSet::new(),
            next_page: None,
        };
        listing.append(first)?;
        Ok(listing)
    }

    pub fn posts(&self) -> &[PostSummary] {
        &self.posts
    }

    pub fn next_page(&self) -> Option<&str> {
        self.next_page.as_deref()
    }

    /// Whether "load more" should be offered
    pub fn has_more(&self) -> bool {
        self.next_page.is_some()
    }

    /// Append a page; a page repeating an already listed uid is rejected whole
    pub fn append(&mut self, page: PostsPage) -> Result<()> {
        let mut incoming = HashSet::new();
        for post in &page.results {
            if self.seen.contains(&post.uid) || !incoming.insert(post.uid.as_str()) {
                return Err(Error::DuplicatePost {
                    uid: post.uid.clone(),
                });
            }
        }

        self.next_page = page.next_page;
        for post in page.results {
            self.seen.insert(post.uid.clone());
            self.posts.push(post);
        }
        Ok(())
    }

    /// Fetch and append the next page; returns `false` once the listing is exhausted
    pub async fn load_more(&mut self, source: &dyn ContentSource) -> Result<bool> {
        let Some(next) = self.next_page.clone() else {
            return Ok(false);
        };
        let page = load_more(source, &next).await?;
        self.append(page)?;
        Ok(true)
    }

    pub fn into_page(self) -> PostsPage {
        PostsPage {
            next_page: self.next_page,
            results: self.posts,
        }
    }
}
