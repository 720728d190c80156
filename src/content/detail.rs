//! Single post pages: lookup, reading time and previous/next navigation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::post::{ContentBlock, PostDetail, POST_TYPE};
use crate::error::{Error, Result};
use crate::prismic::{
    ContentSource, Document, Ordering, Predicate, QueryOptions, DOCUMENT_TYPE,
    FIRST_PUBLICATION_DATE,
};

/// Average reading speed
pub const WORDS_PER_MINUTE: usize = 200;

/// Link to a neighbouring post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjacentPostRef {
    pub uid: String,
    pub title: String,
}

/// The posts published right before and right after another one
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdjacentPosts {
    pub previous: Option<AdjacentPostRef>,
    pub next: Option<AdjacentPostRef>,
}

/// Everything a post page renders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostPage {
    pub post: PostDetail,
    /// Estimated minutes; may be 0 for very short posts
    pub reading_time: u32,
    pub adjacent: AdjacentPosts,
    pub preview: bool,
}

/// Fetch a post by its uid
pub async fn fetch_post(
    source: &dyn ContentSource,
    slug: &str,
    preview_ref: Option<&str>,
) -> Result<PostDetail> {
    let doc = source
        .get_by_uid(POST_TYPE, slug, preview_ref)
        .await?
        .ok_or_else(|| Error::NotFound {
            uid: slug.to_string(),
        })?;
    PostDetail::from_document(&doc)
}

/// Number of whitespace-separated words across every paragraph
pub fn count_words(content: &[ContentBlock]) -> usize {
    content
        .iter()
        .flat_map(|block| block.body.iter())
        .map(|paragraph| paragraph.text.split_whitespace().count())
        .sum()
}

/// Whole minutes needed to read `content`, rounded down
pub fn reading_time(content: &[ContentBlock], words_per_minute: usize) -> u32 {
    let words_per_minute = words_per_minute.max(1);
    (count_words(content) / words_per_minute) as u32
}

fn adjacent_ref(doc: Document) -> Option<AdjacentPostRef> {
    let title = doc
        .data
        .get("title")
        .and_then(|t| t.as_str())
        .unwrap_or_default()
        .to_string();
    doc.uid.map(|uid| AdjacentPostRef { uid, title })
}

async fn first_match(
    source: &dyn ContentSource,
    predicate: Predicate,
    ordering: Ordering,
    preview_ref: Option<&str>,
) -> Result<Option<AdjacentPostRef>> {
    let options = QueryOptions {
        page_size: Some(1),
        fetch: vec![format!("{}.title", POST_TYPE)],
        orderings: Some(ordering),
        reference: preview_ref.map(str::to_string),
    };
    let resp = source
        .query(&[Predicate::at(DOCUMENT_TYPE, POST_TYPE), predicate], &options)
        .await?;
    Ok(resp.results.into_iter().next().and_then(adjacent_ref))
}

/// Find the posts published immediately before and after `current`
///
/// Both lookups run concurrently. A failed lookup is an error, never a
/// silent "no such post".
pub async fn resolve_adjacent(
    source: &dyn ContentSource,
    current: DateTime<Utc>,
    preview_ref: Option<&str>,
) -> Result<AdjacentPosts> {
    let next = first_match(
        source,
        Predicate::date_after(FIRST_PUBLICATION_DATE, current),
        Ordering::asc(FIRST_PUBLICATION_DATE),
        preview_ref,
    );
    let previous = first_match(
        source,
        Predicate::date_before(FIRST_PUBLICATION_DATE, current),
        Ordering::desc(FIRST_PUBLICATION_DATE),
        preview_ref,
    );
    let (previous, next) = tokio::try_join!(previous, next)?;
    Ok(AdjacentPosts { previous, next })
}

/// Assemble the data behind a post page
pub async fn build_post_page(
    source: &dyn ContentSource,
    slug: &str,
    preview_ref: Option<&str>,
    words_per_minute: usize,
) -> Result<PostPage> {
    let post = fetch_post(source, slug, preview_ref).await?;
    let reading_time = reading_time(&post.content, words_per_minute);
    let adjacent = match post.summary.first_publication_date {
        Some(date) => resolve_adjacent(source, date, preview_ref).await?,
        // Unpublished drafts have no place in the timeline yet
        None => AdjacentPosts::default(),
    };

    Ok(PostPage {
        post,
        reading_time,
        adjacent,
        preview: preview_ref.is_some(),
    })
}
