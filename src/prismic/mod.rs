//! Prismic CMS access
//!
//! [`ContentSource`] is the seam between the page assemblers and the CMS:
//! [`PrismicClient`] talks to a live repository over HTTPS, while tests use
//! an in-memory source.

mod client;
mod document;
#[cfg(test)]
pub(crate) mod memory;
mod predicate;

use async_trait::async_trait;

pub use client::{create_client, ClientOptions, PrismicClient, QueryOptions, RequestContext};
pub use document::{ApiInfo, ApiRef, Document, SearchResponse};
pub use predicate::{to_query, Ordering, Predicate};

use crate::error::Result;

/// Field paths used in predicates and orderings
pub const DOCUMENT_TYPE: &str = "document.type";
pub const FIRST_PUBLICATION_DATE: &str = "document.first_publication_date";

/// Read access to CMS documents
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Run a predicate query and return the first page of results
    async fn query(&self, predicates: &[Predicate], options: &QueryOptions) -> Result<SearchResponse>;

    /// Fetch a results page from a `next_page` cursor
    async fn get_page(&self, url: &str) -> Result<SearchResponse>;

    /// Look up a single document by type and uid
    async fn get_by_uid(
        &self,
        doc_type: &str,
        uid: &str,
        reference: Option<&str>,
    ) -> Result<Option<Document>>;

    /// Look up a single document by id
    async fn get_by_id(&self, id: &str, reference: Option<&str>) -> Result<Option<Document>>;
}
