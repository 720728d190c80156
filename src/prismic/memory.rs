//! In-memory content source for tests

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::Arc;

use super::{ContentSource, Document, Ordering, Predicate, QueryOptions, SearchResponse};
use crate::error::{Error, Result};

const MASTER_REF: &str = "master";
const DEFAULT_PAGE_SIZE: u32 = 20;

/// Serves documents from memory, mimicking the CMS query semantics this crate relies on
#[derive(Clone, Default)]
pub struct MemorySource {
    published: Vec<Document>,
    drafts: HashMap<String, Vec<Document>>,
    fail_date_queries: bool,
    requests: Arc<AtomicUsize>,
}

impl MemorySource {
    pub fn new(published: Vec<Document>) -> Self {
        Self {
            published,
            ..Self::default()
        }
    }

    /// Make `doc` visible under the preview ref `reference`
    pub fn with_draft(mut self, reference: &str, doc: Document) -> Self {
        self.drafts.entry(reference.to_string()).or_default().push(doc);
        self
    }

    /// Fail every date-range query with an upstream error
    pub fn failing_date_queries(mut self) -> Self {
        self.fail_date_queries = true;
        self
    }

    pub fn requests(&self) -> usize {
        self.requests.load(AtomicOrdering::SeqCst)
    }

    fn documents(&self, reference: Option<&str>) -> Result<Vec<Document>> {
        self.requests.fetch_add(1, AtomicOrdering::SeqCst);
        match reference {
            None | Some(MASTER_REF) => Ok(self.published.clone()),
            Some(r) => {
                let drafts = self.drafts.get(r).ok_or_else(|| Error::Status {
                    status: 404,
                    body: format!("Ref not found: {}", r),
                })?;
                let mut docs = self.published.clone();
                for draft in drafts {
                    match docs.iter_mut().find(|d| d.id == draft.id) {
                        Some(existing) => *existing = draft.clone(),
                        None => docs.push(draft.clone()),
                    }
                }
                Ok(docs)
            }
        }
    }

    fn page(
        &self,
        mut docs: Vec<Document>,
        ordering: Option<&Ordering>,
        page: u32,
        page_size: u32,
        doc_type: Option<&str>,
        reference: Option<&str>,
    ) -> SearchResponse {
        match ordering {
            Some(o) if !o.descending => {
                docs.sort_by(|a, b| a.first_publication_date.cmp(&b.first_publication_date))
            }
            _ => docs.sort_by(|a, b| b.first_publication_date.cmp(&a.first_publication_date)),
        }

        let total = docs.len() as u32;
        let total_pages = total.div_ceil(page_size).max(1);
        let start = ((page - 1) * page_size) as usize;
        let results: Vec<Document> = docs
            .into_iter()
            .skip(start)
            .take(page_size as usize)
            .collect();

        let next_page = (page < total_pages).then(|| {
            format!(
                "memory://search?type={}&page={}&pageSize={}&ref={}",
                doc_type.unwrap_or_default(),
                page + 1,
                page_size,
                reference.unwrap_or(MASTER_REF)
            )
        });

        SearchResponse {
            page,
            results_per_page: page_size,
            total_results_size: total,
            total_pages,
            next_page,
            prev_page: None,
            results,
        }
    }
}

fn matches(doc: &Document, predicate: &Predicate) -> bool {
    match predicate {
        Predicate::At { path, value } => match path.as_str() {
            "document.type" => &doc.doc_type == value,
            "document.id" => &doc.id == value,
            p if p.starts_with("my.") && p.ends_with(".uid") => {
                let doc_type = &p[3..p.len() - 4];
                doc.doc_type == doc_type && doc.uid.as_deref() == Some(value.as_str())
            }
            _ => false,
        },
        Predicate::DateAfter { date, .. } => doc.first_publication_date.is_some_and(|d| d > *date),
        Predicate::DateBefore { date, .. } => doc.first_publication_date.is_some_and(|d| d < *date),
    }
}

fn type_of(predicates: &[Predicate]) -> Option<&str> {
    predicates.iter().find_map(|p| match p {
        Predicate::At { path, value } if path == "document.type" => Some(value.as_str()),
        _ => None,
    })
}

#[async_trait]
impl ContentSource for MemorySource {
    async fn query(&self, predicates: &[Predicate], options: &QueryOptions) -> Result<SearchResponse> {
        let is_date_query = predicates
            .iter()
            .any(|p| matches!(p, Predicate::DateAfter { .. } | Predicate::DateBefore { .. }));
        if self.fail_date_queries && is_date_query {
            return Err(Error::Status {
                status: 503,
                body: "Service Unavailable".to_string(),
            });
        }

        let reference = options.reference.as_deref();
        let docs: Vec<Document> = self
            .documents(reference)?
            .into_iter()
            .filter(|d| predicates.iter().all(|p| matches(d, p)))
            .collect();
        Ok(self.page(
            docs,
            options.orderings.as_ref(),
            1,
            options.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            type_of(predicates),
            reference,
        ))
    }

    async fn get_page(&self, url: &str) -> Result<SearchResponse> {
        let url = url::Url::parse(url)?;
        let params: HashMap<String, String> = url.query_pairs().into_owned().collect();
        let doc_type = params.get("type").cloned().unwrap_or_default();
        let page = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
        let page_size = params
            .get("pageSize")
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PAGE_SIZE);
        let reference = params.get("ref").map(String::as_str);

        let docs: Vec<Document> = self
            .documents(reference)?
            .into_iter()
            .filter(|d| doc_type.is_empty() || d.doc_type == doc_type)
            .collect();
        Ok(self.page(docs, None, page, page_size, Some(doc_type.as_str()), reference))
    }

    async fn get_by_uid(
        &self,
        doc_type: &str,
        uid: &str,
        reference: Option<&str>,
    ) -> Result<Option<Document>> {
        Ok(self
            .documents(reference)?
            .into_iter()
            .find(|d| d.doc_type == doc_type && d.uid.as_deref() == Some(uid)))
    }

    async fn get_by_id(&self, id: &str, reference: Option<&str>) -> Result<Option<Document>> {
        Ok(self.documents(reference)?.into_iter().find(|d| d.id == id))
    }
}

/// Midnight UTC on the given day
pub fn day(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

/// A `posts` document with one content block holding `words` words
pub fn post(uid: &str, date: DateTime<Utc>, words: usize) -> Document {
    let text = vec!["palavra"; words].join(" ");
    Document {
        id: format!("id-{}", uid),
        uid: Some(uid.to_string()),
        doc_type: "posts".to_string(),
        first_publication_date: Some(date),
        last_publication_date: Some(date),
        data: json!({
            "title": format!("Title of {}", uid),
            "subtitle": format!("Subtitle of {}", uid),
            "author": "Felipe",
            "banner": {"url": format!("https://images.prismic.io/{}.png", uid)},
            "content": [
                {
                    "heading": "Introduction",
                    "body": [{"type": "paragraph", "text": text, "spans": []}]
                }
            ]
        }),
    }
}

/// The three posts of January, February and March 2021
pub fn three_posts() -> MemorySource {
    MemorySource::new(vec![
        post("post1", day(2021, 1, 1), 10),
        post("post2", day(2021, 2, 1), 200),
        post("post3", day(2021, 3, 1), 401),
    ])
}
