//! HTTP client for the Prismic REST API

use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;

use super::document::{ApiInfo, Document, SearchResponse};
use super::predicate::{to_query, Ordering, Predicate};
use super::ContentSource;
use crate::error::{Error, Result};

/// Inbound request state forwarded to the CMS
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestContext {
    /// Preview ref carried by the visitor's preview cookie
    pub preview_ref: Option<String>,
}

impl RequestContext {
    pub fn with_preview_ref(preview_ref: impl Into<String>) -> Self {
        Self {
            preview_ref: Some(preview_ref.into()),
        }
    }
}

/// Connection options for [`create_client`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientOptions {
    pub request_context: Option<RequestContext>,
    pub access_token: Option<String>,
}

impl ClientOptions {
    /// Assemble options, leaving out whatever was not provided
    pub fn new(request_context: Option<RequestContext>, access_token: Option<&str>) -> Self {
        let mut options = Self::default();
        if let Some(ctx) = request_context {
            options.request_context = Some(ctx);
        }
        if let Some(token) = access_token.filter(|t| !t.is_empty()) {
            options.access_token = Some(token.to_string());
        }
        options
    }
}

/// Options for a document search
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    pub page_size: Option<u32>,
    /// Fields to fetch, as `type.field`
    pub fetch: Vec<String>,
    pub orderings: Option<Ordering>,
    /// Content ref to query; falls back to the request preview ref, then master
    pub reference: Option<String>,
}

/// A configured handle to one Prismic repository
#[derive(Debug, Clone)]
pub struct PrismicClient {
    http: reqwest::Client,
    endpoint: String,
    options: ClientOptions,
}

/// Build a fresh client bound to `endpoint`
pub fn create_client(endpoint: &str, options: ClientOptions) -> Result<PrismicClient> {
    Url::parse(endpoint)?;
    let http = reqwest::Client::builder()
        .user_agent(concat!("spacetravelling/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(PrismicClient {
        http,
        endpoint: endpoint.trim_end_matches('/').to_string(),
        options,
    })
}

impl PrismicClient {
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch repository metadata (refs, types, ...)
    pub async fn api(&self) -> Result<ApiInfo> {
        let url = self.url(&self.endpoint, &[])?;
        self.get_json(url).await
    }

    /// The ref of the currently published content
    pub async fn master_ref(&self) -> Result<String> {
        let info = self.api().await?;
        info.master_ref()
            .map(str::to_string)
            .ok_or(Error::NoMasterRef)
    }

    async fn resolve_ref(&self, explicit: Option<&str>) -> Result<String> {
        if let Some(reference) = explicit {
            return Ok(reference.to_string());
        }
        if let Some(reference) = self
            .options
            .request_context
            .as_ref()
            .and_then(|ctx| ctx.preview_ref.as_deref())
        {
            return Ok(reference.to_string());
        }
        self.master_ref().await
    }

    /// Run a predicate query against `/documents/search`
    pub async fn search(
        &self,
        predicates: &[Predicate],
        options: &QueryOptions,
    ) -> Result<SearchResponse> {
        let reference = self.resolve_ref(options.reference.as_deref()).await?;

        let mut params = vec![("ref", reference), ("q", to_query(predicates))];
        if let Some(size) = options.page_size {
            params.push(("pageSize", size.to_string()));
        }
        if !options.fetch.is_empty() {
            params.push(("fetch", options.fetch.join(",")));
        }
        if let Some(ordering) = &options.orderings {
            params.push(("orderings", ordering.to_string()));
        }

        let base = format!("{}/documents/search", self.endpoint);
        let url = self.url(&base, &params)?;
        self.get_json(url).await
    }

    async fn first(&self, predicate: Predicate, reference: Option<&str>) -> Result<Option<Document>> {
        let options = QueryOptions {
            page_size: Some(1),
            reference: reference.map(str::to_string),
            ..QueryOptions::default()
        };
        let resp = self.search(&[predicate], &options).await?;
        Ok(resp.results.into_iter().next())
    }

    /// Parse a pagination cursor, accepting only search URLs of this repository
    fn cursor(&self, cursor: &str) -> Result<Url> {
        let invalid = || Error::InvalidCursor {
            url: cursor.to_string(),
        };
        let url = Url::parse(cursor).map_err(|_| invalid())?;
        let search = Url::parse(&format!("{}/documents/search", self.endpoint))?;
        let same_origin = url.scheme() == search.scheme()
            && url.host_str() == search.host_str()
            && url.port_or_known_default() == search.port_or_known_default();
        if !same_origin || url.path() != search.path() {
            tracing::warn!("Refusing cursor outside {}", search);
            return Err(invalid());
        }
        Ok(url)
    }

    fn url(&self, base: &str, params: &[(&str, String)]) -> Result<Url> {
        let mut url = Url::parse(base)?;
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in params {
                query.append_pair(key, value);
            }
            if let Some(token) = &self.options.access_token {
                query.append_pair("access_token", token);
            }
        }
        // An empty query_pairs_mut still leaves a trailing '?'
        if url.query() == Some("") {
            url.set_query(None);
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        tracing::debug!("GET {}", redact(&url));
        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl ContentSource for PrismicClient {
    async fn query(&self, predicates: &[Predicate], options: &QueryOptions) -> Result<SearchResponse> {
        self.search(predicates, options).await
    }

    async fn get_page(&self, url: &str) -> Result<SearchResponse> {
        // Cursor URLs come back from the CMS with ref and token already embedded
        let url = self.cursor(url)?;
        self.get_json(url).await
    }

    async fn get_by_uid(
        &self,
        doc_type: &str,
        uid: &str,
        reference: Option<&str>,
    ) -> Result<Option<Document>> {
        let path = format!("my.{}.uid", doc_type);
        self.first(Predicate::at(&path, uid), reference).await
    }

    async fn get_by_id(&self, id: &str, reference: Option<&str>) -> Result<Option<Document>> {
        self.first(Predicate::at("document.id", id), reference).await
    }
}

/// Strip the access token before logging a URL
fn redact(url: &Url) -> String {
    let mut shown = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            if k == "access_token" {
                (k.into_owned(), "***".to_string())
            } else {
                (k.into_owned(), v.into_owned())
            }
        })
        .collect();
    if !pairs.is_empty() {
        shown.query_pairs_mut().clear().extend_pairs(pairs);
    }
    shown.to_string()
}
