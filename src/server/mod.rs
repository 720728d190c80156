//! HTTP service: preview endpoints and page data

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::SiteConfig;
use crate::content::{self, HomePage, PostPage, PostsPage};
use crate::error::Error;
use crate::preview::{self, PreviewOutcome, PreviewSession};
use crate::prismic::{create_client, ClientOptions, ContentSource, RequestContext};
use crate::Spacetravelling;

/// Builds a CMS handle for one request
pub type Connector =
    Arc<dyn Fn(Option<RequestContext>) -> crate::error::Result<Box<dyn ContentSource>> + Send + Sync>;

/// Server state
pub struct AppState {
    config: SiteConfig,
    connect: Connector,
}

impl AppState {
    pub fn new(config: SiteConfig, connect: Connector) -> Self {
        Self { config, connect }
    }

    /// State connecting to the Prismic repository named in `config`
    pub fn prismic(config: SiteConfig) -> crate::error::Result<Self> {
        let endpoint = config.endpoint()?.to_string();
        let token = config.access_token.clone();
        let connect: Connector = Arc::new(move |ctx| {
            let options = ClientOptions::new(ctx, token.as_deref());
            let client = create_client(&endpoint, options)?;
            Ok(Box::new(client) as Box<dyn ContentSource>)
        });
        Ok(Self::new(config, connect))
    }

    fn session(&self, headers: &HeaderMap) -> Option<PreviewSession> {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(|value| PreviewSession::from_cookie_header(value, &self.config.preview_cookie))
    }

    fn source(
        &self,
        session: Option<&PreviewSession>,
    ) -> crate::error::Result<Box<dyn ContentSource>> {
        let ctx = session.map(|s| RequestContext::with_preview_ref(s.reference.clone()));
        (self.connect)(ctx)
    }
}

/// Error response with a JSON `message`
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            Error::NotFound { .. } => (StatusCode::NOT_FOUND, "Post not found".to_string()),
            Error::InvalidPreviewToken => (StatusCode::UNAUTHORIZED, self.0.to_string()),
            Error::InvalidCursor { .. } => {
                tracing::warn!("{}", self.0);
                (StatusCode::BAD_REQUEST, "Invalid cursor".to_string())
            }
            other => {
                tracing::error!("Request failed: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        (status, Json(json!({ "message": message }))).into_response()
    }
}

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/preview", get(preview_handler))
        .route("/api/exit-preview", get(exit_preview_handler))
        .route("/api/posts", get(posts_handler))
        .route("/api/posts/more", get(more_posts_handler))
        .route("/api/post/:slug", get(post_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn start(app: &Spacetravelling, ip: &str, port: u16) -> Result<()> {
    let state = Arc::new(AppState::prismic(app.config.clone())?);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}

#[derive(Debug, Deserialize)]
struct PreviewParams {
    token: Option<String>,
    #[serde(rename = "documentId")]
    document_id: Option<String>,
}

async fn preview_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PreviewParams>,
) -> Result<Response, ApiError> {
    let token = params.token.unwrap_or_default();
    let document_id = params.document_id.unwrap_or_default();

    let source = state.source(None)?;
    let outcome = preview::resolve_preview(source.as_ref(), &token, &document_id).await?;
    let (location, session) = match outcome {
        PreviewOutcome::Redirect { location, session } => (location, session),
        PreviewOutcome::Rejected => return Err(Error::InvalidPreviewToken.into()),
    };

    Ok((
        StatusCode::FOUND,
        [
            (header::LOCATION, location),
            (
                header::SET_COOKIE,
                session.to_cookie(&state.config.preview_cookie, state.config.secure_cookie),
            ),
        ],
    )
        .into_response())
}

async fn exit_preview_handler(State(state): State<Arc<AppState>>) -> Response {
    (
        StatusCode::FOUND,
        [
            (header::LOCATION, "/".to_string()),
            (
                header::SET_COOKIE,
                preview::clear_cookie(&state.config.preview_cookie, state.config.secure_cookie),
            ),
        ],
    )
        .into_response()
}

async fn posts_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<HomePage>, ApiError> {
    let session = state.session(&headers);
    let source = state.source(session.as_ref())?;
    let preview_ref = session.as_ref().map(|s| s.reference.as_str());

    let pagination =
        content::fetch_posts(source.as_ref(), state.config.page_size, preview_ref).await?;
    Ok(Json(HomePage {
        pagination,
        preview: session.is_some(),
    }))
}

#[derive(Debug, Deserialize)]
struct MoreParams {
    cursor: String,
}

async fn more_posts_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<MoreParams>,
) -> Result<Json<PostsPage>, ApiError> {
    let session = state.session(&headers);
    let source = state.source(session.as_ref())?;
    let page = content::load_more(source.as_ref(), &params.cursor).await?;
    Ok(Json(page))
}

async fn post_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(slug): Path<String>,
) -> Result<Json<PostPage>, ApiError> {
    let session = state.session(&headers);
    let source = state.source(session.as_ref())?;
    let preview_ref = session.as_ref().map(|s| s.reference.as_str());

    let page = content::build_post_page(
        source.as_ref(),
        &slug,
        preview_ref,
        state.config.words_per_minute,
    )
    .await?;
    Ok(Json(page))
}
