//! API middleware and shared error type
//!
//! All mutating routes sit behind the admin guard: a signed session token
//! carrying the admin role and a UUID subject. Anything less is 401 and the
//! handler never runs.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::services::{
    ArticleService, ArticleServiceError, CommentService, CommentServiceError, DraftService,
    DraftServiceError, SettingsService, StatsService, SubscriptionService,
    SubscriptionServiceError, TagService, TagServiceError, TaxonomyService, UploadService,
    UploadServiceError,
};
use crate::session::SessionKeyring;
use crate::supabase::Supabase;

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub article_service: Arc<ArticleService>,
    pub draft_service: Arc<DraftService>,
    pub comment_service: Arc<CommentService>,
    pub taxonomy_service: Arc<TaxonomyService>,
    pub tag_service: Arc<TagService>,
    pub settings_service: Arc<SettingsService>,
    pub stats_service: Arc<StatsService>,
    pub subscription_service: Arc<SubscriptionService>,
    pub upload_service: Arc<UploadService>,
    pub keyring: Arc<SessionKeyring>,
    /// Anon-tier client used only by the health probe
    pub probe: Supabase,
}

/// Admin identity extracted from a verified session token
#[derive(Debug, Clone, Copy)]
pub struct AdminSession {
    /// Backend user UUID from the token subject
    pub subject: Uuid,
}

/// Error response body for API errors
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
            },
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new("UNAUTHORIZED", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message)
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new("CONFLICT", message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.error.code.as_str() {
            "UNAUTHORIZED" => StatusCode::UNAUTHORIZED,
            "FORBIDDEN" => StatusCode::FORBIDDEN,
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            "VALIDATION_ERROR" => StatusCode::BAD_REQUEST,
            "CONFLICT" => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

impl From<ArticleServiceError> for ApiError {
    fn from(err: ArticleServiceError) -> Self {
        match err {
            ArticleServiceError::NotFound(msg) => ApiError::not_found(msg),
            ArticleServiceError::ValidationError(msg) => ApiError::validation_error(msg),
            ArticleServiceError::DuplicateSlug(slug) => {
                ApiError::conflict(format!("Article slug already exists: {slug}"))
            }
            ArticleServiceError::InternalError(err) => internal(err),
        }
    }
}

impl From<DraftServiceError> for ApiError {
    fn from(err: DraftServiceError) -> Self {
        match err {
            DraftServiceError::NotFound(id) => ApiError::not_found(format!("Draft not found: {id}")),
            DraftServiceError::InternalError(err) => internal(err),
        }
    }
}

impl From<CommentServiceError> for ApiError {
    fn from(err: CommentServiceError) -> Self {
        match err {
            CommentServiceError::ValidationError(msg) => ApiError::validation_error(msg),
            CommentServiceError::InternalError(err) => internal(err),
        }
    }
}

impl From<TagServiceError> for ApiError {
    fn from(err: TagServiceError) -> Self {
        match err {
            TagServiceError::ValidationError(msg) => ApiError::validation_error(msg),
            TagServiceError::InternalError(err) => internal(err),
        }
    }
}

impl From<SubscriptionServiceError> for ApiError {
    fn from(err: SubscriptionServiceError) -> Self {
        match err {
            SubscriptionServiceError::ValidationError(msg) => ApiError::validation_error(msg),
            SubscriptionServiceError::InternalError(err) => internal(err),
        }
    }
}

impl From<UploadServiceError> for ApiError {
    fn from(err: UploadServiceError) -> Self {
        match err {
            UploadServiceError::UnsupportedType(_) | UploadServiceError::TooLarge { .. } => {
                ApiError::validation_error(err.to_string())
            }
            UploadServiceError::InternalError(err) => internal(err),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        internal(err)
    }
}

/// Backend failures surface the error text to the caller; the blog is a
/// single-operator tool and the message is what makes failures debuggable.
fn internal(err: anyhow::Error) -> ApiError {
    tracing::error!(error = ?err, "internal error");
    ApiError::internal_error(err.to_string())
}

/// Extract session token from the Authorization header or session cookie
fn extract_session_token(request: &Request) -> Option<String> {
    if let Some(auth_header) = request.headers().get(header::AUTHORIZATION) {
        if let Ok(auth_str) = auth_header.to_str() {
            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                return Some(token.to_string());
            }
        }
    }

    if let Some(cookie_header) = request.headers().get(header::COOKIE) {
        if let Ok(cookie_str) = cookie_header.to_str() {
            for cookie in cookie_str.split(';') {
                let cookie = cookie.trim();
                if let Some(token) = cookie.strip_prefix("session=") {
                    return Some(token.to_string());
                }
            }
        }
    }

    None
}

/// Admin authentication middleware.
///
/// Everything short of a valid admin token is the same 401: missing token,
/// bad signature, expired session, wrong role, or a subject that is not a
/// UUID. The response does not say which check failed.
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_session_token(&request)
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    let claims = state
        .keyring
        .verify(&token)
        .map_err(|_| ApiError::unauthorized("Invalid or expired session"))?;

    if claims.role != "admin" {
        return Err(ApiError::unauthorized("Invalid or expired session"));
    }
    let subject = Uuid::parse_str(&claims.sub)
        .map_err(|_| ApiError::unauthorized("Invalid or expired session"))?;

    request.extensions_mut().insert(AdminSession { subject });
    Ok(next.run(request).await)
}
