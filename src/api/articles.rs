//! Article API endpoints
//!
//! Public listing and detail, plus the admin CRUD surface. Admin update and
//! delete address the article by id carried in the body or query string, so
//! the public slug route keeps its path segment to itself.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use crate::api::middleware::{AdminSession, ApiError, AppState};
use crate::models::{ArticleWithMeta, ListParams, PagedResult};
use crate::services::{CreateArticleInput, PublicListQuery, UpdateArticleInput};

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    20
}

/// Admin list pagination
#[derive(Debug, Deserialize)]
pub struct AdminListQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

/// Admin update payload: the target id rides in the body
#[derive(Debug, Deserialize)]
pub struct UpdateArticleBody {
    pub id: i64,
    #[serde(flatten)]
    pub changes: UpdateArticleInput,
}

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: i64,
}

/// GET /articles - public list, published only
pub async fn list_articles(
    State(state): State<AppState>,
    Query(query): Query<PublicListQuery>,
) -> Result<Json<PagedResult<ArticleWithMeta>>, ApiError> {
    let page = state.article_service.list_public(&query).await?;
    Ok(Json(page))
}

/// GET /articles/{slug} - public article detail
pub async fn get_article(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ArticleWithMeta>, ApiError> {
    let article = state.article_service.get_published(&slug).await?;
    Ok(Json(article))
}

/// GET /admin/articles - full list including drafts
pub async fn list_articles_admin(
    State(state): State<AppState>,
    Query(query): Query<AdminListQuery>,
) -> Result<Json<PagedResult<ArticleWithMeta>>, ApiError> {
    let params = ListParams::new(query.page, query.per_page);
    let page = state.article_service.list_admin(&params).await?;
    Ok(Json(page))
}

/// POST /articles - create (admin)
pub async fn create_article(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Json(input): Json<CreateArticleInput>,
) -> Result<(StatusCode, Json<ArticleWithMeta>), ApiError> {
    let article = state.article_service.create(input, session.subject).await?;
    Ok((StatusCode::CREATED, Json(article)))
}

/// PUT /articles - update by body id (admin)
pub async fn update_article(
    State(state): State<AppState>,
    Json(body): Json<UpdateArticleBody>,
) -> Result<Json<ArticleWithMeta>, ApiError> {
    let article = state
        .article_service
        .update(body.id, body.changes)
        .await?;
    Ok(Json(article))
}

/// DELETE /articles?id= - delete (admin)
pub async fn delete_article(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<StatusCode, ApiError> {
    state.article_service.delete(query.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
