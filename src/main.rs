//! Folio - a magazine publishing API over a Supabase-style backend

use anyhow::Result;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio::{
    api::{self, AppState},
    config::Config,
    repositories::{
        PostgrestArticleRepository, PostgrestCategoryRepository, PostgrestCommentRepository,
        PostgrestDraftRepository, PostgrestSettingsRepository, PostgrestStatsRepository,
        PostgrestSubscriptionRepository, PostgrestTagRepository, PostgrestUploadRepository,
    },
    services::{
        ArticleService, CommentService, DraftService, SettingsService, StatsService,
        SubscriptionService, TagService, TaxonomyService, UploadService,
    },
    session::SessionKeyring,
    supabase::{StorageClient, Supabase},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "folio=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Folio publishing API...");

    // Load configuration; missing credentials abort startup
    let config = Config::from_env()?;
    tracing::info!(backend = %config.backend.url, "Configuration loaded");

    // Two backend clients: anon for public reads, service-role for
    // everything the admin surface writes.
    let anon = Supabase::new(&config.backend.url, &config.backend.anon_key);
    let service_role = Supabase::new(&config.backend.url, &config.backend.service_role_key);
    let storage = StorageClient::new(service_role.clone(), &config.backend.storage_bucket);

    // Repositories
    let article_repo = PostgrestArticleRepository::boxed(service_role.clone());
    let category_repo = PostgrestCategoryRepository::boxed(anon.clone());
    let tag_repo = PostgrestTagRepository::boxed(service_role.clone());
    let comment_repo = PostgrestCommentRepository::boxed(service_role.clone());
    let draft_repo = PostgrestDraftRepository::boxed(service_role.clone());
    let settings_repo = PostgrestSettingsRepository::boxed(anon.clone());
    let stats_repo = PostgrestStatsRepository::boxed(service_role.clone());
    let subscription_repo = PostgrestSubscriptionRepository::boxed(service_role.clone());
    let upload_repo = PostgrestUploadRepository::boxed(service_role.clone());

    // Services
    let article_service = Arc::new(ArticleService::new(article_repo.clone(), tag_repo.clone()));
    let draft_service = Arc::new(DraftService::new(draft_repo));
    let comment_service = Arc::new(CommentService::new(comment_repo.clone()));
    let taxonomy_service = Arc::new(TaxonomyService::new(category_repo.clone()));
    let tag_service = Arc::new(TagService::new(tag_repo.clone()));
    let settings_service = Arc::new(SettingsService::new(settings_repo));
    let stats_service = Arc::new(StatsService::new(
        stats_repo,
        article_repo,
        category_repo,
        tag_repo,
        comment_repo,
    ));
    let subscription_service = Arc::new(SubscriptionService::new(subscription_repo));
    let upload_service = Arc::new(UploadService::new(
        config.upload.clone(),
        Arc::new(storage),
        upload_repo,
    ));

    let state = AppState {
        article_service,
        draft_service,
        comment_service,
        taxonomy_service,
        tag_service,
        settings_service,
        stats_service,
        subscription_service,
        upload_service,
        keyring: Arc::new(SessionKeyring::new(&config.session.secret)),
        probe: anon,
    };

    // Build router
    let app = api::build_router(state, &config.server.cors_origin);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
