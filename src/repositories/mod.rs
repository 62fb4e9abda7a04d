//! Backend repositories
//!
//! Repository pattern over the remote PostgREST API. Each repository handles
//! CRUD for one entity; services depend only on the traits so tests can swap
//! in in-memory implementations.

pub mod article;
pub mod comment;
pub mod draft;
pub mod settings;
pub mod stats;
pub mod subscription;
pub mod taxonomy;
pub mod upload;

pub use article::{ArticleRepository, PostgrestArticleRepository};
pub use comment::{CommentRepository, PostgrestCommentRepository};
pub use draft::{DraftRepository, PostgrestDraftRepository};
pub use settings::{PostgrestSettingsRepository, SettingsRepository};
pub use stats::{PostgrestStatsRepository, StatsRepository};
pub use subscription::{PostgrestSubscriptionRepository, SubscriptionRepository};
pub use taxonomy::{
    CategoryRepository, PostgrestCategoryRepository, PostgrestTagRepository, TagRepository,
};
pub use upload::{PostgrestUploadRepository, UploadRepository};
