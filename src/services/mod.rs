//! Services layer - business logic
//!
//! Services sit between the HTTP handlers and the backend repositories.
//! They own validation, the slug collision policy, tag synchronization,
//! and the dashboard aggregation.

pub mod article;
pub mod comment;
pub mod draft;
pub mod settings;
pub mod stats;
pub mod subscription;
pub mod taxonomy;
pub mod upload;

pub use article::{
    ArticleService, ArticleServiceError, CreateArticleInput, PublicListQuery, UpdateArticleInput,
};
pub use comment::{CommentService, CommentServiceError, CreateCommentInput};
pub use draft::{DraftService, DraftServiceError, SaveDraftInput, UpdateDraftInput};
pub use settings::SettingsService;
pub use stats::{RecordVisitInput, StatsService};
pub use subscription::{CreateSubscriptionInput, SubscriptionService, SubscriptionServiceError};
pub use taxonomy::{CreateTagInput, TagService, TagServiceError, TaxonomyService};
pub use upload::{UploadService, UploadServiceError, UploadedFile};
