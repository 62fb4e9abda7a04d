//! Data models
//!
//! Plain serde records mirroring the remote backend's tables, plus the input
//! types the services accept. The backend owns the schema; these types only
//! describe the rows this application reads and writes.

pub mod article;
pub mod comment;
pub mod draft;
pub mod settings;
pub mod stats;
pub mod subscription;
pub mod taxonomy;
pub mod upload;

pub use article::{
    Article, ArticleChanges, ArticleFilter, ArticleWithMeta, ListParams, NewArticle, PagedResult,
};
pub use comment::{Comment, NewComment};
pub use draft::{Draft, DraftChanges, NewDraft};
pub use settings::BlogSetting;
pub use stats::{DashboardSummary, VisitStatistic};
pub use subscription::{NewSubscription, Subscription, SubscriptionPlan};
pub use taxonomy::{Category, NewTag, Tag};
pub use upload::UploadRecord;
