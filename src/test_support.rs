//! In-memory test doubles for the repository traits and object store.
//!
//! Behavior mirrors the backend semantics the services rely on: filters
//! narrow before the page window, inserts assign ids, approved-only comment
//! listing, join-table tag sync.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::api::middleware::AppState;
use crate::config::UploadConfig;
use crate::models::{
    Article, ArticleChanges, ArticleFilter, BlogSetting, Category, Comment, Draft, DraftChanges,
    NewArticle, NewComment, NewDraft, NewSubscription, NewTag, Subscription, Tag, UploadRecord,
    VisitStatistic,
};
use crate::repositories::{
    ArticleRepository, CategoryRepository, CommentRepository, DraftRepository, SettingsRepository,
    StatsRepository, SubscriptionRepository, TagRepository, UploadRepository,
};
use crate::services::{
    ArticleService, CommentService, DraftService, SettingsService, StatsService,
    SubscriptionService, TagService, TaxonomyService, UploadService,
};
use crate::session::SessionKeyring;
use crate::supabase::{ObjectStore, Supabase, SupabaseError};

#[derive(Default)]
pub struct InMemoryArticleRepo {
    rows: Mutex<Vec<Article>>,
    next_id: Mutex<i64>,
}

impl InMemoryArticleRepo {
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    fn matches(article: &Article, filter: &ArticleFilter) -> bool {
        if filter.published_only && !article.published {
            return false;
        }
        if let Some(category_id) = filter.category_id {
            if article.category_id != Some(category_id) {
                return false;
            }
        }
        if let Some(ref search) = filter.search {
            let needle = search.to_lowercase();
            if !article.title.to_lowercase().contains(&needle)
                && !article.content.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        if let Some(ref ids) = filter.id_set {
            if !ids.contains(&article.id) {
                return false;
            }
        }
        true
    }
}

#[async_trait]
impl ArticleRepository for InMemoryArticleRepo {
    async fn insert(&self, row: &NewArticle) -> Result<Article> {
        let mut rows = self.rows.lock().unwrap();
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        let article = Article {
            id: *next_id,
            title: row.title.clone(),
            slug: row.slug.clone(),
            content: row.content.clone(),
            excerpt: row.excerpt.clone(),
            featured_image: row.featured_image.clone(),
            category_id: Some(row.category_id),
            author_id: Some(row.author_id),
            published: row.published,
            published_at: row.published_at,
            created_at: row.created_at,
            updated_at: Some(row.updated_at),
        };
        rows.push(article.clone());
        Ok(article)
    }

    async fn update(&self, id: i64, changes: &ArticleChanges) -> Result<Article> {
        let mut rows = self.rows.lock().unwrap();
        let article = rows
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| anyhow::anyhow!("update matched no rows"))?;
        if let Some(ref title) = changes.title {
            article.title = title.clone();
        }
        if let Some(ref slug) = changes.slug {
            article.slug = slug.clone();
        }
        if let Some(ref content) = changes.content {
            article.content = content.clone();
        }
        if let Some(ref excerpt) = changes.excerpt {
            article.excerpt = Some(excerpt.clone());
        }
        if let Some(ref featured_image) = changes.featured_image {
            article.featured_image = Some(featured_image.clone());
        }
        if let Some(category_id) = changes.category_id {
            article.category_id = Some(category_id);
        }
        if let Some(published) = changes.published {
            article.published = published;
        }
        if let Some(published_at) = changes.published_at {
            article.published_at = Some(published_at);
        }
        if let Some(updated_at) = changes.updated_at {
            article.updated_at = Some(updated_at);
        }
        Ok(article.clone())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.rows.lock().unwrap().retain(|a| a.id != id);
        Ok(())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Article>> {
        Ok(self.rows.lock().unwrap().iter().find(|a| a.id == id).cloned())
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<(Article, Option<Category>)>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.slug == slug)
            .map(|a| (a.clone(), None)))
    }

    async fn exists_by_slug(&self, slug: &str) -> Result<bool> {
        Ok(self.rows.lock().unwrap().iter().any(|a| a.slug == slug))
    }

    async fn exists_by_slug_excluding(&self, slug: &str, exclude_id: i64) -> Result<bool> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .any(|a| a.slug == slug && a.id != exclude_id))
    }

    async fn list(
        &self,
        filter: &ArticleFilter,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<(Article, Option<Category>)>, i64)> {
        let rows = self.rows.lock().unwrap();
        let mut matched: Vec<Article> = rows
            .iter()
            .filter(|a| Self::matches(a, filter))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        let total = matched.len() as i64;
        let page = matched
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|a| (a, None))
            .collect();
        Ok((page, total))
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.rows.lock().unwrap().len() as i64)
    }

    async fn count_published(&self) -> Result<i64> {
        Ok(self.rows.lock().unwrap().iter().filter(|a| a.published).count() as i64)
    }
}

#[derive(Default)]
pub struct InMemoryTagRepo {
    tags: Mutex<Vec<Tag>>,
    links: Mutex<Vec<(i64, i64)>>,
    detach_log: Mutex<Vec<(i64, i64)>>,
}

impl InMemoryTagRepo {
    /// Tag ids attached to an article, sorted
    pub fn attached(&self, article_id: i64) -> Vec<i64> {
        let mut ids: Vec<i64> = self
            .links
            .lock()
            .unwrap()
            .iter()
            .filter(|(a, _)| *a == article_id)
            .map(|(_, t)| *t)
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn was_detached(&self, article_id: i64, tag_id: i64) -> bool {
        self.detach_log
            .lock()
            .unwrap()
            .contains(&(article_id, tag_id))
    }

    fn tag_named(id: i64) -> Tag {
        Tag {
            id,
            name: format!("tag-{id}"),
            description: None,
            created_at: Utc::now(),
        }
    }
}

#[async_trait]
impl TagRepository for InMemoryTagRepo {
    async fn list(&self) -> Result<Vec<Tag>> {
        Ok(self.tags.lock().unwrap().clone())
    }

    async fn create(&self, tag: &NewTag) -> Result<Tag> {
        let mut tags = self.tags.lock().unwrap();
        let created = Tag {
            id: tags.len() as i64 + 1,
            name: tag.name.clone(),
            description: tag.description.clone(),
            created_at: Utc::now(),
        };
        tags.push(created.clone());
        Ok(created)
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.tags.lock().unwrap().len() as i64)
    }

    async fn ids_for_article(&self, article_id: i64) -> Result<Vec<i64>> {
        Ok(self.attached(article_id))
    }

    async fn article_ids_with_tag(&self, tag_id: i64) -> Result<Vec<i64>> {
        Ok(self
            .links
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, t)| *t == tag_id)
            .map(|(a, _)| *a)
            .collect())
    }

    async fn tags_for_articles(&self, article_ids: &[i64]) -> Result<HashMap<i64, Vec<Tag>>> {
        let links = self.links.lock().unwrap();
        let mut map: HashMap<i64, Vec<Tag>> = HashMap::new();
        for (article_id, tag_id) in links.iter() {
            if article_ids.contains(article_id) {
                map.entry(*article_id)
                    .or_default()
                    .push(Self::tag_named(*tag_id));
            }
        }
        Ok(map)
    }

    async fn attach(&self, article_id: i64, tag_id: i64) -> Result<()> {
        self.links.lock().unwrap().push((article_id, tag_id));
        Ok(())
    }

    async fn detach(&self, article_id: i64, tag_id: i64) -> Result<()> {
        self.links
            .lock()
            .unwrap()
            .retain(|&(a, t)| !(a == article_id && t == tag_id));
        self.detach_log.lock().unwrap().push((article_id, tag_id));
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryCategoryRepo {
    rows: Mutex<Vec<Category>>,
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepo {
    async fn list(&self) -> Result<Vec<Category>> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Category>> {
        Ok(self.rows.lock().unwrap().iter().find(|c| c.id == id).cloned())
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.rows.lock().unwrap().len() as i64)
    }
}

#[derive(Default)]
pub struct InMemoryCommentRepo {
    rows: Mutex<Vec<Comment>>,
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepo {
    async fn list_approved(&self, article_id: i64) -> Result<Vec<Comment>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.article_id == article_id && c.is_approved)
            .cloned()
            .collect())
    }

    async fn insert(&self, comment: &NewComment) -> Result<Comment> {
        let mut rows = self.rows.lock().unwrap();
        let created = Comment {
            id: rows.len() as i64 + 1,
            article_id: comment.article_id,
            author_name: Some(comment.author_name.clone()),
            author_email: comment.author_email.clone(),
            content: comment.content.clone(),
            // backend column default: comments await moderation
            is_approved: false,
            parent_id: comment.parent_id,
            created_at: Utc::now(),
        };
        rows.push(created.clone());
        Ok(created)
    }

    async fn count_pending(&self) -> Result<i64> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|c| !c.is_approved)
            .count() as i64)
    }
}

#[derive(Default)]
pub struct InMemoryDraftRepo {
    rows: Mutex<Vec<Draft>>,
}

#[async_trait]
impl DraftRepository for InMemoryDraftRepo {
    async fn list(&self) -> Result<Vec<Draft>> {
        let mut rows = self.rows.lock().unwrap().clone();
        rows.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(rows)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Draft>> {
        Ok(self.rows.lock().unwrap().iter().find(|d| d.id == id).cloned())
    }

    async fn insert(&self, draft: &NewDraft) -> Result<Draft> {
        let mut rows = self.rows.lock().unwrap();
        let created = Draft {
            id: rows.len() as i64 + 1,
            title: draft.title.clone(),
            content: draft.content.clone(),
            category_id: draft.category_id,
            author_id: Some(draft.author_id),
            is_autosave: draft.is_autosave,
            created_at: Utc::now(),
            updated_at: draft.updated_at,
        };
        rows.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: i64, changes: &DraftChanges) -> Result<()> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(draft) = rows.iter_mut().find(|d| d.id == id) {
            if let Some(ref title) = changes.title {
                draft.title = Some(title.clone());
            }
            if let Some(ref content) = changes.content {
                draft.content = Some(content.clone());
            }
            if let Some(category_id) = changes.category_id {
                draft.category_id = Some(category_id);
            }
            if let Some(updated_at) = changes.updated_at {
                draft.updated_at = updated_at;
            }
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.rows.lock().unwrap().retain(|d| d.id != id);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemorySettingsRepo {
    pub rows: Mutex<Vec<BlogSetting>>,
}

#[async_trait]
impl SettingsRepository for InMemorySettingsRepo {
    async fn list(&self) -> Result<Vec<BlogSetting>> {
        Ok(self.rows.lock().unwrap().clone())
    }
}

#[derive(Default)]
pub struct InMemoryStatsRepo {
    recorded: Mutex<Vec<(NaiveDate, String, Option<i64>)>>,
    pub visits: Mutex<Vec<VisitStatistic>>,
}

impl InMemoryStatsRepo {
    pub fn recorded(&self) -> Vec<(NaiveDate, String, Option<i64>)> {
        self.recorded.lock().unwrap().clone()
    }
}

#[async_trait]
impl StatsRepository for InMemoryStatsRepo {
    async fn record_visit(
        &self,
        date: NaiveDate,
        page_path: &str,
        article_id: Option<i64>,
    ) -> Result<()> {
        self.recorded
            .lock()
            .unwrap()
            .push((date, page_path.to_string(), article_id));
        Ok(())
    }

    async fn visits_since(&self, date: NaiveDate) -> Result<Vec<VisitStatistic>> {
        Ok(self
            .visits
            .lock()
            .unwrap()
            .iter()
            .filter(|v| v.date >= date)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemorySubscriptionRepo {
    rows: Mutex<Vec<Subscription>>,
}

#[async_trait]
impl SubscriptionRepository for InMemorySubscriptionRepo {
    async fn insert(&self, subscription: &NewSubscription) -> Result<Subscription> {
        let mut rows = self.rows.lock().unwrap();
        let created = Subscription {
            id: rows.len() as i64 + 1,
            user_id: subscription.user_id,
            plan: subscription.plan,
            status: subscription.status.clone(),
            start_date: subscription.start_date,
            end_date: None,
            created_at: Utc::now(),
        };
        rows.push(created.clone());
        Ok(created)
    }
}

#[derive(Default)]
pub struct InMemoryUploadRepo {
    pub rows: Mutex<Vec<UploadRecord>>,
}

#[async_trait]
impl UploadRepository for InMemoryUploadRepo {
    async fn insert(&self, record: &UploadRecord) -> Result<()> {
        self.rows.lock().unwrap().push(record.clone());
        Ok(())
    }
}

/// Object store that keeps uploads in a counter instead of a bucket
#[derive(Default)]
pub struct InMemoryObjectStore {
    objects: AtomicUsize,
}

impl InMemoryObjectStore {
    pub fn object_count(&self) -> usize {
        self.objects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn put(
        &self,
        path: &str,
        _data: Vec<u8>,
        _content_type: &str,
    ) -> Result<String, SupabaseError> {
        self.objects.fetch_add(1, Ordering::SeqCst);
        Ok(format!("http://storage.test/{path}"))
    }
}

/// Fully wired application state over in-memory repositories, with handles
/// to the doubles so tests can assert on what was written.
pub struct TestContext {
    pub state: AppState,
    pub articles: Arc<InMemoryArticleRepo>,
    pub tags: Arc<InMemoryTagRepo>,
    pub comments: Arc<InMemoryCommentRepo>,
    pub stats: Arc<InMemoryStatsRepo>,
    pub store: Arc<InMemoryObjectStore>,
    pub keyring: Arc<SessionKeyring>,
}

impl TestContext {
    pub fn new() -> Self {
        let articles = Arc::new(InMemoryArticleRepo::default());
        let tags = Arc::new(InMemoryTagRepo::default());
        let categories = Arc::new(InMemoryCategoryRepo::default());
        let comments = Arc::new(InMemoryCommentRepo::default());
        let drafts = Arc::new(InMemoryDraftRepo::default());
        let settings = Arc::new(InMemorySettingsRepo::default());
        let stats = Arc::new(InMemoryStatsRepo::default());
        let subscriptions = Arc::new(InMemorySubscriptionRepo::default());
        let uploads = Arc::new(InMemoryUploadRepo::default());
        let store = Arc::new(InMemoryObjectStore::default());
        let keyring = Arc::new(SessionKeyring::new("test-secret"));

        let state = AppState {
            article_service: Arc::new(ArticleService::new(articles.clone(), tags.clone())),
            draft_service: Arc::new(DraftService::new(drafts)),
            comment_service: Arc::new(CommentService::new(comments.clone())),
            taxonomy_service: Arc::new(TaxonomyService::new(categories.clone())),
            tag_service: Arc::new(TagService::new(tags.clone())),
            settings_service: Arc::new(SettingsService::new(settings)),
            stats_service: Arc::new(StatsService::new(
                stats.clone(),
                articles.clone(),
                categories,
                tags.clone(),
                comments.clone(),
            )),
            subscription_service: Arc::new(SubscriptionService::new(subscriptions)),
            upload_service: Arc::new(UploadService::new(
                UploadConfig::default(),
                store.clone(),
                uploads,
            )),
            keyring: keyring.clone(),
            // port 9 is discard; the health probe fails fast in tests
            probe: Supabase::new("http://127.0.0.1:9", "anon-test"),
        };

        Self {
            state,
            articles,
            tags,
            comments,
            stats,
            store,
            keyring,
        }
    }

    pub fn admin_token(&self) -> String {
        self.token_for_role("admin")
    }

    pub fn token_for_role(&self, role: &str) -> String {
        self.keyring.issue(&Uuid::new_v4().to_string(), role, 3600)
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
