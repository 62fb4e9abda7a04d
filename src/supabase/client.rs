//! PostgREST client
//!
//! Query builder over the backend's `/rest/v1` API. Filters map directly to
//! PostgREST operators (`eq.`, `in.(...)`, `or=(...ilike...)`); pagination
//! uses `offset`/`limit` parameters and exact totals come from the
//! `Content-Range` header when requested with `Prefer: count=exact`.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::SupabaseError;

/// Handle to one credential tier of the remote backend.
///
/// Two instances exist in practice: one with the public read key and one
/// with the privileged service-role key for admin mutations.
#[derive(Debug, Clone)]
pub struct Supabase {
    http: reqwest::Client,
    base_url: String,
    key: String,
}

impl Supabase {
    /// Create a client for the given endpoint and credential key
    pub fn new(base_url: &str, key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            key: key.to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Start a query against a table
    pub fn from(&self, table: &str) -> TableQuery {
        TableQuery {
            client: self.clone(),
            table: table.to_string(),
            params: Vec::new(),
            count_exact: false,
        }
    }

    /// Call a remote stored procedure
    pub async fn rpc(&self, function: &str, args: serde_json::Value) -> Result<(), SupabaseError> {
        let url = format!("{}/rest/v1/rpc/{}", self.base_url, function);
        let response = self
            .http
            .post(&url)
            .headers(self.auth_headers())
            .json(&args)
            .send()
            .await?;
        check_status(response).await.map(|_| ())
    }

    pub(crate) fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(&self.key) {
            headers.insert("apikey", value);
        }
        if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", self.key)) {
            headers.insert(AUTHORIZATION, value);
        }
        headers
    }
}

/// Query builder for a single table
#[derive(Debug, Clone)]
pub struct TableQuery {
    client: Supabase,
    table: String,
    params: Vec<(String, String)>,
    count_exact: bool,
}

impl TableQuery {
    /// Column projection, including embedded resources
    /// (e.g. `*, category:category_id(*)`)
    pub fn select(mut self, columns: &str) -> Self {
        self.params.push(("select".to_string(), columns.to_string()));
        self
    }

    /// Equality filter
    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.params
            .push((column.to_string(), format!("eq.{}", value.to_string())));
        self
    }

    /// Inequality filter
    pub fn neq(mut self, column: &str, value: impl ToString) -> Self {
        self.params
            .push((column.to_string(), format!("neq.{}", value.to_string())));
        self
    }

    /// Membership filter on an id set
    pub fn in_ids(mut self, column: &str, ids: &[i64]) -> Self {
        let list = ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.params
            .push((column.to_string(), format!("in.({})", list)));
        self
    }

    /// Greater-than-or-equal filter
    pub fn gte(mut self, column: &str, value: impl ToString) -> Self {
        self.params
            .push((column.to_string(), format!("gte.{}", value.to_string())));
        self
    }

    /// Case-insensitive substring match across several columns, OR-combined
    pub fn or_ilike(mut self, columns: &[&str], query: &str) -> Self {
        let pattern = ilike_pattern(query);
        let clauses = columns
            .iter()
            .map(|c| format!("{}.ilike.{}", c, pattern))
            .collect::<Vec<_>>()
            .join(",");
        self.params.push(("or".to_string(), format!("({})", clauses)));
        self
    }

    /// Sort order, e.g. `published_at.desc` or `name.asc`
    pub fn order(mut self, spec: &str) -> Self {
        self.params.push(("order".to_string(), spec.to_string()));
        self
    }

    /// Page window
    pub fn range(mut self, offset: i64, limit: i64) -> Self {
        self.params.push(("offset".to_string(), offset.to_string()));
        self.params.push(("limit".to_string(), limit.to_string()));
        self
    }

    /// Row limit without an offset
    pub fn limit(mut self, limit: i64) -> Self {
        self.params.push(("limit".to_string(), limit.to_string()));
        self
    }

    /// Request an exact total alongside the rows
    pub fn count_exact(mut self) -> Self {
        self.count_exact = true;
        self
    }

    fn url(&self) -> String {
        format!("{}/rest/v1/{}", self.client.base_url(), self.table)
    }

    /// Fetch all matching rows
    pub async fn fetch<T: DeserializeOwned>(self) -> Result<Vec<T>, SupabaseError> {
        let (rows, _) = self.fetch_inner().await?;
        Ok(rows)
    }

    /// Fetch matching rows together with the exact total row count
    pub async fn fetch_with_count<T: DeserializeOwned>(
        mut self,
    ) -> Result<(Vec<T>, i64), SupabaseError> {
        self.count_exact = true;
        let (rows, total) = self.fetch_inner().await?;
        let total = total.unwrap_or(rows.len() as i64);
        Ok((rows, total))
    }

    /// Fetch at most one row
    pub async fn fetch_optional<T: DeserializeOwned>(self) -> Result<Option<T>, SupabaseError> {
        let (rows, _) = self.limit(1).fetch_inner().await?;
        Ok(rows.into_iter().next())
    }

    /// Count matching rows without transferring them
    pub async fn count(self) -> Result<i64, SupabaseError> {
        let (rows, total): (Vec<serde_json::Value>, Option<i64>) = {
            let mut q = self.select("id").limit(1);
            q.count_exact = true;
            q.fetch_inner().await?
        };
        Ok(total.unwrap_or(rows.len() as i64))
    }

    async fn fetch_inner<T: DeserializeOwned>(
        self,
    ) -> Result<(Vec<T>, Option<i64>), SupabaseError> {
        let mut request = self
            .client
            .http()
            .get(self.url())
            .headers(self.client.auth_headers())
            .query(&self.params);
        if self.count_exact {
            request = request.header("Prefer", "count=exact");
        }
        let response = request.send().await?;
        let total = response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range_total);
        let response = check_status(response).await?;
        let body = response.text().await?;
        let rows = serde_json::from_str(&body).map_err(|e| SupabaseError::Decode(e.to_string()))?;
        Ok((rows, total))
    }

    /// Insert a row and return the stored representation
    pub async fn insert_returning<T: DeserializeOwned>(
        self,
        body: &impl Serialize,
    ) -> Result<T, SupabaseError> {
        let response = self
            .client
            .http()
            .post(self.url())
            .headers(self.client.auth_headers())
            .header("Prefer", "return=representation")
            .query(&self.params)
            .json(body)
            .send()
            .await?;
        let response = check_status(response).await?;
        let text = response.text().await?;
        let mut rows: Vec<T> =
            serde_json::from_str(&text).map_err(|e| SupabaseError::Decode(e.to_string()))?;
        if rows.is_empty() {
            return Err(SupabaseError::Decode(
                "insert returned no representation".to_string(),
            ));
        }
        Ok(rows.remove(0))
    }

    /// Insert one row or a batch, discarding the response body
    pub async fn insert(self, body: &impl Serialize) -> Result<(), SupabaseError> {
        let response = self
            .client
            .http()
            .post(self.url())
            .headers(self.client.auth_headers())
            .header("Prefer", "return=minimal")
            .query(&self.params)
            .json(body)
            .send()
            .await?;
        check_status(response).await.map(|_| ())
    }

    /// Patch all rows matching the current filters and return the first
    /// updated representation
    pub async fn update_returning<T: DeserializeOwned>(
        self,
        body: &impl Serialize,
    ) -> Result<T, SupabaseError> {
        let response = self
            .client
            .http()
            .patch(self.url())
            .headers(self.client.auth_headers())
            .header("Prefer", "return=representation")
            .query(&self.params)
            .json(body)
            .send()
            .await?;
        let response = check_status(response).await?;
        let text = response.text().await?;
        let mut rows: Vec<T> =
            serde_json::from_str(&text).map_err(|e| SupabaseError::Decode(e.to_string()))?;
        if rows.is_empty() {
            return Err(SupabaseError::Decode(
                "update matched no rows".to_string(),
            ));
        }
        Ok(rows.remove(0))
    }

    /// Patch all rows matching the current filters
    pub async fn update(self, body: &impl Serialize) -> Result<(), SupabaseError> {
        let response = self
            .client
            .http()
            .patch(self.url())
            .headers(self.client.auth_headers())
            .header("Prefer", "return=minimal")
            .query(&self.params)
            .json(body)
            .send()
            .await?;
        check_status(response).await.map(|_| ())
    }

    /// Delete all rows matching the current filters
    pub async fn delete(self) -> Result<(), SupabaseError> {
        let response = self
            .client
            .http()
            .delete(self.url())
            .headers(self.client.auth_headers())
            .query(&self.params)
            .send()
            .await?;
        check_status(response).await.map(|_| ())
    }

    #[cfg(test)]
    fn params(&self) -> &[(String, String)] {
        &self.params
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, SupabaseError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(SupabaseError::from_response(status.as_u16(), &body))
}

/// Parse the total from a `Content-Range` header value such as `0-9/57`.
/// Returns `None` for `*` totals (count was not requested).
fn parse_content_range_total(value: &str) -> Option<i64> {
    let total = value.rsplit('/').next()?;
    total.parse().ok()
}

/// Build an `ilike` pattern for a free-text query. PostgREST's logic-tree
/// syntax reserves commas and parentheses, so those are blanked out of the
/// user-supplied text rather than quoted.
fn ilike_pattern(query: &str) -> String {
    let cleaned: String = query
        .chars()
        .map(|c| if matches!(c, ',' | '(' | ')') { ' ' } else { c })
        .collect();
    format!("*{}*", cleaned.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> Supabase {
        Supabase::new("https://backend.test/", "anon-key")
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        assert_eq!(client().base_url(), "https://backend.test");
    }

    #[test]
    fn test_eq_filter_shape() {
        let q = client().from("articles").eq("slug", "test-post");
        assert_eq!(
            q.params(),
            &[("slug".to_string(), "eq.test-post".to_string())]
        );
    }

    #[test]
    fn test_in_ids_filter_shape() {
        let q = client().from("articles").in_ids("id", &[3, 1, 7]);
        assert_eq!(q.params(), &[("id".to_string(), "in.(3,1,7)".to_string())]);
    }

    #[test]
    fn test_or_ilike_across_columns() {
        let q = client()
            .from("articles")
            .or_ilike(&["title", "content"], "rust");
        assert_eq!(
            q.params(),
            &[(
                "or".to_string(),
                "(title.ilike.*rust*,content.ilike.*rust*)".to_string()
            )]
        );
    }

    #[test]
    fn test_range_emits_offset_and_limit() {
        let q = client().from("articles").range(20, 10);
        assert_eq!(
            q.params(),
            &[
                ("offset".to_string(), "20".to_string()),
                ("limit".to_string(), "10".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_content_range_total() {
        assert_eq!(parse_content_range_total("0-9/57"), Some(57));
        assert_eq!(parse_content_range_total("*/0"), Some(0));
        assert_eq!(parse_content_range_total("0-9/*"), None);
        assert_eq!(parse_content_range_total("garbage"), None);
    }

    #[test]
    fn test_ilike_pattern_blanks_reserved_chars() {
        assert_eq!(ilike_pattern("rust"), "*rust*");
        assert_eq!(ilike_pattern("a,(b)"), "*a  b*");
    }
}
