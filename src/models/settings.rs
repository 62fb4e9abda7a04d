//! Blog settings model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Key/value site setting row owned by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogSetting {
    pub id: i64,
    pub setting_key: String,
    #[serde(default)]
    pub setting_value: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_by: Option<Uuid>,
}
