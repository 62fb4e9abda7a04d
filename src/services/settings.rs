//! Blog settings service
//!
//! Settings are stored as key/value rows and served to clients as a flat
//! object, which is what the frontend expects to merge over its defaults.

use serde_json::{Map, Value};
use std::sync::Arc;

use crate::models::BlogSetting;
use crate::repositories::SettingsRepository;

/// Settings service
pub struct SettingsService {
    repo: Arc<dyn SettingsRepository>,
}

impl SettingsService {
    pub fn new(repo: Arc<dyn SettingsRepository>) -> Self {
        Self { repo }
    }

    /// All settings as a key -> value object. Rows with no value are
    /// reported as null so clients can distinguish "unset" from "absent".
    pub async fn as_map(&self) -> anyhow::Result<Map<String, Value>> {
        let rows = self.repo.list().await?;
        Ok(fold_settings(rows))
    }
}

fn fold_settings(rows: Vec<BlogSetting>) -> Map<String, Value> {
    rows.into_iter()
        .map(|row| {
            let value = row
                .setting_value
                .map(Value::String)
                .unwrap_or(Value::Null);
            (row.setting_key, value)
        })
        .collect()
}
