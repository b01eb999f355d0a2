use chrono::{DateTime, Utc};

use super::error::ContentError;

/// The `categories/topics` document listing the genres books can be tagged with.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Topics {
    #[serde(default)]
    pub list: Vec<String>,
    #[serde(default)]
    pub fallback_topics: Vec<String>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl Topics {
    pub fn add(&mut self, category: &str) -> Result<String, ContentError> {
        let trimmed = category.trim();
        if trimmed.is_empty() {
            return Err(ContentError::EmptyCategory);
        }
        if self.list.iter().any(|c| c == trimmed) {
            return Err(ContentError::DuplicateCategory(trimmed.to_string()));
        }

        self.list.push(trimmed.to_string());
        self.last_updated = Some(Utc::now());

        Ok(trimmed.to_string())
    }

    pub fn remove(&mut self, index: usize) -> Result<String, ContentError> {
        if index >= self.list.len() {
            return Err(ContentError::IndexOutOfRange {
                index,
                len: self.list.len(),
            });
        }

        self.last_updated = Some(Utc::now());
        Ok(self.list.remove(index))
    }
}
