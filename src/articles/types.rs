//! Article records and the payloads that create or change them.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ArticleError;

/// Author stored when a new article does not name one.
pub const DEFAULT_AUTHOR: &str = "Anonymous";

/// A persisted blog article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Article {
    /// Store-assigned id, never reused.
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author: String,
    /// Set once at insert time.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every update.
    pub updated_at: DateTime<Utc>,
}

/// Validated input for a new article.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
pub struct NewArticle {
    pub title: String,
    pub content: String,
    /// Defaults to "Anonymous".
    #[serde(default)]
    pub author: Option<String>,
}

impl NewArticle {
    /// Build a new article, applying the default author.
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        author: Option<String>,
    ) -> Result<Self, ArticleError> {
        let article = Self {
            title: title.into(),
            content: content.into(),
            author,
        };
        article.validate()?;
        Ok(article)
    }

    /// Reject empty titles or bodies. Whitespace counts as content.
    pub fn validate(&self) -> Result<(), ArticleError> {
        if self.title.is_empty() || self.content.is_empty() {
            return Err(ArticleError::Validation(
                "Title et content sont requis".to_string(),
            ));
        }
        Ok(())
    }

    /// Author to persist.
    pub fn author(&self) -> &str {
        match self.author.as_deref() {
            Some(author) if !author.is_empty() => author,
            _ => DEFAULT_AUTHOR,
        }
    }
}

/// Partial update. `None` fields keep their stored value.
///
/// Author, id and timestamps are not updatable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
pub struct ArticleUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl ArticleUpdate {
    /// True when the update names no field at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }

    /// Provided fields must not be empty strings.
    pub fn validate(&self) -> Result<(), ArticleError> {
        let empty = |field: &Option<String>| field.as_deref().is_some_and(str::is_empty);
        if empty(&self.title) || empty(&self.content) {
            return Err(ArticleError::Validation(
                "Title et content ne peuvent pas être vides".to_string(),
            ));
        }
        Ok(())
    }
}

/// Current time in the fixed-width form stored in the database.
///
/// Microsecond precision with a `Z` suffix, so text order matches time order.
pub fn timestamp_now() -> String {
    format_timestamp(Utc::now())
}

/// Render a timestamp in the stored form.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a stored timestamp.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
