//! Typed article operations over the storage accessor.

use rusqlite::{params, OptionalExtension, Row};
use tracing::debug;

use crate::db::Storage;
use crate::error::{ArticleError, StorageError};

use super::types::{parse_timestamp, timestamp_now, Article, ArticleUpdate, NewArticle};

const ARTICLE_COLUMNS: &str = "id, title, content, author, created_at, updated_at";

/// Article table access. Owns the SQL text and row mapping.
#[derive(Debug, Clone)]
pub struct ArticleRepository {
    storage: Storage,
}

impl ArticleRepository {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// All articles, newest first. Empty when the table is empty.
    pub async fn list_all(&self) -> Result<Vec<Article>, StorageError> {
        let rows = self
            .storage
            .with_connection(|conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {ARTICLE_COLUMNS} FROM articles ORDER BY created_at DESC, id DESC"
                ))?;
                let rows = stmt
                    .query_map([], raw_from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(rows)
            })
            .await?;

        let articles = rows
            .into_iter()
            .map(RawArticle::into_article)
            .collect::<Result<Vec<_>, _>>()?;
        debug!(count = articles.len(), "listed articles");
        Ok(articles)
    }

    /// One article, or `None` when no row has this id.
    pub async fn get(&self, id: i64) -> Result<Option<Article>, StorageError> {
        let row = self
            .storage
            .with_connection(move |conn| {
                conn.query_row(
                    &format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE id = ?1"),
                    params![id],
                    raw_from_row,
                )
                .optional()
            })
            .await?;

        row.map(RawArticle::into_article).transpose()
    }

    /// Insert a new article and return its assigned id.
    pub async fn create(&self, article: NewArticle) -> Result<i64, ArticleError> {
        article.validate()?;
        let author = article.author().to_string();
        let now = timestamp_now();

        let id = self
            .storage
            .with_connection(move |conn| {
                conn.execute(
                    "INSERT INTO articles (title, content, author, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?4)",
                    params![article.title, article.content, author, now],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await?;

        debug!(id, "created article");
        Ok(id)
    }

    /// Overwrite the provided fields and refresh `updated_at`.
    ///
    /// Existence check and write are one conditional statement; a missing id
    /// shows up as zero affected rows.
    pub async fn update(&self, id: i64, update: ArticleUpdate) -> Result<(), ArticleError> {
        update.validate()?;
        let now = timestamp_now();

        let changed = self
            .storage
            .with_connection(move |conn| {
                conn.execute(
                    "UPDATE articles
                     SET title = COALESCE(?1, title),
                         content = COALESCE(?2, content),
                         updated_at = MAX(?3, created_at)
                     WHERE id = ?4",
                    params![update.title, update.content, now, id],
                )
            })
            .await?;

        if changed == 0 {
            return Err(ArticleError::NotFound(id));
        }
        debug!(id, "updated article");
        Ok(())
    }

    /// Remove an article permanently.
    pub async fn delete(&self, id: i64) -> Result<(), ArticleError> {
        let changed = self
            .storage
            .with_connection(move |conn| {
                conn.execute("DELETE FROM articles WHERE id = ?1", params![id])
            })
            .await?;

        if changed == 0 {
            return Err(ArticleError::NotFound(id));
        }
        debug!(id, "deleted article");
        Ok(())
    }

    /// Number of stored articles.
    pub async fn count(&self) -> Result<i64, StorageError> {
        self.storage
            .with_connection(|conn| {
                conn.query_row("SELECT COUNT(*) FROM articles", [], |row| row.get(0))
            })
            .await
    }
}

/// Row as read from SQLite, before timestamp parsing.
struct RawArticle {
    id: i64,
    title: String,
    content: String,
    author: String,
    created_at: String,
    updated_at: String,
}

fn raw_from_row(row: &Row<'_>) -> rusqlite::Result<RawArticle> {
    Ok(RawArticle {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        author: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

impl RawArticle {
    fn into_article(self) -> Result<Article, StorageError> {
        let created_at = parse_timestamp(&self.created_at).ok_or_else(|| {
            StorageError::CorruptRow(format!("article {}: bad created_at {:?}", self.id, self.created_at))
        })?;
        let updated_at = parse_timestamp(&self.updated_at).ok_or_else(|| {
            StorageError::CorruptRow(format!("article {}: bad updated_at {:?}", self.id, self.updated_at))
        })?;

        Ok(Article {
            id: self.id,
            title: self.title,
            content: self.content,
            author: self.author,
            created_at,
            updated_at,
        })
    }
}
