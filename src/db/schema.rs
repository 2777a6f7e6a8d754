//! Table definition and first-start seeding.

use rusqlite::params;
use tracing::info;

use crate::articles::types::timestamp_now;
use crate::error::StorageError;

use super::Storage;

pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS articles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    author TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_articles_created_at ON articles(created_at DESC);
"#;

/// Demo rows inserted into an empty table: (title, content, author).
pub const DEMO_ARTICLES: [(&str, &str, &str); 3] = [
    (
        "Introduction à GitHub Actions",
        "GitHub Actions est une plateforme d'automatisation...",
        "Admin",
    ),
    (
        "Pourquoi le CI/CD est important",
        "Le CI/CD permet de déployer plus rapidement...",
        "DevOps Team",
    ),
    (
        "Guide du débutant Python",
        "Python est un langage de programmation puissant...",
        "Tech Writer",
    ),
];

/// Create the articles table if it is missing.
pub async fn create_schema(storage: &Storage) -> Result<(), StorageError> {
    storage.with_connection(|conn| conn.execute_batch(SCHEMA)).await
}

/// Create the table and seed the demo rows when it is empty.
///
/// Returns how many rows were seeded. A non-empty table is left untouched.
pub async fn bootstrap(storage: &Storage) -> Result<usize, StorageError> {
    let now = timestamp_now();

    let seeded = storage
        .with_connection(move |conn| {
            let tx = conn.transaction()?;
            tx.execute_batch(SCHEMA)?;

            let count: i64 = tx.query_row("SELECT COUNT(*) FROM articles", [], |row| row.get(0))?;
            if count > 0 {
                return Ok(0);
            }

            {
                let mut stmt = tx.prepare(
                    "INSERT INTO articles (title, content, author, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?4)",
                )?;
                for (title, content, author) in DEMO_ARTICLES {
                    stmt.execute(params![title, content, author, now])?;
                }
            }
            tx.commit()?;
            Ok(DEMO_ARTICLES.len())
        })
        .await?;

    if seeded > 0 {
        info!(rows = seeded, path = %storage.path().display(), "seeded demo articles");
    } else {
        info!(path = %storage.path().display(), "articles table ready");
    }
    Ok(seeded)
}
