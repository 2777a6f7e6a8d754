//! Blog articles: record types and the table repository.

pub mod repository;
pub mod types;

pub use repository::ArticleRepository;
pub use types::{Article, ArticleUpdate, NewArticle, DEFAULT_AUTHOR};
