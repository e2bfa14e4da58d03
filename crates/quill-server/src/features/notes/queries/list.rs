//! List notes query
//!
//! Owner-scoped listing with optional filters: favorites only, a
//! case-insensitive substring search across title and body, and a category
//! filter where the literal `none` selects uncategorized notes.

use serde::Deserialize;
use sqlx::PgPool;

use crate::db::statement::{self, NoteFilters};
use crate::features::notes::types::Note;

/// Query-string parameters for a note listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListNotesQuery {
    pub favorite: Option<bool>,
    pub search: Option<String>,
    pub category_id: Option<String>,
}

/// Errors that can occur when listing notes
#[derive(Debug, thiserror::Error)]
pub enum ListNotesError {
    #[error("Invalid category filter '{0}': expected a category id or 'none'")]
    InvalidCategoryFilter(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ListNotesQuery {
    /// Translate the raw query parameters into statement filters
    pub fn filters(&self) -> Result<NoteFilters, ListNotesError> {
        let category = match self.category_id.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(
                raw.parse()
                    .map_err(|_| ListNotesError::InvalidCategoryFilter(raw.to_string()))?,
            ),
        };

        let search = self
            .search
            .as_deref()
            .filter(|term| !term.is_empty())
            .map(|term| term.to_string());

        Ok(NoteFilters {
            favorites_only: self.favorite == Some(true),
            search,
            category,
        })
    }
}

/// List the caller's notes, newest first
#[tracing::instrument(skip(pool, query))]
pub async fn handle(
    pool: PgPool,
    user_id: i64,
    query: ListNotesQuery,
) -> Result<Vec<Note>, ListNotesError> {
    let filters = query.filters()?;
    let statement = statement::note_listing(user_id, &filters);

    let notes = statement.fetch_all_as::<Note>(&pool).await?;

    Ok(notes)
}
