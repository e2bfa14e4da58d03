//! Ownership-scoped statement construction
//!
//! Builds the variable-shape parameterized statements used by the notes
//! feature: partial updates, filtered listings, and soft deletes. Every
//! statement produced here carries the owner predicate
//! (`user_id = $n AND deleted_at IS NULL`), so no caller can reach another
//! user's rows.
//!
//! Update fields and listing filters are modeled as closed enums. The
//! builder folds over them, emitting a `$n` placeholder and pushing the
//! matching value in the same step, so placeholder positions and bound
//! values always align one-to-one in emission order. Caller-supplied data
//! only ever becomes a bound value, never statement text.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool};
use thiserror::Error;

use crate::features::notes::types::Visibility;

/// Errors from statement construction
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatementError {
    /// An update was requested without any field to change
    #[error("No fields to update")]
    NoFieldsToUpdate,
}

/// A value bound to one positional placeholder
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Bool(bool),
    Int(i64),
    Text(String),
    Timestamp(DateTime<Utc>),
}

/// A finished statement: SQL text plus its bound values in placeholder order
#[derive(Debug, Clone)]
pub struct OwnedStatement {
    sql: String,
    binds: Vec<SqlValue>,
}

impl OwnedStatement {
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn binds(&self) -> &[SqlValue] {
        &self.binds
    }

    /// Execute the statement, binding values in emission order
    ///
    /// Returns the affected-row count; callers translate zero rows into
    /// their not-found-or-not-owned error.
    pub async fn execute(&self, pool: &PgPool) -> Result<u64, sqlx::Error> {
        let mut query = sqlx::query(&self.sql);
        for value in &self.binds {
            query = match value {
                SqlValue::Bool(v) => query.bind(*v),
                SqlValue::Int(v) => query.bind(*v),
                SqlValue::Text(v) => query.bind(v.as_str()),
                SqlValue::Timestamp(v) => query.bind(*v),
            };
        }
        query.execute(pool).await.map(|result| result.rows_affected())
    }

    /// Fetch all rows, binding values in emission order
    pub async fn fetch_all_as<T>(&self, pool: &PgPool) -> Result<Vec<T>, sqlx::Error>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let mut query = sqlx::query_as::<_, T>(&self.sql);
        for value in &self.binds {
            query = match value {
                SqlValue::Bool(v) => query.bind(*v),
                SqlValue::Int(v) => query.bind(*v),
                SqlValue::Text(v) => query.bind(v.as_str()),
                SqlValue::Timestamp(v) => query.bind(*v),
            };
        }
        query.fetch_all(pool).await
    }
}

/// Internal accumulator keeping SQL text and bind list in lockstep
struct StatementBuilder {
    sql: String,
    binds: Vec<SqlValue>,
}

impl StatementBuilder {
    fn new(prefix: &str) -> Self {
        Self {
            sql: prefix.to_string(),
            binds: Vec::new(),
        }
    }

    fn push(&mut self, fragment: &str) {
        self.sql.push_str(fragment);
    }

    /// Push a bound value and return its 1-based placeholder position
    fn push_value(&mut self, value: SqlValue) -> usize {
        self.binds.push(value);
        self.binds.len()
    }

    fn finish(self) -> OwnedStatement {
        OwnedStatement {
            sql: self.sql,
            binds: self.binds,
        }
    }
}

/// One requested change to a note column
///
/// The set of assignable columns is closed here; adding a field means adding
/// a variant, which keeps placeholder/value alignment a compiler-checked
/// property of the fold below.
#[derive(Debug, Clone, PartialEq)]
pub enum NoteChange {
    Title(String),
    Body(String),
    Category(i64),
    Favorite(bool),
    Visibility(Visibility),
}

impl NoteChange {
    fn column(&self) -> &'static str {
        match self {
            NoteChange::Title(_) => "title",
            NoteChange::Body(_) => "body",
            NoteChange::Category(_) => "category_id",
            NoteChange::Favorite(_) => "is_favorite",
            NoteChange::Visibility(_) => "visibility",
        }
    }

    fn into_value(self) -> SqlValue {
        match self {
            NoteChange::Title(v) => SqlValue::Text(v),
            NoteChange::Body(v) => SqlValue::Text(v),
            NoteChange::Category(v) => SqlValue::Int(v),
            NoteChange::Favorite(v) => SqlValue::Bool(v),
            NoteChange::Visibility(v) => SqlValue::Text(v.as_str().to_string()),
        }
    }
}

/// Category filter for note listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    /// Only notes with no category link (`category_id IS NULL`)
    Uncategorized,
    /// Only notes linked to the given category
    Id(i64),
}

impl std::str::FromStr for CategoryFilter {
    type Err = ();

    /// Parses the query-string form: the literal `none` selects
    /// uncategorized notes, anything else must be a category id.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "none" {
            return Ok(CategoryFilter::Uncategorized);
        }
        s.parse::<i64>().map(CategoryFilter::Id).map_err(|_| ())
    }
}

/// Optional filters for a note listing, composed conjunctively
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteFilters {
    pub favorites_only: bool,
    pub search: Option<String>,
    pub category: Option<CategoryFilter>,
}

/// Columns selected by note reads, in row-decoding order
pub const NOTE_COLUMNS: &str =
    "id, title, body, category_id, is_favorite, visibility, created_at, updated_at";

/// Build a partial update of one owned note
///
/// Emits an assignment per supplied change plus the `updated_at` timestamp,
/// scoped to `id = $n AND user_id = $n AND deleted_at IS NULL`. Fails with
/// [`StatementError::NoFieldsToUpdate`] when no change was supplied, before
/// any statement text is produced.
pub fn note_update(
    note_id: i64,
    user_id: i64,
    changes: Vec<NoteChange>,
    now: DateTime<Utc>,
) -> Result<OwnedStatement, StatementError> {
    if changes.is_empty() {
        return Err(StatementError::NoFieldsToUpdate);
    }

    let mut builder = StatementBuilder::new("UPDATE notes SET ");

    for (i, change) in changes.into_iter().enumerate() {
        let column = change.column();
        let position = builder.push_value(change.into_value());
        if i > 0 {
            builder.push(", ");
        }
        builder.push(&format!("{} = ${}", column, position));
    }

    let position = builder.push_value(SqlValue::Timestamp(now));
    builder.push(&format!(", updated_at = ${}", position));

    let id_position = builder.push_value(SqlValue::Int(note_id));
    let owner_position = builder.push_value(SqlValue::Int(user_id));
    builder.push(&format!(
        " WHERE id = ${} AND user_id = ${} AND deleted_at IS NULL",
        id_position, owner_position
    ));

    Ok(builder.finish())
}

/// Build a filtered listing of owned notes, newest first
pub fn note_listing(user_id: i64, filters: &NoteFilters) -> OwnedStatement {
    let mut builder = StatementBuilder::new(&format!("SELECT {} FROM notes", NOTE_COLUMNS));

    let owner_position = builder.push_value(SqlValue::Int(user_id));
    builder.push(&format!(
        " WHERE user_id = ${} AND deleted_at IS NULL",
        owner_position
    ));

    if filters.favorites_only {
        let position = builder.push_value(SqlValue::Bool(true));
        builder.push(&format!(" AND is_favorite = ${}", position));
    }

    if let Some(term) = &filters.search {
        let pattern = format!("%{}%", term);
        let title_position = builder.push_value(SqlValue::Text(pattern.clone()));
        let body_position = builder.push_value(SqlValue::Text(pattern));
        builder.push(&format!(
            " AND (title ILIKE ${} OR body ILIKE ${})",
            title_position, body_position
        ));
    }

    match filters.category {
        Some(CategoryFilter::Uncategorized) => {
            builder.push(" AND category_id IS NULL");
        }
        Some(CategoryFilter::Id(id)) => {
            let position = builder.push_value(SqlValue::Int(id));
            builder.push(&format!(" AND category_id = ${}", position));
        }
        None => {}
    }

    builder.push(" ORDER BY created_at DESC");

    builder.finish()
}

/// Build a soft delete of one owned note
pub fn note_soft_delete(note_id: i64, user_id: i64, now: DateTime<Utc>) -> OwnedStatement {
    let mut builder = StatementBuilder::new("UPDATE notes SET deleted_at = ");

    let stamp_position = builder.push_value(SqlValue::Timestamp(now));
    builder.push(&format!("${}", stamp_position));

    let id_position = builder.push_value(SqlValue::Int(note_id));
    let owner_position = builder.push_value(SqlValue::Int(user_id));
    builder.push(&format!(
        " WHERE id = ${} AND user_id = ${} AND deleted_at IS NULL",
        id_position, owner_position
    ));

    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn update_with_single_field_aligns_placeholders() {
        let stamp = now();
        let statement =
            note_update(5, 7, vec![NoteChange::Favorite(true)], stamp).unwrap();

        assert_eq!(
            statement.sql(),
            "UPDATE notes SET is_favorite = $1, updated_at = $2 \
             WHERE id = $3 AND user_id = $4 AND deleted_at IS NULL"
        );
        assert_eq!(
            statement.binds(),
            &[
                SqlValue::Bool(true),
                SqlValue::Timestamp(stamp),
                SqlValue::Int(5),
                SqlValue::Int(7),
            ]
        );
    }

    #[test]
    fn update_emits_one_assignment_per_supplied_field() {
        let stamp = now();
        let changes = vec![
            NoteChange::Title("Groceries".to_string()),
            NoteChange::Body("milk, eggs".to_string()),
            NoteChange::Category(3),
            NoteChange::Visibility(Visibility::Shared),
        ];
        let supplied = changes.len();

        let statement = note_update(1, 2, changes, stamp).unwrap();

        let assignments = statement.sql().matches(" = $").count();
        // one per field, plus updated_at, plus the id and owner predicates
        assert_eq!(assignments, supplied + 3);
        assert_eq!(statement.binds().len(), supplied + 3);
        assert_eq!(
            statement.sql(),
            "UPDATE notes SET title = $1, body = $2, category_id = $3, visibility = $4, \
             updated_at = $5 WHERE id = $6 AND user_id = $7 AND deleted_at IS NULL"
        );
        assert_eq!(statement.binds()[3], SqlValue::Text("shared".to_string()));
    }

    #[test]
    fn update_without_fields_is_rejected() {
        let result = note_update(1, 2, Vec::new(), now());
        assert_eq!(result.unwrap_err(), StatementError::NoFieldsToUpdate);
    }

    #[test]
    fn listing_without_filters_scopes_to_owner() {
        let statement = note_listing(42, &NoteFilters::default());

        assert_eq!(
            statement.sql(),
            format!(
                "SELECT {} FROM notes WHERE user_id = $1 AND deleted_at IS NULL \
                 ORDER BY created_at DESC",
                NOTE_COLUMNS
            )
        );
        assert_eq!(statement.binds(), &[SqlValue::Int(42)]);
    }

    #[test]
    fn listing_with_favorites_filter() {
        let filters = NoteFilters {
            favorites_only: true,
            ..Default::default()
        };
        let statement = note_listing(42, &filters);

        assert!(statement.sql().contains("AND is_favorite = $2"));
        assert_eq!(
            statement.binds(),
            &[SqlValue::Int(42), SqlValue::Bool(true)]
        );
    }

    #[test]
    fn listing_search_binds_pattern_twice() {
        let filters = NoteFilters {
            search: Some("rust".to_string()),
            ..Default::default()
        };
        let statement = note_listing(7, &filters);

        assert!(statement
            .sql()
            .contains("AND (title ILIKE $2 OR body ILIKE $3)"));
        assert_eq!(
            statement.binds(),
            &[
                SqlValue::Int(7),
                SqlValue::Text("%rust%".to_string()),
                SqlValue::Text("%rust%".to_string()),
            ]
        );
    }

    #[test]
    fn listing_uncategorized_emits_is_null_without_bind() {
        let filters = NoteFilters {
            category: Some(CategoryFilter::Uncategorized),
            ..Default::default()
        };
        let statement = note_listing(7, &filters);

        assert!(statement.sql().contains("AND category_id IS NULL"));
        assert_eq!(statement.binds(), &[SqlValue::Int(7)]);
    }

    #[test]
    fn listing_with_all_filters_composes_conjunctively() {
        let filters = NoteFilters {
            favorites_only: true,
            search: Some("plan".to_string()),
            category: Some(CategoryFilter::Id(9)),
        };
        let statement = note_listing(3, &filters);

        assert_eq!(
            statement.sql(),
            format!(
                "SELECT {} FROM notes WHERE user_id = $1 AND deleted_at IS NULL \
                 AND is_favorite = $2 AND (title ILIKE $3 OR body ILIKE $4) \
                 AND category_id = $5 ORDER BY created_at DESC",
                NOTE_COLUMNS
            )
        );
        assert_eq!(statement.binds().len(), 5);
    }

    #[test]
    fn soft_delete_scopes_to_owner() {
        let stamp = now();
        let statement = note_soft_delete(5, 9, stamp);

        assert_eq!(
            statement.sql(),
            "UPDATE notes SET deleted_at = $1 \
             WHERE id = $2 AND user_id = $3 AND deleted_at IS NULL"
        );
        assert_eq!(
            statement.binds(),
            &[
                SqlValue::Timestamp(stamp),
                SqlValue::Int(5),
                SqlValue::Int(9),
            ]
        );
    }

    #[test]
    fn category_filter_parses_sentinel_and_ids() {
        assert_eq!("none".parse(), Ok(CategoryFilter::Uncategorized));
        assert_eq!("12".parse(), Ok(CategoryFilter::Id(12)));
        assert!("potato".parse::<CategoryFilter>().is_err());
        assert!("".parse::<CategoryFilter>().is_err());
    }
}
