//! Note API routes
//!
//! - `POST /notes` - Create a note
//! - `GET /notes` - List notes with optional filters
//! - `GET /notes/:id` - Get a single note
//! - `PATCH /notes/:id` - Partially update a note
//! - `DELETE /notes/:id` - Soft-delete a note
//!
//! All routes run behind the authentication middleware; the owning user is
//! taken from the `CurrentUser` request extension, never from the request
//! payload.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use sqlx::PgPool;

use crate::api::response::{ApiResponse, ErrorResponse};
use crate::auth::CurrentUser;

use super::commands::{
    create::{self, CreateNoteCommand, CreateNoteError},
    delete::{self, DeleteNoteError},
    update::{self, UpdateNoteCommand, UpdateNoteError},
};
use super::queries::{
    get::{self as get_query, GetNoteError},
    list::{self, ListNotesError, ListNotesQuery},
};

/// Creates the notes router
pub fn notes_routes() -> Router<PgPool> {
    Router::new()
        .route("/", get(list_notes).post(create_note))
        .route(
            "/:id",
            get(get_note).patch(update_note).delete(delete_note),
        )
}

#[tracing::instrument(skip(pool, command), fields(user_id = user.id))]
async fn create_note(
    State(pool): State<PgPool>,
    Extension(user): Extension<CurrentUser>,
    Json(command): Json<CreateNoteCommand>,
) -> Result<Response, NoteApiError> {
    let response = create::handle(pool, user.id, command).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(pool, query), fields(user_id = user.id))]
async fn list_notes(
    State(pool): State<PgPool>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<ListNotesQuery>,
) -> Result<Response, NoteApiError> {
    let notes = list::handle(pool, user.id, query).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(notes))).into_response())
}

#[tracing::instrument(skip(pool), fields(user_id = user.id))]
async fn get_note(
    State(pool): State<PgPool>,
    Extension(user): Extension<CurrentUser>,
    Path(note_id): Path<i64>,
) -> Result<Response, NoteApiError> {
    let note = get_query::handle(pool, user.id, note_id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(note))).into_response())
}

#[tracing::instrument(skip(pool, command), fields(user_id = user.id))]
async fn update_note(
    State(pool): State<PgPool>,
    Extension(user): Extension<CurrentUser>,
    Path(note_id): Path<i64>,
    Json(command): Json<UpdateNoteCommand>,
) -> Result<Response, NoteApiError> {
    let response = update::handle(pool, user.id, note_id, command).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(pool), fields(user_id = user.id))]
async fn delete_note(
    State(pool): State<PgPool>,
    Extension(user): Extension<CurrentUser>,
    Path(note_id): Path<i64>,
) -> Result<Response, NoteApiError> {
    let response = delete::handle(pool, user.id, note_id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

/// Unified error type for note API endpoints
#[derive(Debug)]
enum NoteApiError {
    Create(CreateNoteError),
    Update(UpdateNoteError),
    Delete(DeleteNoteError),
    Get(GetNoteError),
    List(ListNotesError),
}

impl From<CreateNoteError> for NoteApiError {
    fn from(err: CreateNoteError) -> Self {
        Self::Create(err)
    }
}

impl From<UpdateNoteError> for NoteApiError {
    fn from(err: UpdateNoteError) -> Self {
        Self::Update(err)
    }
}

impl From<DeleteNoteError> for NoteApiError {
    fn from(err: DeleteNoteError) -> Self {
        Self::Delete(err)
    }
}

impl From<GetNoteError> for NoteApiError {
    fn from(err: GetNoteError) -> Self {
        Self::Get(err)
    }
}

impl From<ListNotesError> for NoteApiError {
    fn from(err: ListNotesError) -> Self {
        Self::List(err)
    }
}

impl IntoResponse for NoteApiError {
    fn into_response(self) -> Response {
        match self {
            NoteApiError::Create(CreateNoteError::TitleRequired)
            | NoteApiError::Update(UpdateNoteError::NoFieldsToUpdate) => {
                let error = ErrorResponse::new("VALIDATION_ERROR", self.message());
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            }
            NoteApiError::List(ListNotesError::InvalidCategoryFilter(_)) => {
                let error = ErrorResponse::new("VALIDATION_ERROR", self.message());
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            }
            NoteApiError::Update(UpdateNoteError::NotFoundOrNotOwned)
            | NoteApiError::Delete(DeleteNoteError::NotFoundOrNotOwned)
            | NoteApiError::Get(GetNoteError::NotFoundOrNotOwned) => {
                let error = ErrorResponse::new("NOT_FOUND", self.message());
                (StatusCode::NOT_FOUND, Json(error)).into_response()
            }
            NoteApiError::Create(CreateNoteError::Database(_))
            | NoteApiError::Update(UpdateNoteError::Database(_))
            | NoteApiError::Delete(DeleteNoteError::Database(_))
            | NoteApiError::Get(GetNoteError::Database(_))
            | NoteApiError::List(ListNotesError::Database(_)) => {
                tracing::error!("Database error in notes API: {}", self.message());
                let error = ErrorResponse::new("INTERNAL_ERROR", "A database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            }
        }
    }
}

impl NoteApiError {
    fn message(&self) -> String {
        match self {
            NoteApiError::Create(err) => err.to_string(),
            NoteApiError::Update(err) => err.to_string(),
            NoteApiError::Delete(err) => err.to_string(),
            NoteApiError::Get(err) => err.to_string(),
            NoteApiError::List(err) => err.to_string(),
        }
    }
}
