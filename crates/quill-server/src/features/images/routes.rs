//! Image API routes
//!
//! Mounted inside the notes router:
//!
//! - `POST /notes/:id/images` - Upload an image (multipart field `image`)
//! - `GET /notes/:id/images` - List a note's images
//! - `DELETE /notes/:id/images/:image_id` - Delete an image

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, post},
    Extension, Json, Router,
};

use crate::api::response::{ApiResponse, ErrorResponse};
use crate::auth::CurrentUser;

use super::commands::{
    delete::{self as delete_command, DeleteImageError},
    upload::{self, UploadImageCommand, UploadImageError},
};
use super::queries::list::{self, ListImagesError};
use super::ImagesState;

/// Creates the images router, with paths relative to `/notes`
pub fn images_routes() -> Router<ImagesState> {
    Router::new()
        .route("/:id/images", post(upload_image).get(list_images))
        .route("/:id/images/:image_id", delete(delete_image))
}

#[tracing::instrument(skip(state, multipart), fields(user_id = user.id))]
async fn upload_image(
    State(state): State<ImagesState>,
    Extension(user): Extension<CurrentUser>,
    Path(note_id): Path<i64>,
    mut multipart: Multipart,
) -> Result<Response, ImageApiError> {
    let mut command = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ImageApiError::InvalidMultipart)?
    {
        if field.name() == Some("image") {
            let filename = field.file_name().unwrap_or("upload").to_string();
            let content = field
                .bytes()
                .await
                .map_err(|_| ImageApiError::InvalidMultipart)?
                .to_vec();
            command = Some(UploadImageCommand { filename, content });
            break;
        }
    }

    let command = command.ok_or(ImageApiError::Upload(UploadImageError::FileRequired))?;
    let response = upload::handle(state.db, state.uploads, user.id, note_id, command).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(state), fields(user_id = user.id))]
async fn list_images(
    State(state): State<ImagesState>,
    Extension(user): Extension<CurrentUser>,
    Path(note_id): Path<i64>,
) -> Result<Response, ImageApiError> {
    let images = list::handle(state.db, user.id, note_id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(images))).into_response())
}

#[tracing::instrument(skip(state), fields(user_id = user.id))]
async fn delete_image(
    State(state): State<ImagesState>,
    Extension(user): Extension<CurrentUser>,
    Path((note_id, image_id)): Path<(i64, i64)>,
) -> Result<Response, ImageApiError> {
    let response =
        delete_command::handle(state.db, state.uploads, user.id, note_id, image_id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

/// Unified error type for image API endpoints
#[derive(Debug)]
enum ImageApiError {
    InvalidMultipart,
    Upload(UploadImageError),
    Delete(DeleteImageError),
    List(ListImagesError),
}

impl From<UploadImageError> for ImageApiError {
    fn from(err: UploadImageError) -> Self {
        Self::Upload(err)
    }
}

impl From<DeleteImageError> for ImageApiError {
    fn from(err: DeleteImageError) -> Self {
        Self::Delete(err)
    }
}

impl From<ListImagesError> for ImageApiError {
    fn from(err: ListImagesError) -> Self {
        Self::List(err)
    }
}

impl IntoResponse for ImageApiError {
    fn into_response(self) -> Response {
        match self {
            ImageApiError::InvalidMultipart => {
                let error = ErrorResponse::new("VALIDATION_ERROR", "Invalid multipart request");
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            }
            ImageApiError::Upload(UploadImageError::FileRequired) => {
                let error = ErrorResponse::new(
                    "VALIDATION_ERROR",
                    UploadImageError::FileRequired.to_string(),
                );
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            }
            ImageApiError::Upload(UploadImageError::NoteNotFoundOrNotOwned)
            | ImageApiError::Delete(DeleteImageError::NoteNotFoundOrNotOwned)
            | ImageApiError::List(ListImagesError::NoteNotFoundOrNotOwned) => {
                let error = ErrorResponse::new(
                    "NOT_FOUND",
                    UploadImageError::NoteNotFoundOrNotOwned.to_string(),
                );
                (StatusCode::NOT_FOUND, Json(error)).into_response()
            }
            ImageApiError::Delete(DeleteImageError::ImageNotFound) => {
                let error =
                    ErrorResponse::new("NOT_FOUND", DeleteImageError::ImageNotFound.to_string());
                (StatusCode::NOT_FOUND, Json(error)).into_response()
            }
            ImageApiError::Upload(UploadImageError::Storage(err)) => {
                tracing::error!("Failed to store uploaded image: {}", err);
                let error = ErrorResponse::new("INTERNAL_ERROR", "Failed to save image");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            }
            ImageApiError::Upload(UploadImageError::Database(err))
            | ImageApiError::Delete(DeleteImageError::Database(err))
            | ImageApiError::List(ListImagesError::Database(err)) => {
                tracing::error!("Database error in images API: {}", err);
                let error = ErrorResponse::new("INTERNAL_ERROR", "A database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            }
        }
    }
}
