//! Category API routes
//!
//! - `POST /categories` - Create a category
//! - `GET /categories` - List the caller's categories
//! - `DELETE /categories/:id` - Delete a category, unlinking its notes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get},
    Extension, Json, Router,
};
use sqlx::PgPool;

use crate::api::response::{ApiResponse, ErrorResponse};
use crate::auth::CurrentUser;

use super::commands::{
    create::{self, CreateCategoryCommand, CreateCategoryError},
    delete::{self as delete_command, DeleteCategoryError},
};
use super::queries::list::{self, ListCategoriesError};

/// Creates the categories router
pub fn categories_routes() -> Router<PgPool> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route("/:id", delete(delete_category))
}

#[tracing::instrument(skip(pool, command), fields(user_id = user.id))]
async fn create_category(
    State(pool): State<PgPool>,
    Extension(user): Extension<CurrentUser>,
    Json(command): Json<CreateCategoryCommand>,
) -> Result<Response, CategoryApiError> {
    let response = create::handle(pool, user.id, command).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(pool), fields(user_id = user.id))]
async fn list_categories(
    State(pool): State<PgPool>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Response, CategoryApiError> {
    let categories = list::handle(pool, user.id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(categories))).into_response())
}

#[tracing::instrument(skip(pool), fields(user_id = user.id))]
async fn delete_category(
    State(pool): State<PgPool>,
    Extension(user): Extension<CurrentUser>,
    Path(category_id): Path<i64>,
) -> Result<Response, CategoryApiError> {
    let response = delete_command::handle(pool, user.id, category_id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

/// Unified error type for category API endpoints
#[derive(Debug)]
enum CategoryApiError {
    Create(CreateCategoryError),
    Delete(DeleteCategoryError),
    List(ListCategoriesError),
}

impl From<CreateCategoryError> for CategoryApiError {
    fn from(err: CreateCategoryError) -> Self {
        Self::Create(err)
    }
}

impl From<DeleteCategoryError> for CategoryApiError {
    fn from(err: DeleteCategoryError) -> Self {
        Self::Delete(err)
    }
}

impl From<ListCategoriesError> for CategoryApiError {
    fn from(err: ListCategoriesError) -> Self {
        Self::List(err)
    }
}

impl IntoResponse for CategoryApiError {
    fn into_response(self) -> Response {
        match self {
            CategoryApiError::Create(CreateCategoryError::NameRequired) => {
                let error = ErrorResponse::new(
                    "VALIDATION_ERROR",
                    CreateCategoryError::NameRequired.to_string(),
                );
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            }
            CategoryApiError::Delete(DeleteCategoryError::NotFoundOrNotOwned) => {
                let error = ErrorResponse::new(
                    "NOT_FOUND",
                    DeleteCategoryError::NotFoundOrNotOwned.to_string(),
                );
                (StatusCode::NOT_FOUND, Json(error)).into_response()
            }
            CategoryApiError::Create(CreateCategoryError::Database(err))
            | CategoryApiError::Delete(DeleteCategoryError::Database(err))
            | CategoryApiError::List(ListCategoriesError::Database(err)) => {
                tracing::error!("Database error in categories API: {}", err);
                let error = ErrorResponse::new("INTERNAL_ERROR", "A database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            }
        }
    }
}
