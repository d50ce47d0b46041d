//! Image handlers and the shared multipart helper.

use axum::{
    extract::{Multipart, Path, State},
    routing::delete,
    Router,
};

use crate::api::AppState;
use crate::errors::{AppError, AppResult};
use crate::types::NoContent;

/// Create image routes
pub fn image_routes() -> Router<AppState> {
    Router::new().route("/:id", delete(delete_image))
}

/// Pull the first file field out of a multipart body.
///
/// Returns the payload and the client-supplied file name.
pub(crate) async fn read_upload(multipart: &mut Multipart) -> AppResult<(Vec<u8>, String)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(e.to_string()))?
    {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::bad_request(e.to_string()))?;
        return Ok((data.to_vec(), file_name));
    }

    Err(AppError::validation("Invalid file."))
}

/// Delete an uploaded image (row and file)
#[utoipa::path(
    delete,
    path = "/api/images/{id}",
    tag = "Images",
    params(("id" = i32, Path, description = "Image id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Image deleted"),
        (status = 404, description = "Image not found")
    )
)]
pub async fn delete_image(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<NoContent> {
    state.upload_service.delete_image(id).await?;
    Ok(NoContent)
}
