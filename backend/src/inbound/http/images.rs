//! Post image upload handler.
//!
//! ```text
//! PUT /api/v1/post-image?filename=cat.png&oldPath=images/1767225600000-dog.png
//! <raw image bytes>
//! ```

use actix_web::{HttpResponse, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{ImageUpload, ImageUploadOutcome};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, require_field};

const NO_FILE: &str = "No file provided.";
const STORED: &str = "File stored.";

/// Query string for an upload.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase")]
pub struct ImageUploadQuery {
    /// Client-side file name; stored under a timestamped variant. Required
    /// whenever the body carries bytes.
    pub filename: Option<String>,
    /// Previously stored image this upload replaces.
    pub old_path: Option<String>,
}

/// Upload result.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageUploadResponse {
    #[schema(example = "File stored.")]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "images/1767225600000-cat.png")]
    pub file_path: Option<String>,
}

/// Store an image for use in a post.
#[utoipa::path(
    put,
    path = "/api/v1/post-image",
    params(ImageUploadQuery),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 201, description = "Image stored", body = ImageUploadResponse),
        (status = 200, description = "No file in the request", body = ImageUploadResponse),
        (status = 400, description = "Missing or unusable file name", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "storeImage"
)]
#[put("/post-image")]
pub async fn store_image(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ImageUploadQuery>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    session.auth().require_authenticated()?;
    let ImageUploadQuery { filename, old_path } = query.into_inner();
    let bytes = (!body.is_empty()).then(|| body.to_vec());
    let file_name = if bytes.is_some() {
        require_field(filename, FieldName::new("filename"))?
    } else {
        filename.unwrap_or_default()
    };
    let upload = ImageUpload {
        file_name,
        bytes,
        old_path,
    };
    let response = match state.images.store(session.auth(), upload).await? {
        ImageUploadOutcome::NoFile => HttpResponse::Ok().json(ImageUploadResponse {
            message: NO_FILE.to_owned(),
            file_path: None,
        }),
        ImageUploadOutcome::Stored(image) => HttpResponse::Created().json(ImageUploadResponse {
            message: STORED.to_owned(),
            file_path: Some(image.into()),
        }),
    };
    Ok(response)
}
