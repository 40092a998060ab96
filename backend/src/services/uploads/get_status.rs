use crate::error::UploadError;
use crate::upload_controller::state::UploadsState;
use actix_web::{web, HttpResponse};
use common::requests::UploadStatusResponse;

pub(crate) async fn process(
    upload_id: web::Path<String>,
    state: web::Data<UploadsState>,
) -> Result<HttpResponse, UploadError> {
    let upload_id = upload_id.into_inner();
    let record = state.get(&upload_id).await.ok_or(UploadError::NotFound)?;
    Ok(HttpResponse::Ok().json(UploadStatusResponse {
        upload_id,
        status: record.status,
        filename: Some(record.filename),
    }))
}
