use actix_multipart::Multipart;
use actix_web::web;
use futures_util::TryStreamExt;

use crate::api::{error, success};
use crate::modules::photo::model::{IncomingFile, PhotoQuery, UpdatePhotoModel, UploadReport};
use crate::modules::photo::schema::PhotoEntity;
use crate::modules::photo::service::PhotoService;
use crate::utils::{IdQuery, ValidatedJson, ValidatedQuery};

const FILES_FIELD: &str = "files";

/// Upload photos handler
pub async fn upload_photos(
    mut payload: Multipart,
    service: web::Data<PhotoService>,
) -> Result<success::Success<UploadReport>, error::Error> {
    let config = service.config();
    let max_file_size = config.max_file_size;
    let mut files = Vec::new();

    // Process multipart form data
    while let Some(mut field) = payload.try_next().await.map_err(|e| {
        log::warn!("Malformed multipart payload: {}", e);
        error::Error::bad_request("Malformed multipart payload")
    })? {
        if field.name() != Some(FILES_FIELD) {
            continue;
        }
        if files.len() >= config.max_files {
            return Err(error::Error::bad_request(config.too_many_files()));
        }

        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .ok_or_else(|| error::Error::bad_request("Missing filename"))?
            .to_string();

        // Detect MIME type
        let mime_type = field
            .content_type()
            .map(|m| m.essence_str().to_string())
            .filter(|m| m != "application/octet-stream")
            .unwrap_or_else(|| mime_guess::from_path(&filename).first_or_octet_stream().to_string());

        // Read file bytes, keeping at most one byte past the ceiling
        let mut size = 0usize;
        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(|e| {
            log::warn!("Upload of '{}' interrupted: {}", filename, e);
            error::Error::bad_request("Upload interrupted")
        })? {
            size += chunk.len();
            if bytes.len() <= max_file_size {
                bytes.extend_from_slice(&chunk);
            }
        }

        files.push(IncomingFile { filename, mime_type, size, bytes });
    }

    let report = service.upload_batch(files).await?;
    let message = if report.rejected.is_empty() {
        format!("{} file(s) uploaded successfully", report.files.len())
    } else {
        format!(
            "{} file(s) uploaded successfully, {} rejected",
            report.files.len(),
            report.rejected.len()
        )
    };

    Ok(success::Success::created(Some(report)).message(message))
}

pub async fn list_photos(
    service: web::Data<PhotoService>,
    query: ValidatedQuery<PhotoQuery>,
) -> Result<success::Success<Vec<PhotoEntity>>, error::Error> {
    let photos = service.list(&query.0).await?;
    Ok(success::Success::ok(Some(photos)))
}

pub async fn list_public_photos(
    service: web::Data<PhotoService>,
    query: ValidatedQuery<PhotoQuery>,
) -> Result<success::Success<Vec<PhotoEntity>>, error::Error> {
    let photos = service.list_public(&query.0).await?;
    Ok(success::Success::ok(Some(photos)))
}

pub async fn update_photo(
    service: web::Data<PhotoService>,
    body: ValidatedJson<UpdatePhotoModel>,
) -> Result<success::Success<PhotoEntity>, error::Error> {
    let photo = service.update(body.0).await?;
    Ok(success::Success::ok(Some(photo)).message("Photo updated successfully"))
}

pub async fn delete_photo(
    service: web::Data<PhotoService>,
    query: ValidatedQuery<IdQuery>,
) -> Result<success::Success<()>, error::Error> {
    service.delete(&query.0.id).await?;
    Ok(success::Success::ok(None).message("Photo deleted successfully"))
}

/// Serves a stored upload by its generated name.
pub async fn serve_upload(
    service: web::Data<PhotoService>,
    name: web::Path<String>,
) -> Result<actix_web::HttpResponse, error::Error> {
    let name = name.into_inner();
    if name.is_empty() || name.contains('/') || name.contains('\\') || name.starts_with('.') {
        return Err(error::Error::not_found("File not found"));
    }

    let path = std::path::Path::new(&service.config().upload_dir).join(&name);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(error::Error::not_found("File not found"));
        }
        Err(e) => return Err(error::SystemError::from(e).into()),
    };

    let mime = mime_guess::from_path(&path).first_or_octet_stream();
    Ok(actix_web::HttpResponse::Ok().content_type(mime.to_string()).body(bytes))
}
