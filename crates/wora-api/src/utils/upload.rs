//! Multipart parsing for the upload endpoint

use crate::constants::{DEFAULT_UPLOAD_FOLDER, FILE_FIELD, FOLDER_FIELD};
use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use wora_core::AppError;

/// File and folder read from an upload form
#[derive(Debug)]
pub struct MultipartUpload {
    pub data: Vec<u8>,
    pub filename: String,
    pub folder: String,
}

fn multipart_error(e: MultipartError, received: u64, max_file_size: u64) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::FileTooLarge {
            size: received,
            max: max_file_size,
        };
    }
    AppError::InvalidInput(format!("Failed to read multipart: {}", e))
}

/// Read the `file` and optional `folder` fields.
///
/// The file is read chunk by chunk and rejected as soon as it passes
/// `max_file_size`, without buffering the rest. Only one `file` field is
/// accepted.
pub async fn extract_multipart_upload(
    mut multipart: Multipart,
    max_file_size: u64,
) -> Result<MultipartUpload, AppError> {
    let mut file: Option<(Vec<u8>, String)> = None;
    let mut folder: Option<String> = None;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, 0, max_file_size))?
    {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some(FILE_FIELD) => {
                if file.is_some() {
                    return Err(AppError::InvalidInput(
                        "Multiple file fields are not allowed; send exactly one field named 'file'"
                            .to_string(),
                    ));
                }
                let filename = field.file_name().unwrap_or_default().to_string();

                let mut data = Vec::new();
                while let Some(chunk) = field
                    .chunk()
                    .await
                    .map_err(|e| multipart_error(e, data.len() as u64, max_file_size))?
                {
                    let size = (data.len() + chunk.len()) as u64;
                    if size > max_file_size {
                        return Err(AppError::FileTooLarge {
                            size,
                            max: max_file_size,
                        });
                    }
                    data.extend_from_slice(&chunk);
                }

                file = Some((data, filename));
            }
            Some(FOLDER_FIELD) => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| multipart_error(e, 0, max_file_size))?;
                folder = Some(value);
            }
            _ => {}
        }
    }

    let (data, filename) =
        file.ok_or_else(|| AppError::InvalidInput("No file uploaded".to_string()))?;

    let folder = folder
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
        .unwrap_or_else(|| DEFAULT_UPLOAD_FOLDER.to_string());

    Ok(MultipartUpload {
        data,
        filename,
        folder,
    })
}
