use crate::auth::AdminIdentity;
use crate::error::{HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct DeleteUploadRequest {
    pub file_url: String,
    /// Section list of the owning content, as a JSON array or a string holding one
    #[serde(default)]
    pub detail_sections: Option<Value>,
    /// Delete only `file_url`, for images stored without a thumbnail
    #[serde(default)]
    pub original_only: bool,
}

#[derive(Debug, Serialize)]
pub struct DeleteUploadResponse {
    pub success: bool,
    /// Whether `file_url` pointed into our store and was removed
    pub deleted: bool,
    pub section_images_deleted: usize,
}

fn sections_json(sections: &Value) -> String {
    match sections {
        Value::String(raw) => raw.clone(),
        other => other.to_string(),
    }
}

/// Remove an uploaded image, its thumbnail and any images embedded in sections
#[tracing::instrument(skip(state, request), fields(admin = %admin.username, file_url = %request.file_url))]
pub async fn delete_upload(
    State(state): State<Arc<AppState>>,
    admin: AdminIdentity,
    ValidatedJson(request): ValidatedJson<DeleteUploadRequest>,
) -> Result<Json<DeleteUploadResponse>, HttpAppError> {
    let deleted = if request.original_only {
        state
            .cleanup
            .delete_original_if_owned(&request.file_url)
            .await?
    } else {
        state.cleanup.delete_if_owned(&request.file_url).await?
    };

    let section_images_deleted = match &request.detail_sections {
        Some(sections) => {
            state
                .cleanup
                .delete_from_embedded_sections(&sections_json(sections))
                .await
        }
        None => 0,
    };

    Ok(Json(DeleteUploadResponse {
        success: true,
        deleted,
        section_images_deleted,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_accept_string_or_array() {
        let raw = r#"[{"image_url":"https://cdn.example.com/a.webp"}]"#;

        assert_eq!(sections_json(&Value::String(raw.to_string())), raw);
        let parsed: Value = serde_json::from_str(raw).unwrap();
        assert_eq!(sections_json(&parsed), raw);
    }
}
