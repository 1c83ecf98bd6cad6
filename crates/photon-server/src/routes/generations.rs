//! Generation endpoints: submit, list, fetch-by-id.

use std::io::Write;
use std::path::Path;

use axum::{
    extract::{Multipart, Path as UrlPath, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use photon_client::GenerateParams;
use photon_store::GenerationRecord;
use photon_types::GenerationItem;

use crate::error::ServerError;
use crate::state::AppState;

/// How many recent generations a re-sync pulls from the vendor.
const SYNC_LIMIT: u32 = 10;

// ─────────────────────────────────────────────────────────────────────────────
// Types
// ─────────────────────────────────────────────────────────────────────────────

/// Response to a submitted generation.
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Vendor-assigned job id.
    pub id: String,
}

/// Query parameters for listing generations.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Offset into the vendor's list.
    #[serde(default)]
    pub offset: u32,
    /// Page size.
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    SYNC_LIMIT
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/generate — submit a prompt with an optional starting image.
///
/// Multipart form fields: `user_prompt` (required), `image` (optional file),
/// `expand_prompt` (optional bool).
pub async fn generate_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<GenerateResponse>, ServerError> {
    let mut prompt: Option<String> = None;
    let mut expand_prompt = false;
    // The temp file must outlive the vendor call; the image is re-read from
    // disk during the signed upload.
    let mut image: Option<tempfile::NamedTempFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(e.to_string()))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match name.as_str() {
            "user_prompt" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ServerError::BadRequest(e.to_string()))?;
                prompt = Some(text);
            }
            "expand_prompt" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ServerError::BadRequest(e.to_string()))?;
                expand_prompt = parse_form_bool(&text)?;
            }
            "image" => {
                let suffix = field
                    .file_name()
                    .map(file_suffix)
                    .unwrap_or_default();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ServerError::BadRequest(e.to_string()))?;

                let mut tmp = tempfile::Builder::new()
                    .suffix(&suffix)
                    .tempfile()
                    .map_err(|e| ServerError::Internal(e.to_string()))?;
                tmp.write_all(&bytes)
                    .map_err(|e| ServerError::Internal(e.to_string()))?;
                image = Some(tmp);
            }
            other => {
                debug!(field = other, "Ignoring unknown multipart field");
            }
        }
    }

    let prompt = prompt
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ServerError::BadRequest("user_prompt is required".to_string()))?;

    let mut params = GenerateParams::new(prompt).with_expand_prompt(expand_prompt);
    if let Some(ref tmp) = image {
        params = params.with_start_image(tmp.path());
    }

    let id = state.client.generate(&params).await?;
    info!(%id, "Generation submitted");
    Ok(Json(GenerateResponse { id }))
}

/// GET /api/v1/generations — pass-through list, vendor order, unfiltered.
pub async fn list_generations_handler(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<GenerationItem>>, ServerError> {
    let items = state
        .client
        .list_generations(query.offset, query.limit)
        .await?;
    Ok(Json(items))
}

/// GET /api/v1/generations/{id} — re-sync the cache, then look the id up.
pub async fn get_generation_handler(
    State(state): State<AppState>,
    UrlPath(id): UrlPath<String>,
) -> Result<Json<GenerationRecord>, ServerError> {
    // Full re-sync: pull the recent list and cache anything finished.
    let items = state.client.list_generations(0, SYNC_LIMIT).await?;
    state.store.record_completed(&items)?;

    let record = state.store.find_by_id(&id)?.ok_or_else(|| {
        ServerError::NotFound(format!("generation {id} is unknown or still rendering"))
    })?;
    Ok(Json(record))
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn parse_form_bool(text: &str) -> Result<bool, ServerError> {
    match text.to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Ok(true),
        "false" | "0" | "off" | "no" | "" => Ok(false),
        other => Err(ServerError::BadRequest(format!(
            "expand_prompt must be a boolean, got {other:?}"
        ))),
    }
}

/// Extension of an uploaded filename, dot included, for the temp file.
fn file_suffix(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_form_bool_accepts_form_spellings() {
        assert!(parse_form_bool("true").unwrap());
        assert!(parse_form_bool("ON").unwrap());
        assert!(!parse_form_bool("false").unwrap());
        assert!(!parse_form_bool("").unwrap());
        assert!(parse_form_bool("maybe").is_err());
    }

    #[test]
    fn test_file_suffix_keeps_extension_only() {
        assert_eq!(file_suffix("cat photo.PNG"), ".PNG");
        assert_eq!(file_suffix("noext"), "");
    }
}
