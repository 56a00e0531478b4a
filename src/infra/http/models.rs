//! Wire DTOs and request extractors.

use std::str::FromStr;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::{Deserialize, Serialize};

use crate::domain::types::ContentKind;

use super::error::ApiError;

const USER_ID_HEADER: &str = "user-id";

/// Caller identity from the `user-id` header. Opaque; no authentication is
/// implied.
#[derive(Debug, Clone)]
pub struct OwnerId(pub String);

impl<S> FromRequestParts<S> for OwnerId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(ApiError::missing_user_id)?;
        Ok(OwnerId(value.to_string()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub content_id: Option<String>,
    pub content_type: Option<String>,
}

impl AddItemRequest {
    /// Field presence and kind spelling are checked here so malformed input
    /// maps to 400 before any engine call.
    pub fn validate(self) -> Result<(String, ContentKind), ApiError> {
        let content_id = self
            .content_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ApiError::invalid_input("contentId is required"))?;

        let content_type = self
            .content_type
            .ok_or_else(|| ApiError::invalid_input("contentType is required"))?;
        let kind = ContentKind::from_str(&content_type)
            .map_err(|err| ApiError::invalid_input(err.to_string()))?;

        Ok((content_id, kind))
    }
}

#[derive(Debug, Deserialize)]
pub struct ItemsQuery {
    pub page: Option<i64>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovedResponse {
    pub content_id: String,
    pub removed: bool,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
