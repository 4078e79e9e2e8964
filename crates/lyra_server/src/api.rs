use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use lyra_core::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auth::{Admin, is_admin};
use crate::state::AppState;

pub struct ApiError(anyhow::Error);

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.0
            .downcast_ref::<PlatformError>()
            .map(|platform_err| match platform_err {
                PlatformError::NotFound(_) => (StatusCode::NOT_FOUND, platform_err.to_string()),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, platform_err.to_string()),
            })
            .unwrap_or_else(|| {
                self.0
                    .downcast_ref::<Forbidden>()
                    .map(|forbidden| (StatusCode::FORBIDDEN, forbidden.to_string()))
                    .unwrap_or((
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Internal Server Error: {}", self.0),
                    ))
            })
            .into_response()
    }
}

#[derive(Debug)]
pub(crate) struct Forbidden(pub String);

impl std::fmt::Display for Forbidden {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Missing permission: {}", self.0)
    }
}

impl std::error::Error for Forbidden {}

/// The public role must hold `{content_type}.{action}` for the read to go
/// through.
async fn ensure_public_action<P: ContentPlatform + SettingsStore>(
    state: &AppState<P>,
    content_type: &str,
    action: &str,
) -> Result<(), ApiError> {
    let public_role = state.platform.find_role("public").await?;
    let permissions = state.platform.find_permissions(public_role.id).await?;
    let wanted = format!("{content_type}.{action}");
    if permissions
        .iter()
        .any(|permission| permission.action == wanted)
    {
        Ok(())
    } else {
        Err(ApiError::from(Forbidden(format!(
            "'{wanted}' is not granted to the public role"
        ))))
    }
}

/// GET /roles/{role_type}
pub async fn find_role<P: ContentPlatform + SettingsStore>(
    State(state): State<AppState<P>>,
    _admin: Admin,
    Path(role_type): Path<String>,
) -> Result<Json<Role>, ApiError> {
    Ok(Json(state.platform.find_role(&role_type).await?))
}

/// GET /roles/{id}/permissions
pub async fn role_permissions<P: ContentPlatform + SettingsStore>(
    State(state): State<AppState<P>>,
    _admin: Admin,
    Path(id): Path<u64>,
) -> Result<Json<Vec<Permission>>, ApiError> {
    Ok(Json(state.platform.find_permissions(id).await?))
}

#[derive(Deserialize)]
pub struct CreatePermissionRequest {
    pub action: String,
    pub role: u64,
}

/// POST /permissions
pub async fn create_permission<P: ContentPlatform + SettingsStore>(
    State(state): State<AppState<P>>,
    _admin: Admin,
    Json(req): Json<CreatePermissionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let permission = state
        .platform
        .create_permission(&req.action, req.role)
        .await?;
    Ok((StatusCode::CREATED, Json(permission)))
}

/// GET /files/{name}
pub async fn find_file<P: ContentPlatform + SettingsStore>(
    State(state): State<AppState<P>>,
    _admin: Admin,
    Path(name): Path<String>,
) -> Result<Response, ApiError> {
    match state.platform.find_file(&name).await? {
        Some(asset) => Ok(Json(asset).into_response()),
        None => Ok((StatusCode::NOT_FOUND, "File not found").into_response()),
    }
}

#[derive(Deserialize)]
pub struct UploadParams {
    #[serde(default)]
    pub ext: String,
    pub alt: Option<String>,
    pub caption: Option<String>,
}

/// POST /files/{name}
///
/// Raw bytes in the body; MIME type from the `Content-Type` header.
pub async fn upload_file<P: ContentPlatform + SettingsStore>(
    State(state): State<AppState<P>>,
    _admin: Admin,
    Path(name): Path<String>,
    Query(params): Query<UploadParams>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let mime = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();

    let info = FileInfo {
        name,
        alternative_text: params.alt,
        caption: params.caption,
        ext: params.ext,
        mime,
    };
    let asset = state.platform.upload_file(body, info).await?;
    Ok((StatusCode::CREATED, Json(asset)))
}

/// GET /content/{content_type}
pub async fn list_content<P: ContentPlatform + SettingsStore>(
    State(state): State<AppState<P>>,
    Path(content_type): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Vec<Record>>, ApiError> {
    if !is_admin(&state, &headers) {
        ensure_public_action(&state, &content_type, "find").await?;
    }
    Ok(Json(state.platform.find_records(&content_type).await?))
}

/// GET /content/{content_type}/{id}
pub async fn get_content<P: ContentPlatform + SettingsStore>(
    State(state): State<AppState<P>>,
    Path((content_type, id)): Path<(String, u64)>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    if !is_admin(&state, &headers) {
        ensure_public_action(&state, &content_type, "find-one").await?;
    }
    match state.platform.find_record(&content_type, id).await? {
        Some(record) => Ok(Json(record).into_response()),
        None => Ok((StatusCode::NOT_FOUND, "Record not found").into_response()),
    }
}

/// POST /content/{content_type}
pub async fn create_content<P: ContentPlatform + SettingsStore>(
    State(state): State<AppState<P>>,
    _admin: Admin,
    Path(content_type): Path<String>,
    Json(data): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let record = state.platform.create_record(&content_type, data).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[derive(Serialize, Deserialize)]
pub struct FlagValue {
    pub value: Option<bool>,
}

/// GET /settings/{namespace}/{key}
pub async fn get_flag<P: ContentPlatform + SettingsStore>(
    State(state): State<AppState<P>>,
    _admin: Admin,
    Path((namespace, key)): Path<(String, String)>,
) -> Result<Json<FlagValue>, ApiError> {
    let value = state.platform.get_flag(&namespace, &key).await?;
    Ok(Json(FlagValue { value }))
}

/// PUT /settings/{namespace}/{key}
pub async fn set_flag<P: ContentPlatform + SettingsStore>(
    State(state): State<AppState<P>>,
    _admin: Admin,
    Path((namespace, key)): Path<(String, String)>,
    Json(flag): Json<FlagValue>,
) -> Result<StatusCode, ApiError> {
    state
        .platform
        .set_flag(&namespace, &key, flag.value.unwrap_or(false))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
