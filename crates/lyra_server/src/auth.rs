use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, StatusCode, request::Parts},
};
use lyra_core::traits::{ContentPlatform, SettingsStore};

use crate::state::AppState;

/// Marker extractor: the request carries the configured admin token, or no
/// token is configured at all.
#[derive(Clone, Debug)]
pub struct Admin;

pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .map(|value| value.strip_prefix("Bearer ").unwrap_or(value).trim())
}

pub(crate) fn is_admin<P>(state: &AppState<P>, headers: &HeaderMap) -> bool
where
    P: ContentPlatform + SettingsStore,
{
    match &state.admin_token {
        None => true,
        Some(expected) => bearer_token(headers) == Some(expected.as_str()),
    }
}

impl<P> FromRequestParts<AppState<P>> for Admin
where
    P: ContentPlatform + SettingsStore,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<P>,
    ) -> Result<Self, Self::Rejection> {
        if is_admin(state, &parts.headers) {
            Ok(Admin)
        } else {
            Err((StatusCode::UNAUTHORIZED, "Unauthorized".to_string()))
        }
    }
}
