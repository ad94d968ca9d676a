use crate::{
    auth::middleware::AuthUser,
    types::{AppError, Result},
    utils::prefs::Preferences,
    AppState,
};
use axum::{extract::State, Json};
use serde::Deserialize;
use utoipa::ToSchema;

/// Partial preference update; absent fields keep their current value.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SettingsUpdate {
    pub theme: Option<String>,
    pub font_size: Option<u8>,
    pub last_email: Option<String>,
}

/// Current persisted preferences of the calling account
#[utoipa::path(
    get,
    path = "/api/settings",
    responses((status = 200, description = "Current preferences", body = Preferences)),
    tag = "settings"
)]
pub async fn get_settings(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Json<Preferences> {
    Json(state.prefs.get(&claims.sub))
}

/// Update preferences, persisting immediately
#[utoipa::path(
    put,
    path = "/api/settings",
    request_body = SettingsUpdate,
    responses((status = 200, description = "Updated preferences", body = Preferences)),
    tag = "settings"
)]
pub async fn update_settings(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(payload): Json<SettingsUpdate>,
) -> Result<Json<Preferences>> {
    let updated = state
        .prefs
        .update(&claims.sub, |prefs| {
            if let Some(theme) = payload.theme {
                prefs.theme = theme;
            }
            if let Some(font_size) = payload.font_size {
                prefs.font_size = font_size;
            }
            if let Some(last_email) = payload.last_email {
                prefs.last_email = Some(last_email);
            }
        })
        .map_err(|e| AppError::Internal(format!("Failed to persist preferences: {}", e)))?;

    Ok(Json(updated))
}
