use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    db::settings_store::SettingsStore,
    error::{AppError, Result},
    handlers::AppState,
    models::settings::UpsertSettingRequest,
    services::auth_service::AuthUser,
};

/// The calling user's preference flags
pub async fn list_settings(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    let settings = SettingsStore::new(state.pool.clone())
        .list_for_user(auth.id)
        .await?;
    Ok((StatusCode::OK, Json(settings)))
}

/// Set or update one preference flag
pub async fn upsert_setting(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(request): Json<UpsertSettingRequest>,
) -> Result<impl IntoResponse> {
    if request.setting_name.trim().is_empty() {
        return Err(AppError::BadRequest("setting name is required".into()));
    }

    let setting = SettingsStore::new(state.pool.clone())
        .upsert(auth.id, request.setting_name.trim(), request.setting_value)
        .await?;
    Ok((StatusCode::OK, Json(setting)))
}
