use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    db::{settings_store::SettingsStore, user_store::UserStore},
    error::{AppError, Result},
    handlers::AppState,
    models::user::{
        ChangePasswordRequest, NewUserRequest, SetPasswordRequest, UpdateUserRequest, UserDto,
    },
    services::auth_service::{self, AuthUser},
};

/// List all users, admin only
pub async fn list_users(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    auth.require_admin()?;

    let users = UserStore::new(state.pool.clone()).get_all_users().await?;
    let dtos: Vec<UserDto> = users.into_iter().map(UserDto::from).collect();
    Ok((StatusCode::OK, Json(dtos)))
}

pub async fn get_user(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    auth.require_admin()?;

    let user = UserStore::new(state.pool.clone()).get_user_by_id(id).await?;
    Ok((StatusCode::OK, Json(UserDto::from(user))))
}

/// Admin-side user creation, any role allowed
pub async fn create_user(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(request): Json<NewUserRequest>,
) -> Result<impl IntoResponse> {
    auth.require_admin()?;

    if !auth_service::is_valid_email(&request.email) {
        return Err(AppError::BadRequest("invalid email address".into()));
    }
    if !auth_service::is_password_strong(&request.password) {
        return Err(AppError::BadRequest(
            "password must be at least 8 characters with one uppercase letter and one special character".into(),
        ));
    }

    let password_hash = auth_service::hash_password(&request.password)?;
    let store = UserStore::new(state.pool.clone());
    let user = store.create_user(&request, &password_hash).await?;

    SettingsStore::new(state.pool.clone())
        .seed_defaults(user.id)
        .await?;

    Ok((StatusCode::CREATED, Json(UserDto::from(user))))
}

pub async fn update_user(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse> {
    auth.require_admin()?;

    if !auth_service::is_valid_email(&request.email) {
        return Err(AppError::BadRequest("invalid email address".into()));
    }

    let user = UserStore::new(state.pool.clone())
        .update_user(id, &request)
        .await?;
    Ok((StatusCode::OK, Json(UserDto::from(user))))
}

/// Admin-side password reset for an arbitrary account
pub async fn set_user_password(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<SetPasswordRequest>,
) -> Result<impl IntoResponse> {
    auth.require_admin()?;

    if !auth_service::is_password_strong(&request.password) {
        return Err(AppError::BadRequest(
            "password must be at least 8 characters with one uppercase letter and one special character".into(),
        ));
    }

    let password_hash = auth_service::hash_password(&request.password)?;
    UserStore::new(state.pool.clone())
        .set_password(id, &password_hash)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Soft-delete a user, admin only
pub async fn delete_user(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    auth.require_admin()?;

    UserStore::new(state.pool.clone()).delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Self-service password change, requires the current password
pub async fn change_own_password(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse> {
    let store = UserStore::new(state.pool.clone());
    let user = store.get_user_by_id(auth.id).await?;

    if !auth_service::verify_password(&request.current_password, &user.password_hash)? {
        return Err(AppError::Auth("current password is incorrect".into()));
    }
    if !auth_service::is_password_strong(&request.new_password) {
        return Err(AppError::BadRequest(
            "password must be at least 8 characters with one uppercase letter and one special character".into(),
        ));
    }

    let password_hash = auth_service::hash_password(&request.new_password)?;
    store.set_password(user.id, &password_hash).await?;

    Ok(StatusCode::NO_CONTENT)
}
