use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;

use crate::{
    db::{settings_store::SettingsStore, user_store::UserStore},
    error::{AppError, Result},
    handlers::AppState,
    models::user::{
        LoginRequest, LoginResponse, NewUserRequest, RegisterRequest, ResetPasswordRequest, Role,
        UserDto,
    },
    services::auth_service,
};

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Handler for account registration
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    if request.first_name.trim().is_empty() || request.last_name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "first and last name are required".into(),
        ));
    }
    if !auth_service::is_valid_email(&request.email) {
        return Err(AppError::BadRequest("invalid email address".into()));
    }
    if !auth_service::is_password_strong(&request.password) {
        return Err(AppError::BadRequest(
            "password must be at least 8 characters with one uppercase letter and one special character".into(),
        ));
    }
    if request.password != request.confirm_password {
        return Err(AppError::BadRequest("passwords do not match".into()));
    }
    // Admin accounts are provisioned by an existing admin, never self-registered
    if request.role == Role::Admin {
        return Err(AppError::Forbidden(
            "cannot self-register an admin account".into(),
        ));
    }

    let password_hash = auth_service::hash_password(&request.password)?;
    let store = UserStore::new(state.pool.clone());
    let user = store
        .create_user(
            &NewUserRequest {
                first_name: request.first_name.trim().to_string(),
                last_name: request.last_name.trim().to_string(),
                email: request.email.trim().to_string(),
                password: String::new(),
                role: request.role,
            },
            &password_hash,
        )
        .await?;

    SettingsStore::new(state.pool.clone())
        .seed_defaults(user.id)
        .await?;

    Ok((StatusCode::CREATED, Json(UserDto::from(user))))
}

/// Handler for credential login, returns a session token
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let store = UserStore::new(state.pool.clone());

    // Only active accounts can log in; soft-deleted ones fall through
    // to the same rejection as a wrong password
    let user = store
        .get_user_by_email(request.email.trim())
        .await?
        .ok_or_else(|| AppError::Auth("invalid email or password".into()))?;

    if !auth_service::verify_password(&request.password, &user.password_hash)? {
        return Err(AppError::Auth("invalid email or password".into()));
    }

    let token = auth_service::issue_token(
        &user,
        &state.config.jwt_secret,
        state.config.token_expiry_hours,
    )?;

    tracing::info!(user_id = user.id, "login");

    Ok((
        StatusCode::OK,
        Json(LoginResponse {
            token,
            user: UserDto::from(user),
        }),
    ))
}

/// Handler for the forgot-password flow
pub async fn reset_password(
    State(state): State<AppState>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<impl IntoResponse> {
    if !auth_service::is_valid_email(&request.email) {
        return Err(AppError::BadRequest("invalid email address".into()));
    }
    if !auth_service::is_password_strong(&request.new_password) {
        return Err(AppError::BadRequest(
            "password must be at least 8 characters with one uppercase letter and one special character".into(),
        ));
    }
    if request.new_password != request.confirm_password {
        return Err(AppError::BadRequest("passwords do not match".into()));
    }

    let store = UserStore::new(state.pool.clone());
    let user = store
        .get_user_by_email(request.email.trim())
        .await?
        .ok_or_else(|| {
            AppError::BadRequest("email not found or account is inactive".into())
        })?;

    let password_hash = auth_service::hash_password(&request.new_password)?;
    store.set_password(user.id, &password_hash).await?;

    Ok((
        StatusCode::OK,
        Json(MessageResponse {
            message: "password reset successfully".into(),
        }),
    ))
}
