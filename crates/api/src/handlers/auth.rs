//! Handlers for the `/auth` resource (register, login, profile).
//!
//! The handlers do the lookups and credential work; the verdicts come from
//! the pure validators in `suds_core`, which receive the existence flag as
//! plain input.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use serde_json::{Map, Value};
use suds_core::error::CoreError;
use suds_core::validation::auth::{validate_login, validate_register};
use suds_core::validation::sanitize::{sanitize_auth, str_field};
use suds_db::models::user::{CreateUser, UserResponse};
use suds_db::repositories::UserRepo;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Successful authentication response returned by register and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

/// POST /api/v1/auth/register
///
/// Create an account. The uniqueness lookup happens here; the validator only
/// sees its boolean result.
pub async fn register(
    State(state): State<AppState>,
    Json(mut input): Json<Map<String, Value>>,
) -> AppResult<(StatusCode, Json<DataResponse<AuthResponse>>)> {
    // 1. Sanitize just enough to look up the candidate number.
    let d = sanitize_auth(&input);
    let number = str_field(&d, "number");

    let existing = UserRepo::find_by_number(&state.pool, number).await?;
    input.insert("userExist".to_string(), Value::Bool(existing.is_some()));

    // 2. Validate the full payload, existence flag included.
    let verdict = validate_register(&input);
    if !verdict.valid {
        return Err(AppError::Unprocessable(verdict.errors));
    }

    // 3. Hash and persist. A concurrent duplicate slips past the flag and
    //    lands on the unique constraint (409).
    let password_hash = hash_password(str_field(&d, "password"))
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            name: str_field(&d, "name").to_string(),
            number: number.to_string(),
            password_hash,
        },
    )
    .await?;

    let token = generate_access_token(user.id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: AuthResponse {
                token,
                user: UserResponse::from(&user),
            },
        }),
    ))
}

/// POST /api/v1/auth/login
///
/// Authenticate with number + password. Bad credentials are a generic 401
/// regardless of which factor was wrong.
pub async fn login(
    State(state): State<AppState>,
    Json(mut input): Json<Map<String, Value>>,
) -> AppResult<Json<DataResponse<AuthResponse>>> {
    let d = sanitize_auth(&input);
    let number = str_field(&d, "number");

    let user = UserRepo::find_by_number(&state.pool, number).await?;
    input.insert("userExist".to_string(), Value::Bool(user.is_some()));

    let verdict = validate_login(&input);
    if !verdict.valid {
        return Err(AppError::Unprocessable(verdict.errors));
    }

    // The verdict only passes when the user exists; this guard covers the
    // lookup racing a deletion.
    let user = user.ok_or_else(invalid_credentials)?;

    let password_ok = verify_password(str_field(&d, "password"), &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_ok {
        return Err(invalid_credentials());
    }

    let token = generate_access_token(user.id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(Json(DataResponse {
        data: AuthResponse {
            token,
            user: UserResponse::from(&user),
        },
    }))
}

/// GET /api/v1/auth/me
///
/// Profile of the authenticated user.
pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, auth_user.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Unauthorized".into())))?;

    Ok(Json(DataResponse {
        data: UserResponse::from(&user),
    }))
}

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized("Invalid credentials".into()))
}
