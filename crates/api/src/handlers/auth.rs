//! Handlers for the `/auth` resource (register, login, me).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;
use venuebook_core::error::CoreError;
use venuebook_core::phone::normalize_phone;
use venuebook_core::roles::{ROLE_CUSTOMER, ROLE_MANAGER};
use venuebook_core::status::RegistrationType;
use venuebook_db::models::user::{CreateUser, OwnerLite, UserProfile};
use venuebook_db::repositories::UserRepo;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::middleware::auth::AuthUser;
use crate::notifications::{registration_mail, send_and_record, MailSubject};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    /// Local (`0912...`) or international (`+84912...`) form.
    #[validate(length(min = 6, max = 20))]
    pub phone: Option<String>,
    /// `customer` (default) or `manager`.
    pub role: Option<String>,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: OwnerLite,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create a customer or manager account and send the verification mail. The
/// account moves to `PENDING_VERIFY` only when that mail was sent; a failed
/// mail leaves it in `NEW_REGISTER` and the registration still succeeds.
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserProfile>>)> {
    let role = match input.role.as_deref() {
        None | Some(ROLE_CUSTOMER) => ROLE_CUSTOMER,
        Some(ROLE_MANAGER) => ROLE_MANAGER,
        Some(other) => {
            return Err(AppError::Core(CoreError::Validation(format!(
                "role: '{other}' cannot be self-registered"
            ))))
        }
    };

    if UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "Email is already registered".into(),
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let mut user = UserRepo::create(
        &state.pool,
        &CreateUser {
            name: input.name.trim().to_string(),
            email: input.email.trim().to_string(),
            phone: input.phone.as_deref().map(|p| normalize_phone(p.trim())),
            password_hash,
            role: role.to_string(),
        },
    )
    .await?;

    tracing::info!(user_id = user.id, role = %user.role, "User registered");

    let outcome = send_and_record(
        &state,
        &registration_mail(&user.email, &user.name),
        MailSubject {
            user_id: Some(user.id),
            ..Default::default()
        },
    )
    .await;

    // The account is committed; a failed status update leaves it in
    // NEW_REGISTER instead of failing the request.
    if outcome.is_sent() {
        match UserRepo::set_registration_type(&state.pool, user.id, RegistrationType::PendingVerify)
            .await
        {
            Ok(Some(updated)) => user = updated,
            Ok(None) => {}
            Err(err) => tracing::error!(
                user_id = user.id,
                error = %err,
                "Failed to mark user as pending verification"
            ),
        }
    }

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(UserProfile::from(user))),
    ))
}

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. Returns a bearer access token.
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> AppResult<Json<DataResponse<TokenResponse>>> {
    let invalid =
        || AppError::Core(CoreError::Unauthorized("Invalid email or password".into()));

    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(invalid)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(invalid());
    }

    let access_token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(DataResponse::new(TokenResponse {
        access_token,
        token_type: "Bearer",
        expires_in: state.config.jwt.expires_in.num_seconds(),
        user: OwnerLite::from(&user),
    })))
}

/// GET /api/v1/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<DataResponse<OwnerLite>>> {
    let user = UserRepo::find_by_id(&state.pool, auth_user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth_user.user_id,
        }))?;
    Ok(Json(DataResponse::new(OwnerLite::from(&user))))
}
