use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::modules::auth::interface::AuthError;
use crate::modules::auth::middleware::AuthUser;
use crate::modules::auth::model::{User, UserRole};
use crate::modules::auth::schema::{
    AuthResponse, ErrorResponse, ForgotPasswordRequest, ForgotPasswordResponse, LoginRequest,
    LogoutResponse, RegisterRequest, ResetPasswordRequest, ResetPasswordResponse,
    UpdatePasswordRequest, UpdatePasswordResponse, UpdateProfileRequest, UserResponse,
    VerifyOtpRequest, VerifyOtpResponse,
};
use crate::services::hashing;
use crate::services::mailer::OutboundEmail;
use crate::services::password_reset::PasswordResetFlow;
use crate::AppState;

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Sent for every forgot/resend request, whether or not the account exists.
const RESET_REQUESTED_MESSAGE: &str =
    "If an account with that email exists, a password reset code has been sent";

fn validation_error(err: validator::ValidationErrors) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(err.to_string())))
}

fn auth_error(err: AuthError) -> ApiError {
    let status = err.status_code();
    let body = match &err {
        AuthError::OtpMismatch { attempts_remaining } => {
            ErrorResponse::with_attempts(err.to_string(), *attempts_remaining)
        }
        AuthError::TooManyAttempts => ErrorResponse::with_attempts(err.to_string(), 0),
        _ => ErrorResponse::new(err.to_string()),
    };
    (status, Json(body))
}

fn reset_flow(state: &AppState) -> PasswordResetFlow<'_> {
    PasswordResetFlow::new(
        state.users.clone(),
        state.password_resets.clone(),
        state.mailer.clone(),
        &state.jwt_service,
    )
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    req.validate().map_err(validation_error)?;

    let password_hash = hashing::hash_password(&req.password)
        .map_err(|e| auth_error(AuthError::Hashing(e.to_string())))?;

    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4().to_string(),
        first_name: req.first_name,
        last_name: req.last_name,
        email: req.email,
        password_hash,
        role: UserRole::Customer.as_str().to_string(),
        phone: req.phone,
        address: None,
        date_of_birth: None,
        is_active: true,
        last_login: None,
        created_at: now,
        updated_at: now,
    };

    state.users.create(&user).await.map_err(auth_error)?;

    tracing::info!(user_id = %user.id, "account registered");

    let welcome = OutboundEmail::welcome(&user.email, &user.first_name, &state.client_url);
    if let Err(err) = state.mailer.send(welcome).await {
        tracing::warn!(user_id = %user.id, "welcome email failed: {}", err);
    }

    let token = state
        .jwt_service
        .create_access_token(&user.id, &user.email)
        .map_err(|e| auth_error(AuthError::Token(e.to_string())))?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            token_type: "Bearer",
            expires_in: state.jwt_service.get_access_token_duration_secs(),
            user: user.into(),
        }),
    ))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    req.validate().map_err(validation_error)?;

    // Unknown email and wrong password collapse into the same response.
    let user = state
        .users
        .find_by_email(&req.email)
        .await
        .map_err(auth_error)?
        .ok_or_else(|| auth_error(AuthError::InvalidCredentials))?;

    let password_ok = hashing::verify_password(&req.password, &user.password_hash)
        .map_err(|e| auth_error(AuthError::Hashing(e.to_string())))?;
    if !password_ok {
        return Err(auth_error(AuthError::InvalidCredentials));
    }

    if !user.is_active {
        return Err(auth_error(AuthError::AccountDeactivated));
    }

    if let Err(err) = state.users.set_last_login(&user.id, Utc::now()).await {
        tracing::warn!(user_id = %user.id, "failed to record last login: {}", err);
    }

    let token = state
        .jwt_service
        .create_access_token(&user.id, &user.email)
        .map_err(|e| auth_error(AuthError::Token(e.to_string())))?;

    tracing::info!(user_id = %user.id, "login");

    Ok((
        StatusCode::OK,
        Json(AuthResponse {
            token,
            token_type: "Bearer",
            expires_in: state.jwt_service.get_access_token_duration_secs(),
            user: user.into(),
        }),
    ))
}

pub async fn me(AuthUser(user): AuthUser) -> Json<UserResponse> {
    Json(user.into())
}

pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    AuthUser(mut user): AuthUser,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    req.validate().map_err(validation_error)?;

    if let Some(first_name) = req.first_name {
        user.first_name = first_name;
    }
    if let Some(last_name) = req.last_name {
        user.last_name = last_name;
    }
    if let Some(phone) = req.phone {
        user.phone = Some(phone);
    }
    if let Some(address) = req.address {
        user.address = Some(address);
    }
    if let Some(date_of_birth) = req.date_of_birth {
        user.date_of_birth = Some(date_of_birth);
    }
    user.updated_at = Utc::now();

    state.users.update_profile(&user).await.map_err(auth_error)?;

    Ok(Json(user.into()))
}

pub async fn update_password(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(req): Json<UpdatePasswordRequest>,
) -> Result<Json<UpdatePasswordResponse>, ApiError> {
    req.validate().map_err(validation_error)?;

    let current_ok = hashing::verify_password(&req.current_password, &user.password_hash)
        .map_err(|e| auth_error(AuthError::Hashing(e.to_string())))?;
    if !current_ok {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new("Current password is incorrect")),
        ));
    }

    let unchanged = hashing::verify_password(&req.new_password, &user.password_hash)
        .map_err(|e| auth_error(AuthError::Hashing(e.to_string())))?;
    if unchanged {
        return Err(auth_error(AuthError::SamePassword));
    }

    let password_hash = hashing::hash_password(&req.new_password)
        .map_err(|e| auth_error(AuthError::Hashing(e.to_string())))?;
    state
        .users
        .update_password(&user.id, &password_hash)
        .await
        .map_err(auth_error)?;

    tracing::info!(user_id = %user.id, "password updated");

    let note = OutboundEmail::password_changed(&user.email, &user.first_name);
    if let Err(err) = state.mailer.send(note).await {
        tracing::warn!(user_id = %user.id, "password change email failed: {}", err);
    }

    Ok(Json(UpdatePasswordResponse {
        message: "Password updated successfully",
    }))
}

pub async fn forgot_password(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ForgotPasswordRequest>,
) -> Result<Json<ForgotPasswordResponse>, ApiError> {
    req.validate().map_err(validation_error)?;

    match reset_flow(&state).request_otp(&req.email).await {
        Ok(()) => {
            state
                .metrics
                .password_reset_requested_total
                .with_label_values(&["accepted"])
                .inc();
            Ok(Json(ForgotPasswordResponse {
                message: RESET_REQUESTED_MESSAGE,
            }))
        }
        Err(err) => {
            state
                .metrics
                .password_reset_requested_total
                .with_label_values(&["failed"])
                .inc();
            Err(auth_error(err))
        }
    }
}

pub async fn resend_otp(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ForgotPasswordRequest>,
) -> Result<Json<ForgotPasswordResponse>, ApiError> {
    req.validate().map_err(validation_error)?;

    match reset_flow(&state).resend_otp(&req.email).await {
        Ok(()) => {
            state
                .metrics
                .password_reset_requested_total
                .with_label_values(&["accepted"])
                .inc();
            Ok(Json(ForgotPasswordResponse {
                message: RESET_REQUESTED_MESSAGE,
            }))
        }
        Err(err) => {
            state
                .metrics
                .password_reset_requested_total
                .with_label_values(&["failed"])
                .inc();
            Err(auth_error(err))
        }
    }
}

pub async fn verify_otp(
    State(state): State<Arc<AppState>>,
    Json(req): Json<VerifyOtpRequest>,
) -> Result<Json<VerifyOtpResponse>, ApiError> {
    req.validate().map_err(validation_error)?;

    match reset_flow(&state).verify_otp(&req.email, &req.otp).await {
        Ok(reset_token) => {
            state
                .metrics
                .password_reset_verify_total
                .with_label_values(&["success"])
                .inc();
            Ok(Json(VerifyOtpResponse {
                message: "OTP verified",
                reset_token,
                expires_in: state.jwt_service.get_reset_token_duration_secs(),
            }))
        }
        Err(err) => {
            state
                .metrics
                .password_reset_verify_total
                .with_label_values(&["failure"])
                .inc();
            Err(auth_error(err))
        }
    }
}

pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<Json<ResetPasswordResponse>, ApiError> {
    req.validate().map_err(validation_error)?;

    reset_flow(&state)
        .reset_password(&req.reset_token, &req.new_password)
        .await
        .map_err(auth_error)?;

    Ok(Json(ResetPasswordResponse {
        message: "Password has been reset successfully",
    }))
}

/// Tokens are stateless, so logout is an acknowledgement; the client drops
/// the token.
pub async fn logout(AuthUser(user): AuthUser) -> Json<LogoutResponse> {
    tracing::debug!(user_id = %user.id, "logout");
    Json(LogoutResponse {
        message: "Logged out successfully",
    })
}
