use std::borrow::Cow;

use anyhow::Context;
use axum::{Json, extract::State};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidateEmail, ValidateLength, ValidationError, ValidationErrors};

use crate::{
    auth::{encode_jwt, error::AuthError, verify_password_hash},
    db::user::{create_user, get_user_credential_optional},
    error::Error,
    model::{ApiResponse, User},
    state::SharedAppState,
    telemetry::spawn_blocking_with_tracing,
};

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: SecretString,
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if !self.username.validate_length(Some(3), Some(50), None) {
            errors.add(
                "username",
                ValidationError::new("username_length")
                    .with_message(Cow::from("Username length must be between 3 and 50")),
            );
        }

        if !self.email.validate_email() {
            errors.add(
                "email",
                ValidationError::new("email_email")
                    .with_message(Cow::from("Incorrect email format")),
            );
        }
        if !self.email.validate_length(Some(1), Some(100), None) {
            errors.add(
                "email",
                ValidationError::new("email_length")
                    .with_message(Cow::from("Email length must be between 1 and 100")),
            );
        }

        let password = self.password.expose_secret();
        if !password.validate_length(Some(6), Some(72), None) {
            errors.add(
                "password",
                ValidationError::new("password_length")
                    .with_message(Cow::from("Password length must be between 6 and 72")),
            );
        }

        if !errors.errors().is_empty() {
            return Err(errors);
        }

        Ok(())
    }
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: SecretString,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.username.trim().is_empty() {
            errors.add(
                "username",
                ValidationError::new("username_required")
                    .with_message(Cow::from("Username is required")),
            );
        }
        if self.password.expose_secret().is_empty() {
            errors.add(
                "password",
                ValidationError::new("password_required")
                    .with_message(Cow::from("Password is required")),
            );
        }

        if !errors.errors().is_empty() {
            return Err(errors);
        }

        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
}

#[tracing::instrument(name = "[POST] auth/register", skip_all)]
pub async fn register(
    State(app_state): State<SharedAppState>,
    axum::extract::Json(request): axum::extract::Json<RegisterRequest>,
) -> Result<Json<ApiResponse<User>>, Error> {
    request.validate().map_err(Error::Validation)?;

    let user = create_user(
        &app_state.pool,
        request.username,
        request.email,
        request.password,
    )
    .await?;

    tracing::info!(user_id = user.id, "User registered");

    Ok(Json(ApiResponse::with_message("Registration successful", user)))
}

#[tracing::instrument(name = "[POST] auth/login", skip_all)]
pub async fn login(
    State(app_state): State<SharedAppState>,
    axum::extract::Json(request): axum::extract::Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, Error> {
    request.validate().map_err(Error::Validation)?;

    let (user, hashed_password) = get_user_credential_optional(&app_state.pool, &request.username)
        .await?
        .ok_or(Error::Auth(AuthError::IncorrectCredential))?;

    spawn_blocking_with_tracing(move || verify_password_hash(hashed_password, request.password))
        .await
        .context("verify password hash")
        .map_err(Error::Other)?
        .map_err(|_| Error::Auth(AuthError::IncorrectCredential))?;

    let token = encode_jwt(user.id, &user.username, &app_state.config.jwt)?;

    Ok(Json(ApiResponse::with_message(
        "Login successful",
        LoginResponse { user, token },
    )))
}
