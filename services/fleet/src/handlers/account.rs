use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use crate::error::FleetServiceError;
use crate::state::AppState;
use crate::usecase::password_reset::{
    RequestPasswordResetInput, RequestPasswordResetUseCase, ResetPasswordInput,
    ResetPasswordUseCase,
};
use crate::usecase::register::{
    RequestVerificationCodeInput, RequestVerificationCodeUseCase, VerifyAccountInput,
    VerifyAccountUseCase,
};

// ── POST /auth/password/code ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RequestPasswordResetRequest {
    pub email: String,
}

pub async fn create_password_reset_code(
    State(state): State<AppState>,
    Json(body): Json<RequestPasswordResetRequest>,
) -> Result<StatusCode, FleetServiceError> {
    let usecase = RequestPasswordResetUseCase {
        users: state.user_repo(),
        otp: state.otp_engine(),
    };
    usecase
        .execute(RequestPasswordResetInput { email: body.email })
        .await?;
    // 202 whether the address exists or not.
    Ok(StatusCode::ACCEPTED)
}

// ── PATCH /auth/password ──────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub code: String,
    pub new_password: String,
}

pub async fn reset_password(
    State(state): State<AppState>,
    Json(body): Json<ResetPasswordRequest>,
) -> Result<StatusCode, FleetServiceError> {
    let usecase = ResetPasswordUseCase {
        users: state.user_repo(),
        otp: state.otp_engine(),
        hasher: state.password_hasher(),
    };
    usecase
        .execute(ResetPasswordInput {
            email: body.email,
            code: body.code,
            new_password: body.new_password,
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /auth/verification/code ──────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RequestVerificationCodeRequest {
    pub email: String,
}

pub async fn create_verification_code(
    State(state): State<AppState>,
    Json(body): Json<RequestVerificationCodeRequest>,
) -> Result<StatusCode, FleetServiceError> {
    let usecase = RequestVerificationCodeUseCase {
        users: state.user_repo(),
        otp: state.otp_engine(),
    };
    usecase
        .execute(RequestVerificationCodeInput { email: body.email })
        .await?;
    Ok(StatusCode::ACCEPTED)
}

// ── PATCH /auth/verification ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyAccountRequest {
    pub email: String,
    pub code: String,
}

pub async fn verify_account(
    State(state): State<AppState>,
    Json(body): Json<VerifyAccountRequest>,
) -> Result<StatusCode, FleetServiceError> {
    let usecase = VerifyAccountUseCase {
        users: state.user_repo(),
        otp: state.otp_engine(),
    };
    usecase
        .execute(VerifyAccountInput {
            email: body.email,
            code: body.code,
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
