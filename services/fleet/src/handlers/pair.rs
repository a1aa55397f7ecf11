use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};

use armada_auth_types::identity::Identity;

use crate::error::FleetServiceError;
use crate::state::AppState;
use crate::usecase::pairing::{
    CompletePairingInput, CompletePairingUseCase, StartPairingUseCase,
};

// ── POST /auth/pairing ────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct StartPairingResponse {
    /// Signed token the client renders as a QR image.
    pub token: String,
}

pub async fn start_pairing(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<impl IntoResponse, FleetServiceError> {
    let usecase = StartPairingUseCase {
        otp: state.otp_engine(),
        pair_secret: state.pair_token_secret.clone(),
    };
    let token = usecase.execute(identity.user_id).await?;
    Ok((StatusCode::CREATED, Json(StartPairingResponse { token })))
}

// ── PATCH /auth/pairing ───────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CompletePairingRequest {
    pub token: String,
    pub agency_id: i32,
}

#[derive(Serialize)]
pub struct CompletePairingResponse {
    pub user_id: i32,
}

pub async fn complete_pairing(
    State(state): State<AppState>,
    Json(body): Json<CompletePairingRequest>,
) -> Result<impl IntoResponse, FleetServiceError> {
    let usecase = CompletePairingUseCase {
        users: state.user_repo(),
        otp: state.otp_engine(),
        pair_secret: state.pair_token_secret.clone(),
    };
    let user_id = usecase
        .execute(CompletePairingInput {
            token: body.token,
            agency_id: body.agency_id,
        })
        .await?;
    Ok((StatusCode::OK, Json(CompletePairingResponse { user_id })))
}
