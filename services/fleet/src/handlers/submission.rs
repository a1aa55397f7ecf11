use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use armada_auth_types::identity::Identity;
use armada_core::serde::to_rfc3339_ms;
use armada_domain::pagination::PageRequest;
use armada_domain::status::ApprovalStatus;

use crate::domain::types::{Submission, SubmissionChanges, SubmissionLog};
use crate::error::FleetServiceError;
use crate::state::AppState;
use crate::usecase::submission::{
    CreateSubmissionInput, CreateSubmissionUseCase, DeleteSubmissionUseCase, GetSubmissionUseCase,
    ListSubmissionsUseCase, SubmissionHistoryUseCase, TransitionSubmissionInput,
    TransitionSubmissionUseCase, UpdateSubmissionInput, UpdateSubmissionUseCase,
};

#[derive(Serialize)]
pub struct SubmissionResponse {
    pub id: i32,
    pub unique_code: String,
    pub creator_id: i32,
    pub receiver_id: i32,
    pub amount_rupiah: i64,
    pub status: ApprovalStatus,
    pub description: Option<String>,
    pub agency_id: i32,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<Submission> for SubmissionResponse {
    fn from(s: Submission) -> Self {
        Self {
            id: s.id,
            unique_code: s.unique_code,
            creator_id: s.creator_id,
            receiver_id: s.receiver_id,
            amount_rupiah: s.amount_rupiah,
            status: s.status,
            description: s.description,
            agency_id: s.agency_id,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct SubmissionLogResponse {
    pub id: i32,
    pub submission_id: i32,
    pub status: ApprovalStatus,
    pub actor_id: i32,
    pub notes: Option<String>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<SubmissionLog> for SubmissionLogResponse {
    fn from(l: SubmissionLog) -> Self {
        Self {
            id: l.id,
            submission_id: l.submission_id,
            status: l.status,
            actor_id: l.actor_id,
            notes: l.notes,
            created_at: l.created_at,
        }
    }
}

// ── POST /submissions ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateSubmissionRequest {
    pub unique_code: String,
    pub receiver_id: i32,
    pub amount_rupiah: i64,
    pub description: Option<String>,
    pub agency_id: i32,
}

pub async fn create_submission(
    State(state): State<AppState>,
    identity: Identity,
    Json(body): Json<CreateSubmissionRequest>,
) -> Result<impl IntoResponse, FleetServiceError> {
    let usecase = CreateSubmissionUseCase {
        users: state.user_repo(),
        submissions: state.submission_repo(),
    };
    let submission = usecase
        .execute(CreateSubmissionInput {
            unique_code: body.unique_code,
            creator_id: identity.user_id,
            receiver_id: body.receiver_id,
            amount_rupiah: body.amount_rupiah,
            description: body.description,
            agency_id: body.agency_id,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(SubmissionResponse::from(submission)),
    ))
}

// ── GET /submissions ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ListSubmissionsQuery {
    pub agency_id: Option<i32>,
    pub status: Option<ApprovalStatus>,
    #[serde(rename = "per-page")]
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

pub async fn list_submissions(
    State(state): State<AppState>,
    Query(query): Query<ListSubmissionsQuery>,
) -> Result<Json<Vec<SubmissionResponse>>, FleetServiceError> {
    let usecase = ListSubmissionsUseCase {
        submissions: state.submission_repo(),
    };
    let defaults = PageRequest::default();
    let page = PageRequest {
        per_page: query.per_page.unwrap_or(defaults.per_page),
        page: query.page.unwrap_or(defaults.page),
    };
    let submissions = usecase.execute(query.agency_id, query.status, page).await?;
    Ok(Json(
        submissions.into_iter().map(SubmissionResponse::from).collect(),
    ))
}

// ── GET /submissions/{id} ─────────────────────────────────────────────────────

pub async fn get_submission(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<SubmissionResponse>, FleetServiceError> {
    let usecase = GetSubmissionUseCase {
        submissions: state.submission_repo(),
    };
    let submission = usecase.execute(id).await?;
    Ok(Json(SubmissionResponse::from(submission)))
}

// ── PATCH /submissions/{id} ───────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateSubmissionRequest {
    pub creator_id: Option<i32>,
    pub receiver_id: Option<i32>,
    pub amount_rupiah: Option<i64>,
    pub description: Option<String>,
    pub status: Option<ApprovalStatus>,
}

pub async fn update_submission(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<i32>,
    Json(body): Json<UpdateSubmissionRequest>,
) -> Result<Json<SubmissionResponse>, FleetServiceError> {
    let usecase = UpdateSubmissionUseCase {
        users: state.user_repo(),
        submissions: state.submission_repo(),
        policy: state.policy,
    };
    let submission = usecase
        .execute(UpdateSubmissionInput {
            submission_id: id,
            actor_id: identity.user_id,
            actor_role: identity.user_role,
            changes: SubmissionChanges {
                creator_id: body.creator_id,
                receiver_id: body.receiver_id,
                amount_rupiah: body.amount_rupiah,
                description: body.description,
                status: body.status,
            },
        })
        .await?;
    Ok(Json(SubmissionResponse::from(submission)))
}

// ── PATCH /submissions/{id}/status ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct TransitionSubmissionRequest {
    pub status: ApprovalStatus,
    pub notes: Option<String>,
}

pub async fn transition_submission(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<i32>,
    Json(body): Json<TransitionSubmissionRequest>,
) -> Result<Json<SubmissionResponse>, FleetServiceError> {
    let usecase = TransitionSubmissionUseCase {
        submissions: state.submission_repo(),
        policy: state.policy,
    };
    let submission = usecase
        .execute(TransitionSubmissionInput {
            submission_id: id,
            status: body.status,
            actor_id: identity.user_id,
            actor_role: identity.user_role,
            notes: body.notes,
        })
        .await?;
    Ok(Json(SubmissionResponse::from(submission)))
}

// ── DELETE /submissions/{id} ──────────────────────────────────────────────────

pub async fn delete_submission(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<i32>,
) -> Result<StatusCode, FleetServiceError> {
    let usecase = DeleteSubmissionUseCase {
        submissions: state.submission_repo(),
    };
    usecase.execute(id, identity.user_role).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /submissions/{id}/logs ────────────────────────────────────────────────

pub async fn submission_logs(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<SubmissionLogResponse>>, FleetServiceError> {
    let usecase = SubmissionHistoryUseCase {
        submissions: state.submission_repo(),
    };
    let logs = usecase.execute(id).await?;
    Ok(Json(
        logs.into_iter().map(SubmissionLogResponse::from).collect(),
    ))
}
