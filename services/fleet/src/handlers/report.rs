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

use crate::domain::types::{EvidencePatch, Report, ReportEvidence, ReportLog};
use crate::error::FleetServiceError;
use crate::state::AppState;
use crate::usecase::report::{
    CreateReportInput, CreateReportUseCase, GetReportUseCase, ListReportsUseCase,
    ReportHistoryUseCase, TransitionReportInput, TransitionReportUseCase,
    UpdateReportEvidenceInput, UpdateReportEvidenceUseCase,
};

#[derive(Serialize)]
pub struct ReportResponse {
    pub id: i32,
    pub unique_code: String,
    pub user_id: i32,
    pub vehicle_id: i32,
    pub amount_rupiah: i64,
    pub amount_liter: f64,
    pub status: ApprovalStatus,
    pub gps_lat: Option<f64>,
    pub gps_lng: Option<f64>,
    pub odometer_km: Option<i32>,
    pub vehicle_photo: Option<String>,
    pub odometer_photo: Option<String>,
    pub invoice_photo: Option<String>,
    pub companion_photo: Option<String>,
    pub agency_id: i32,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<Report> for ReportResponse {
    fn from(r: Report) -> Self {
        Self {
            id: r.id,
            unique_code: r.unique_code,
            user_id: r.user_id,
            vehicle_id: r.vehicle_id,
            amount_rupiah: r.amount_rupiah,
            amount_liter: r.amount_liter,
            status: r.status,
            gps_lat: r.gps_lat,
            gps_lng: r.gps_lng,
            odometer_km: r.odometer_km,
            vehicle_photo: r.evidence.vehicle_photo,
            odometer_photo: r.evidence.odometer_photo,
            invoice_photo: r.evidence.invoice_photo,
            companion_photo: r.evidence.companion_photo,
            agency_id: r.agency_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct ReportLogResponse {
    pub id: i32,
    pub report_id: i32,
    pub status: ApprovalStatus,
    pub actor_id: i32,
    pub notes: Option<String>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<ReportLog> for ReportLogResponse {
    fn from(l: ReportLog) -> Self {
        Self {
            id: l.id,
            report_id: l.report_id,
            status: l.status,
            actor_id: l.actor_id,
            notes: l.notes,
            created_at: l.created_at,
        }
    }
}

// ── POST /reports ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateReportRequest {
    pub unique_code: String,
    pub vehicle_id: i32,
    pub amount_rupiah: i64,
    pub amount_liter: f64,
    pub gps_lat: Option<f64>,
    pub gps_lng: Option<f64>,
    pub odometer_km: Option<i32>,
    pub vehicle_photo: Option<String>,
    pub odometer_photo: Option<String>,
    pub invoice_photo: Option<String>,
    pub companion_photo: Option<String>,
    pub agency_id: i32,
}

pub async fn create_report(
    State(state): State<AppState>,
    identity: Identity,
    Json(body): Json<CreateReportRequest>,
) -> Result<impl IntoResponse, FleetServiceError> {
    let usecase = CreateReportUseCase {
        users: state.user_repo(),
        vehicles: state.vehicle_repo(),
        submissions: state.submission_repo(),
        reports: state.report_repo(),
    };
    let report = usecase
        .execute(CreateReportInput {
            unique_code: body.unique_code,
            user_id: identity.user_id,
            vehicle_id: body.vehicle_id,
            amount_rupiah: body.amount_rupiah,
            amount_liter: body.amount_liter,
            gps_lat: body.gps_lat,
            gps_lng: body.gps_lng,
            odometer_km: body.odometer_km,
            evidence: ReportEvidence {
                vehicle_photo: body.vehicle_photo,
                odometer_photo: body.odometer_photo,
                invoice_photo: body.invoice_photo,
                companion_photo: body.companion_photo,
            },
            agency_id: body.agency_id,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(ReportResponse::from(report))))
}

// ── GET /reports ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ListReportsQuery {
    pub agency_id: Option<i32>,
    pub status: Option<ApprovalStatus>,
    #[serde(rename = "per-page")]
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

pub async fn list_reports(
    State(state): State<AppState>,
    Query(query): Query<ListReportsQuery>,
) -> Result<Json<Vec<ReportResponse>>, FleetServiceError> {
    let usecase = ListReportsUseCase {
        reports: state.report_repo(),
    };
    let defaults = PageRequest::default();
    let page = PageRequest {
        per_page: query.per_page.unwrap_or(defaults.per_page),
        page: query.page.unwrap_or(defaults.page),
    };
    let reports = usecase.execute(query.agency_id, query.status, page).await?;
    Ok(Json(reports.into_iter().map(ReportResponse::from).collect()))
}

// ── GET /reports/{id} ─────────────────────────────────────────────────────────

pub async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ReportResponse>, FleetServiceError> {
    let usecase = GetReportUseCase {
        reports: state.report_repo(),
    };
    let report = usecase.execute(id).await?;
    Ok(Json(ReportResponse::from(report)))
}

// ── PATCH /reports/{id}/status ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct TransitionReportRequest {
    pub status: ApprovalStatus,
    pub notes: Option<String>,
}

pub async fn transition_report(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<i32>,
    Json(body): Json<TransitionReportRequest>,
) -> Result<Json<ReportResponse>, FleetServiceError> {
    let usecase = TransitionReportUseCase {
        reports: state.report_repo(),
        policy: state.policy,
    };
    let report = usecase
        .execute(TransitionReportInput {
            report_id: id,
            status: body.status,
            actor_id: identity.user_id,
            actor_role: identity.user_role,
            notes: body.notes,
        })
        .await?;
    Ok(Json(ReportResponse::from(report)))
}

// ── PATCH /reports/{id}/evidence ──────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateReportEvidenceRequest {
    pub gps_lat: Option<f64>,
    pub gps_lng: Option<f64>,
    pub odometer_km: Option<i32>,
    pub vehicle_photo: Option<String>,
    pub odometer_photo: Option<String>,
    pub invoice_photo: Option<String>,
    pub companion_photo: Option<String>,
}

pub async fn update_report_evidence(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<i32>,
    Json(body): Json<UpdateReportEvidenceRequest>,
) -> Result<Json<ReportResponse>, FleetServiceError> {
    let usecase = UpdateReportEvidenceUseCase {
        reports: state.report_repo(),
        policy: state.policy,
    };
    let report = usecase
        .execute(UpdateReportEvidenceInput {
            report_id: id,
            actor_id: identity.user_id,
            actor_role: identity.user_role,
            patch: EvidencePatch {
                gps_lat: body.gps_lat,
                gps_lng: body.gps_lng,
                odometer_km: body.odometer_km,
                vehicle_photo: body.vehicle_photo,
                odometer_photo: body.odometer_photo,
                invoice_photo: body.invoice_photo,
                companion_photo: body.companion_photo,
            },
        })
        .await?;
    Ok(Json(ReportResponse::from(report)))
}

// ── GET /reports/{id}/logs ────────────────────────────────────────────────────

pub async fn report_logs(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<ReportLogResponse>>, FleetServiceError> {
    let usecase = ReportHistoryUseCase {
        reports: state.report_repo(),
    };
    let logs = usecase.execute(id).await?;
    Ok(Json(logs.into_iter().map(ReportLogResponse::from).collect()))
}
