use chrono::Utc;

use armada_domain::pagination::PageRequest;
use armada_domain::status::ApprovalStatus;
use armada_domain::user::UserRole;

use crate::domain::repository::{
    ReportRepository, SubmissionRepository, UserRepository, VehicleRepository,
};
use crate::domain::types::{
    EvidencePatch, NewLogEntry, NewReport, Report, ReportEvidence, ReportLog, WorkflowPolicy,
};
use crate::error::FleetServiceError;

fn is_admin(role: u8) -> bool {
    UserRole::from_u8(role) == Some(UserRole::Admin)
}

fn is_supervisor_or_admin(role: u8) -> bool {
    matches!(
        UserRole::from_u8(role),
        Some(UserRole::Supervisor) | Some(UserRole::Admin)
    )
}

// ── CreateReport ─────────────────────────────────────────────────────────────

pub struct CreateReportInput {
    pub unique_code: String,
    pub user_id: i32,
    pub vehicle_id: i32,
    pub amount_rupiah: i64,
    pub amount_liter: f64,
    pub gps_lat: Option<f64>,
    pub gps_lng: Option<f64>,
    pub odometer_km: Option<i32>,
    pub evidence: ReportEvidence,
    pub agency_id: i32,
}

pub struct CreateReportUseCase<U, V, S, R>
where
    U: UserRepository,
    V: VehicleRepository,
    S: SubmissionRepository,
    R: ReportRepository,
{
    pub users: U,
    pub vehicles: V,
    pub submissions: S,
    pub reports: R,
}

impl<U, V, S, R> CreateReportUseCase<U, V, S, R>
where
    U: UserRepository,
    V: VehicleRepository,
    S: SubmissionRepository,
    R: ReportRepository,
{
    /// A Report claims against an accepted Submission: `unique_code` must
    /// match one (value link, no FK — the check is explicit here instead),
    /// filed by the same PIC who created it.
    pub async fn execute(&self, input: CreateReportInput) -> Result<Report, FleetServiceError> {
        if !self.users.exists(input.user_id).await? {
            return Err(FleetServiceError::InvalidReference);
        }
        if !self.vehicles.exists(input.vehicle_id).await? {
            return Err(FleetServiceError::InvalidReference);
        }

        let submission = self
            .submissions
            .find_by_unique_code(&input.unique_code)
            .await?
            .ok_or(FleetServiceError::InvalidReference)?;
        if submission.status != ApprovalStatus::Accepted {
            return Err(FleetServiceError::InvalidReference);
        }
        if submission.creator_id != input.user_id {
            return Err(FleetServiceError::Forbidden);
        }

        if self
            .reports
            .find_by_unique_code(&input.unique_code)
            .await?
            .is_some()
        {
            return Err(FleetServiceError::DuplicateCode);
        }

        let new = NewReport {
            unique_code: input.unique_code,
            user_id: input.user_id,
            vehicle_id: input.vehicle_id,
            amount_rupiah: input.amount_rupiah,
            amount_liter: input.amount_liter,
            gps_lat: input.gps_lat,
            gps_lng: input.gps_lng,
            odometer_km: input.odometer_km,
            evidence: input.evidence,
            agency_id: input.agency_id,
            created_at: Utc::now(),
        };
        self.reports.create_with_log(&new).await
    }
}

// ── TransitionReport ─────────────────────────────────────────────────────────

pub struct TransitionReportInput {
    pub report_id: i32,
    pub status: ApprovalStatus,
    pub actor_id: i32,
    pub actor_role: u8,
    pub notes: Option<String>,
}

pub struct TransitionReportUseCase<R: ReportRepository> {
    pub reports: R,
    pub policy: WorkflowPolicy,
}

impl<R: ReportRepository> TransitionReportUseCase<R> {
    /// Reports are reviewed by supervisors (or admins).
    pub async fn execute(&self, input: TransitionReportInput) -> Result<Report, FleetServiceError> {
        let report = self
            .reports
            .find_by_id(input.report_id)
            .await?
            .ok_or(FleetServiceError::ReportNotFound)?;

        if !is_supervisor_or_admin(input.actor_role) {
            return Err(FleetServiceError::Forbidden);
        }
        if self.policy.lock_terminal && report.status.is_terminal() {
            return Err(FleetServiceError::TerminalState);
        }

        let log = NewLogEntry {
            status: input.status,
            actor_id: input.actor_id,
            notes: input.notes,
        };
        self.reports
            .update_status_with_log(input.report_id, input.status, &log)
            .await
    }
}

// ── UpdateReportEvidence ─────────────────────────────────────────────────────

pub struct UpdateReportEvidenceInput {
    pub report_id: i32,
    pub actor_id: i32,
    pub actor_role: u8,
    pub patch: EvidencePatch,
}

pub struct UpdateReportEvidenceUseCase<R: ReportRepository> {
    pub reports: R,
    pub policy: WorkflowPolicy,
}

impl<R: ReportRepository> UpdateReportEvidenceUseCase<R> {
    /// Patching evidence appends no log row; unlike Submission updates,
    /// only explicit status changes are audited for Reports.
    pub async fn execute(
        &self,
        input: UpdateReportEvidenceInput,
    ) -> Result<Report, FleetServiceError> {
        if input.patch.is_empty() {
            return Err(FleetServiceError::MissingData);
        }

        let report = self
            .reports
            .find_by_id(input.report_id)
            .await?
            .ok_or(FleetServiceError::ReportNotFound)?;

        if report.user_id != input.actor_id && !is_admin(input.actor_role) {
            return Err(FleetServiceError::Forbidden);
        }
        if self.policy.lock_terminal && report.status.is_terminal() {
            return Err(FleetServiceError::TerminalState);
        }

        self.reports
            .update_evidence(input.report_id, &input.patch)
            .await
    }
}

// ── GetReport ────────────────────────────────────────────────────────────────

pub struct GetReportUseCase<R: ReportRepository> {
    pub reports: R,
}

impl<R: ReportRepository> GetReportUseCase<R> {
    pub async fn execute(&self, report_id: i32) -> Result<Report, FleetServiceError> {
        self.reports
            .find_by_id(report_id)
            .await?
            .ok_or(FleetServiceError::ReportNotFound)
    }
}

// ── ListReports ──────────────────────────────────────────────────────────────

pub struct ListReportsUseCase<R: ReportRepository> {
    pub reports: R,
}

impl<R: ReportRepository> ListReportsUseCase<R> {
    pub async fn execute(
        &self,
        agency_id: Option<i32>,
        status: Option<ApprovalStatus>,
        page: PageRequest,
    ) -> Result<Vec<Report>, FleetServiceError> {
        self.reports.list(agency_id, status, page.clamped()).await
    }
}

// ── ReportHistory ────────────────────────────────────────────────────────────

pub struct ReportHistoryUseCase<R: ReportRepository> {
    pub reports: R,
}

impl<R: ReportRepository> ReportHistoryUseCase<R> {
    /// Same integrity rule as Submission history: the newest log row must
    /// agree with the status column or the call fails loudly.
    pub async fn execute(&self, report_id: i32) -> Result<Vec<ReportLog>, FleetServiceError> {
        let report = self
            .reports
            .find_by_id(report_id)
            .await?
            .ok_or(FleetServiceError::ReportNotFound)?;

        let logs = self.reports.logs(report_id).await?;
        match logs.last() {
            None => Err(FleetServiceError::Integrity(format!(
                "report {report_id} has no log rows"
            ))),
            Some(last) if last.status != report.status => Err(FleetServiceError::Integrity(
                format!(
                    "report {report_id} status is {} but last log row is {}",
                    report.status, last.status
                ),
            )),
            Some(_) => Ok(logs),
        }
    }
}
