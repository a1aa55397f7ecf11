use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use armada_domain::purpose::CodePurpose;
use armada_domain::status::ApprovalStatus;

/// Agency staff account.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password_digest: String,
    pub role: u8,
    pub agency_id: Option<i32>,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fleet vehicle a Report is filed against.
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub id: i32,
    pub plate_number: String,
    pub agency_id: i32,
    pub created_at: DateTime<Utc>,
}

/// One-time code scoped to `(user, purpose)`.
#[derive(Debug, Clone)]
pub struct OtpCode {
    pub user_id: i32,
    pub purpose: CodePurpose,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl OtpCode {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}

/// Cash-advance request.
#[derive(Debug, Clone)]
pub struct Submission {
    pub id: i32,
    pub unique_code: String,
    pub creator_id: i32,
    pub receiver_id: i32,
    pub amount_rupiah: i64,
    pub status: ApprovalStatus,
    pub description: Option<String>,
    pub agency_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Append-only audit row for a Submission status assignment.
#[derive(Debug, Clone)]
pub struct SubmissionLog {
    pub id: i32,
    pub submission_id: i32,
    pub status: ApprovalStatus,
    pub actor_id: i32,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fuel-purchase claim against an accepted Submission.
#[derive(Debug, Clone)]
pub struct Report {
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
    pub evidence: ReportEvidence,
    pub agency_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Evidentiary media paths attached to a Report.
///
/// All optional; may be set at creation or patched later. Patching evidence
/// alone does not touch the audit log.
#[derive(Debug, Clone, Default)]
pub struct ReportEvidence {
    pub vehicle_photo: Option<String>,
    pub odometer_photo: Option<String>,
    pub invoice_photo: Option<String>,
    pub companion_photo: Option<String>,
}

/// Draft Submission, complete except for the store-assigned id.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub unique_code: String,
    pub creator_id: i32,
    pub receiver_id: i32,
    pub amount_rupiah: i64,
    pub description: Option<String>,
    pub agency_id: i32,
    pub created_at: DateTime<Utc>,
}

/// Draft Report, complete except for the store-assigned id.
#[derive(Debug, Clone)]
pub struct NewReport {
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
    pub created_at: DateTime<Utc>,
}

/// Partial update of a Submission's mutable fields.
#[derive(Debug, Clone, Default)]
pub struct SubmissionChanges {
    pub creator_id: Option<i32>,
    pub receiver_id: Option<i32>,
    pub amount_rupiah: Option<i64>,
    pub description: Option<String>,
    pub status: Option<ApprovalStatus>,
}

impl SubmissionChanges {
    pub fn is_empty(&self) -> bool {
        self.creator_id.is_none()
            && self.receiver_id.is_none()
            && self.amount_rupiah.is_none()
            && self.description.is_none()
            && self.status.is_none()
    }
}

/// Partial update of a Report's evidentiary fields. Never logged.
#[derive(Debug, Clone, Default)]
pub struct EvidencePatch {
    pub gps_lat: Option<f64>,
    pub gps_lng: Option<f64>,
    pub odometer_km: Option<i32>,
    pub vehicle_photo: Option<String>,
    pub odometer_photo: Option<String>,
    pub invoice_photo: Option<String>,
    pub companion_photo: Option<String>,
}

impl EvidencePatch {
    pub fn is_empty(&self) -> bool {
        self.gps_lat.is_none()
            && self.gps_lng.is_none()
            && self.odometer_km.is_none()
            && self.vehicle_photo.is_none()
            && self.odometer_photo.is_none()
            && self.invoice_photo.is_none()
            && self.companion_photo.is_none()
    }
}

/// Audit-log row to append alongside a status write.
#[derive(Debug, Clone)]
pub struct NewLogEntry {
    pub status: ApprovalStatus,
    pub actor_id: i32,
    pub notes: Option<String>,
}

/// Append-only audit row for a Report status assignment.
#[derive(Debug, Clone)]
pub struct ReportLog {
    pub id: i32,
    pub report_id: i32,
    pub status: ApprovalStatus,
    pub actor_id: i32,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Outbox event for async delivery (e.g. OTP email).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboxEvent {
    pub id: Uuid,
    pub kind: String,
    pub payload: serde_json::Value,
    pub idempotency_key: String,
}

/// Workflow behavior toggles, loaded from config at startup.
///
/// `lock_terminal` defaults to `false`: the source system let terminal
/// Submissions/Reports be edited and re-transitioned, and silently adding a
/// guard would change observed behavior. Deployments wanting the stricter
/// rule opt in.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkflowPolicy {
    pub lock_terminal: bool,
}

/// OTP code length in digits.
pub const OTP_CODE_LEN: usize = 4;

/// OTP time-to-live in seconds. Behavioral compatibility constant; clients
/// display a 2-minute countdown.
pub const OTP_TTL_SECS: i64 = 120;
