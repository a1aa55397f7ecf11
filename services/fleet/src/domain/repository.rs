#![allow(async_fn_in_trait)]

use armada_domain::pagination::PageRequest;
use armada_domain::purpose::CodePurpose;
use armada_domain::status::ApprovalStatus;

use crate::domain::types::{
    EvidencePatch, NewLogEntry, NewReport, NewSubmission, OtpCode, OutboxEvent, Report, ReportLog,
    Submission, SubmissionChanges, SubmissionLog, User, Vehicle,
};
use crate::error::FleetServiceError;

/// Repository for staff accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, FleetServiceError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, FleetServiceError>;
    async fn exists(&self, id: i32) -> Result<bool, FleetServiceError>;

    /// Overwrite the stored password digest.
    async fn update_password(&self, id: i32, digest: &str) -> Result<(), FleetServiceError>;

    /// Flip the account to verified.
    async fn mark_verified(&self, id: i32) -> Result<(), FleetServiceError>;

    /// Attach the user to an agency (device-pairing side effect).
    async fn assign_agency(&self, id: i32, agency_id: i32) -> Result<(), FleetServiceError>;
}

/// Repository for fleet vehicles.
pub trait VehicleRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Vehicle>, FleetServiceError>;
    async fn exists(&self, id: i32) -> Result<bool, FleetServiceError>;
}

/// Repository for one-time codes.
///
/// The store holds at most one row per `(user_id, purpose)`; `replace` is an
/// upsert on that key, never delete-then-insert, so two concurrent issuances
/// cannot interleave into a lost update.
pub trait OtpCodeRepository: Send + Sync {
    /// Find the row matching all three keys, expired or not.
    async fn find(
        &self,
        user_id: i32,
        purpose: CodePurpose,
        code: &str,
    ) -> Result<Option<OtpCode>, FleetServiceError>;

    /// Find whatever code currently occupies `(user_id, purpose)`.
    async fn find_current(
        &self,
        user_id: i32,
        purpose: CodePurpose,
    ) -> Result<Option<OtpCode>, FleetServiceError>;

    /// Upsert the code on `(user_id, purpose)` — any prior code for the pair
    /// is overwritten unconditionally.
    async fn replace(&self, code: &OtpCode) -> Result<(), FleetServiceError>;

    /// Upsert the code and insert an outbox event in the same transaction.
    async fn replace_with_outbox(
        &self,
        code: &OtpCode,
        event: &OutboxEvent,
    ) -> Result<(), FleetServiceError>;

    /// Delete the matching row. Idempotent no-op when absent.
    async fn delete(
        &self,
        user_id: i32,
        purpose: CodePurpose,
        code: &str,
    ) -> Result<(), FleetServiceError>;
}

/// Repository for Submissions and their audit logs.
///
/// Every mutating method that touches `status` appends its log row in the
/// same transaction as the column write — the two must never diverge.
pub trait SubmissionRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Submission>, FleetServiceError>;
    async fn find_by_unique_code(
        &self,
        unique_code: &str,
    ) -> Result<Option<Submission>, FleetServiceError>;
    async fn list(
        &self,
        agency_id: Option<i32>,
        status: Option<ApprovalStatus>,
        page: PageRequest,
    ) -> Result<Vec<Submission>, FleetServiceError>;

    /// Insert the Submission (status `pending`) and its creation-time log row
    /// atomically. Returns the stored Submission with its assigned id.
    async fn create_with_log(&self, new: &NewSubmission)
    -> Result<Submission, FleetServiceError>;

    /// Apply a partial update and append a log row atomically. The log row is
    /// appended even when the status is unchanged; the trail is a full
    /// revision history.
    async fn update_with_log(
        &self,
        id: i32,
        changes: &SubmissionChanges,
        log: &NewLogEntry,
    ) -> Result<Submission, FleetServiceError>;

    /// Delete the Submission; its logs cascade. Returns `false` if absent.
    async fn delete(&self, id: i32) -> Result<bool, FleetServiceError>;

    /// Audit trail ordered by `(created_at, id)` ascending.
    async fn logs(&self, submission_id: i32) -> Result<Vec<SubmissionLog>, FleetServiceError>;
}

/// Repository for Reports and their audit logs.
pub trait ReportRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Report>, FleetServiceError>;
    async fn find_by_unique_code(
        &self,
        unique_code: &str,
    ) -> Result<Option<Report>, FleetServiceError>;
    async fn list(
        &self,
        agency_id: Option<i32>,
        status: Option<ApprovalStatus>,
        page: PageRequest,
    ) -> Result<Vec<Report>, FleetServiceError>;

    /// Insert the Report (status `pending`) and its creation-time log row
    /// atomically.
    async fn create_with_log(&self, new: &NewReport) -> Result<Report, FleetServiceError>;

    /// Set the status column and append a log row atomically.
    async fn update_status_with_log(
        &self,
        id: i32,
        status: ApprovalStatus,
        log: &NewLogEntry,
    ) -> Result<Report, FleetServiceError>;

    /// Patch evidentiary fields only. Deliberately appends no log row;
    /// only explicit status changes are audited for Reports.
    async fn update_evidence(
        &self,
        id: i32,
        patch: &EvidencePatch,
    ) -> Result<Report, FleetServiceError>;

    /// Audit trail ordered by `(created_at, id)` ascending.
    async fn logs(&self, report_id: i32) -> Result<Vec<ReportLog>, FleetServiceError>;
}

/// Opaque password-digest capability.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, FleetServiceError>;
    fn verify(&self, digest: &str, password: &str) -> Result<bool, FleetServiceError>;
}
