use chrono::Utc;

use armada_domain::pagination::PageRequest;
use armada_domain::status::ApprovalStatus;
use armada_domain::user::UserRole;

use crate::domain::repository::{SubmissionRepository, UserRepository};
use crate::domain::types::{
    NewLogEntry, NewSubmission, Submission, SubmissionChanges, SubmissionLog, WorkflowPolicy,
};
use crate::error::FleetServiceError;

fn is_admin(role: u8) -> bool {
    UserRole::from_u8(role) == Some(UserRole::Admin)
}

// ── CreateSubmission ─────────────────────────────────────────────────────────

pub struct CreateSubmissionInput {
    pub unique_code: String,
    pub creator_id: i32,
    pub receiver_id: i32,
    pub amount_rupiah: i64,
    pub description: Option<String>,
    pub agency_id: i32,
}

pub struct CreateSubmissionUseCase<U: UserRepository, S: SubmissionRepository> {
    pub users: U,
    pub submissions: S,
}

impl<U: UserRepository, S: SubmissionRepository> CreateSubmissionUseCase<U, S> {
    /// Both user references must resolve before anything is written; on any
    /// failure here zero rows exist, Submission and log alike.
    pub async fn execute(
        &self,
        input: CreateSubmissionInput,
    ) -> Result<Submission, FleetServiceError> {
        if !self.users.exists(input.creator_id).await? {
            return Err(FleetServiceError::InvalidReference);
        }
        if !self.users.exists(input.receiver_id).await? {
            return Err(FleetServiceError::InvalidReference);
        }
        if self
            .submissions
            .find_by_unique_code(&input.unique_code)
            .await?
            .is_some()
        {
            return Err(FleetServiceError::DuplicateCode);
        }

        let new = NewSubmission {
            unique_code: input.unique_code,
            creator_id: input.creator_id,
            receiver_id: input.receiver_id,
            amount_rupiah: input.amount_rupiah,
            description: input.description,
            agency_id: input.agency_id,
            created_at: Utc::now(),
        };
        // Inserts the pending row and its first log entry in one transaction,
        // so the trail always has at least one row.
        self.submissions.create_with_log(&new).await
    }
}

// ── TransitionSubmission ─────────────────────────────────────────────────────

pub struct TransitionSubmissionInput {
    pub submission_id: i32,
    pub status: ApprovalStatus,
    pub actor_id: i32,
    pub actor_role: u8,
    pub notes: Option<String>,
}

pub struct TransitionSubmissionUseCase<S: SubmissionRepository> {
    pub submissions: S,
    pub policy: WorkflowPolicy,
}

impl<S: SubmissionRepository> TransitionSubmissionUseCase<S> {
    /// Only the receiver (or an admin standing in) decides a Submission.
    pub async fn execute(
        &self,
        input: TransitionSubmissionInput,
    ) -> Result<Submission, FleetServiceError> {
        let submission = self
            .submissions
            .find_by_id(input.submission_id)
            .await?
            .ok_or(FleetServiceError::SubmissionNotFound)?;

        if submission.receiver_id != input.actor_id && !is_admin(input.actor_role) {
            return Err(FleetServiceError::Forbidden);
        }
        if self.policy.lock_terminal && submission.status.is_terminal() {
            return Err(FleetServiceError::TerminalState);
        }

        let changes = SubmissionChanges {
            status: Some(input.status),
            ..Default::default()
        };
        let log = NewLogEntry {
            status: input.status,
            actor_id: input.actor_id,
            notes: input.notes,
        };
        self.submissions
            .update_with_log(input.submission_id, &changes, &log)
            .await
    }
}

// ── UpdateSubmission ─────────────────────────────────────────────────────────

pub struct UpdateSubmissionInput {
    pub submission_id: i32,
    pub actor_id: i32,
    pub actor_role: u8,
    pub changes: SubmissionChanges,
}

pub struct UpdateSubmissionUseCase<U: UserRepository, S: SubmissionRepository> {
    pub users: U,
    pub submissions: S,
    pub policy: WorkflowPolicy,
}

impl<U: UserRepository, S: SubmissionRepository> UpdateSubmissionUseCase<U, S> {
    /// Partial update. Every call appends a log row, status change or not;
    /// the trail is a full revision history, not just status transitions.
    pub async fn execute(
        &self,
        input: UpdateSubmissionInput,
    ) -> Result<Submission, FleetServiceError> {
        if input.changes.is_empty() {
            return Err(FleetServiceError::MissingData);
        }

        let submission = self
            .submissions
            .find_by_id(input.submission_id)
            .await?
            .ok_or(FleetServiceError::SubmissionNotFound)?;

        // Data edits are open; moving the status stays receiver/admin-only.
        if input.changes.status.is_some()
            && submission.receiver_id != input.actor_id
            && !is_admin(input.actor_role)
        {
            return Err(FleetServiceError::Forbidden);
        }
        if self.policy.lock_terminal && submission.status.is_terminal() {
            return Err(FleetServiceError::TerminalState);
        }
        if let Some(creator_id) = input.changes.creator_id {
            if !self.users.exists(creator_id).await? {
                return Err(FleetServiceError::InvalidReference);
            }
        }
        if let Some(receiver_id) = input.changes.receiver_id {
            if !self.users.exists(receiver_id).await? {
                return Err(FleetServiceError::InvalidReference);
            }
        }

        let new_status = input.changes.status.unwrap_or(submission.status);
        let notes = match input.changes.status {
            Some(to) if to != submission.status => {
                format!("status changed from {} to {}", submission.status, to)
            }
            _ => "data updated".to_owned(),
        };
        let log = NewLogEntry {
            status: new_status,
            actor_id: input.actor_id,
            notes: Some(notes),
        };
        self.submissions
            .update_with_log(input.submission_id, &input.changes, &log)
            .await
    }
}

// ── GetSubmission ────────────────────────────────────────────────────────────

pub struct GetSubmissionUseCase<S: SubmissionRepository> {
    pub submissions: S,
}

impl<S: SubmissionRepository> GetSubmissionUseCase<S> {
    pub async fn execute(&self, submission_id: i32) -> Result<Submission, FleetServiceError> {
        self.submissions
            .find_by_id(submission_id)
            .await?
            .ok_or(FleetServiceError::SubmissionNotFound)
    }
}

// ── ListSubmissions ──────────────────────────────────────────────────────────

pub struct ListSubmissionsUseCase<S: SubmissionRepository> {
    pub submissions: S,
}

impl<S: SubmissionRepository> ListSubmissionsUseCase<S> {
    pub async fn execute(
        &self,
        agency_id: Option<i32>,
        status: Option<ApprovalStatus>,
        page: PageRequest,
    ) -> Result<Vec<Submission>, FleetServiceError> {
        self.submissions.list(agency_id, status, page.clamped()).await
    }
}

// ── DeleteSubmission ─────────────────────────────────────────────────────────

pub struct DeleteSubmissionUseCase<S: SubmissionRepository> {
    pub submissions: S,
}

impl<S: SubmissionRepository> DeleteSubmissionUseCase<S> {
    /// Administrative delete; the only way log rows ever disappear (cascade).
    pub async fn execute(
        &self,
        submission_id: i32,
        actor_role: u8,
    ) -> Result<(), FleetServiceError> {
        if !is_admin(actor_role) {
            return Err(FleetServiceError::Forbidden);
        }
        if !self.submissions.delete(submission_id).await? {
            return Err(FleetServiceError::SubmissionNotFound);
        }
        Ok(())
    }
}

// ── SubmissionHistory ────────────────────────────────────────────────────────

pub struct SubmissionHistoryUseCase<S: SubmissionRepository> {
    pub submissions: S,
}

impl<S: SubmissionRepository> SubmissionHistoryUseCase<S> {
    /// Audit trail, oldest first. The latest row must agree with the status
    /// column; divergence means a write escaped its transaction and is
    /// reported as a fault, not repaired.
    pub async fn execute(
        &self,
        submission_id: i32,
    ) -> Result<Vec<SubmissionLog>, FleetServiceError> {
        let submission = self
            .submissions
            .find_by_id(submission_id)
            .await?
            .ok_or(FleetServiceError::SubmissionNotFound)?;

        let logs = self.submissions.logs(submission_id).await?;
        match logs.last() {
            None => Err(FleetServiceError::Integrity(format!(
                "submission {submission_id} has no log rows"
            ))),
            Some(last) if last.status != submission.status => {
                Err(FleetServiceError::Integrity(format!(
                    "submission {submission_id} status is {} but last log row is {}",
                    submission.status, last.status
                )))
            }
            Some(_) => Ok(logs),
        }
    }
}
