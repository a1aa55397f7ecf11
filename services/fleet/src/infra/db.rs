use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, sea_query::OnConflict,
};

use armada_domain::pagination::PageRequest;
use armada_domain::purpose::CodePurpose;
use armada_domain::status::ApprovalStatus;
use armada_fleet_schema::{
    otp_codes, outbox_events, report_logs, reports, submission_logs, submissions, users, vehicles,
};

use crate::domain::repository::{
    OtpCodeRepository, ReportRepository, SubmissionRepository, UserRepository, VehicleRepository,
};
use crate::domain::types::{
    EvidencePatch, NewLogEntry, NewReport, NewSubmission, OtpCode, OutboxEvent, Report,
    ReportEvidence, ReportLog, Submission, SubmissionChanges, SubmissionLog, User, Vehicle,
};
use crate::error::FleetServiceError;

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, FleetServiceError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, FleetServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model))
    }

    async fn exists(&self, id: i32) -> Result<bool, FleetServiceError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("check user exists")?;
        Ok(model.is_some())
    }

    async fn update_password(&self, id: i32, digest: &str) -> Result<(), FleetServiceError> {
        users::ActiveModel {
            id: Set(id),
            password_digest: Set(digest.to_owned()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update user password")?;
        Ok(())
    }

    async fn mark_verified(&self, id: i32) -> Result<(), FleetServiceError> {
        users::ActiveModel {
            id: Set(id),
            verified: Set(true),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("mark user verified")?;
        Ok(())
    }

    async fn assign_agency(&self, id: i32, agency_id: i32) -> Result<(), FleetServiceError> {
        users::ActiveModel {
            id: Set(id),
            agency_id: Set(Some(agency_id)),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("assign user agency")?;
        Ok(())
    }
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id,
        name: model.name,
        email: model.email,
        password_digest: model.password_digest,
        role: model.role as u8,
        agency_id: model.agency_id,
        verified: model.verified,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Vehicle repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbVehicleRepository {
    pub db: DatabaseConnection,
}

impl VehicleRepository for DbVehicleRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Vehicle>, FleetServiceError> {
        let model = vehicles::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find vehicle by id")?;
        Ok(model.map(|m| Vehicle {
            id: m.id,
            plate_number: m.plate_number,
            agency_id: m.agency_id,
            created_at: m.created_at,
        }))
    }

    async fn exists(&self, id: i32) -> Result<bool, FleetServiceError> {
        let model = vehicles::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("check vehicle exists")?;
        Ok(model.is_some())
    }
}

// ── OtpCode repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOtpCodeRepository {
    pub db: DatabaseConnection,
}

impl OtpCodeRepository for DbOtpCodeRepository {
    async fn find(
        &self,
        user_id: i32,
        purpose: CodePurpose,
        code: &str,
    ) -> Result<Option<OtpCode>, FleetServiceError> {
        let model = otp_codes::Entity::find()
            .filter(otp_codes::Column::UserId.eq(user_id))
            .filter(otp_codes::Column::Purpose.eq(purpose.as_str()))
            .filter(otp_codes::Column::Code.eq(code))
            .one(&self.db)
            .await
            .context("find otp code")?;
        model.map(otp_from_model).transpose()
    }

    async fn find_current(
        &self,
        user_id: i32,
        purpose: CodePurpose,
    ) -> Result<Option<OtpCode>, FleetServiceError> {
        let model = otp_codes::Entity::find_by_id((user_id, purpose.as_str().to_owned()))
            .one(&self.db)
            .await
            .context("find current otp code")?;
        model.map(otp_from_model).transpose()
    }

    async fn replace(&self, code: &OtpCode) -> Result<(), FleetServiceError> {
        otp_codes::Entity::insert(otp_active_model(code))
            .on_conflict(otp_upsert())
            .exec(&self.db)
            .await
            .context("replace otp code")?;
        Ok(())
    }

    async fn replace_with_outbox(
        &self,
        code: &OtpCode,
        event: &OutboxEvent,
    ) -> Result<(), FleetServiceError> {
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                let code = code.clone();
                let event = event.clone();
                Box::pin(async move {
                    otp_codes::Entity::insert(otp_active_model(&code))
                        .on_conflict(otp_upsert())
                        .exec(txn)
                        .await?;
                    insert_outbox_event(txn, &event).await?;
                    Ok(())
                })
            })
            .await
            .context("replace otp code with outbox")?;
        Ok(())
    }

    async fn delete(
        &self,
        user_id: i32,
        purpose: CodePurpose,
        code: &str,
    ) -> Result<(), FleetServiceError> {
        // Idempotent: zero rows affected is fine.
        otp_codes::Entity::delete_many()
            .filter(otp_codes::Column::UserId.eq(user_id))
            .filter(otp_codes::Column::Purpose.eq(purpose.as_str()))
            .filter(otp_codes::Column::Code.eq(code))
            .exec(&self.db)
            .await
            .context("delete otp code")?;
        Ok(())
    }
}

/// Upsert on the `(user_id, purpose)` primary key: replacement is a single
/// statement, so concurrent issuances for one pair cannot lose both writes
/// the way delete-then-insert could.
fn otp_upsert() -> OnConflict {
    OnConflict::columns([otp_codes::Column::UserId, otp_codes::Column::Purpose])
        .update_columns([
            otp_codes::Column::Code,
            otp_codes::Column::ExpiresAt,
            otp_codes::Column::CreatedAt,
        ])
        .to_owned()
}

fn otp_active_model(code: &OtpCode) -> otp_codes::ActiveModel {
    otp_codes::ActiveModel {
        user_id: Set(code.user_id),
        purpose: Set(code.purpose.as_str().to_owned()),
        code: Set(code.code.clone()),
        expires_at: Set(code.expires_at),
        created_at: Set(code.created_at),
    }
}

fn otp_from_model(model: otp_codes::Model) -> Result<OtpCode, FleetServiceError> {
    let purpose = model
        .purpose
        .parse::<CodePurpose>()
        .map_err(anyhow::Error::from)
        .context("parse stored otp purpose")?;
    Ok(OtpCode {
        user_id: model.user_id,
        purpose,
        code: model.code,
        expires_at: model.expires_at,
        created_at: model.created_at,
    })
}

async fn insert_outbox_event(
    txn: &DatabaseTransaction,
    event: &OutboxEvent,
) -> Result<(), sea_orm::DbErr> {
    let now = Utc::now();
    outbox_events::ActiveModel {
        id: Set(event.id),
        kind: Set(event.kind.clone()),
        payload: Set(event.payload.clone()),
        idempotency_key: Set(event.idempotency_key.clone()),
        attempts: Set(0),
        last_error: Set(None),
        created_at: Set(now),
        next_attempt_at: Set(now),
        processed_at: Set(None),
        failed_at: Set(None),
    }
    .insert(txn)
    .await?;
    Ok(())
}

// ── Submission repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbSubmissionRepository {
    pub db: DatabaseConnection,
}

impl SubmissionRepository for DbSubmissionRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Submission>, FleetServiceError> {
        let model = submissions::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find submission by id")?;
        model.map(submission_from_model).transpose()
    }

    async fn find_by_unique_code(
        &self,
        unique_code: &str,
    ) -> Result<Option<Submission>, FleetServiceError> {
        let model = submissions::Entity::find()
            .filter(submissions::Column::UniqueCode.eq(unique_code))
            .one(&self.db)
            .await
            .context("find submission by unique code")?;
        model.map(submission_from_model).transpose()
    }

    async fn list(
        &self,
        agency_id: Option<i32>,
        status: Option<ApprovalStatus>,
        page: PageRequest,
    ) -> Result<Vec<Submission>, FleetServiceError> {
        let mut query = submissions::Entity::find();
        if let Some(agency_id) = agency_id {
            query = query.filter(submissions::Column::AgencyId.eq(agency_id));
        }
        if let Some(status) = status {
            query = query.filter(submissions::Column::Status.eq(status.as_str()));
        }
        let offset = ((page.page - 1) * page.per_page) as u64;
        let models = query
            .order_by_desc(submissions::Column::CreatedAt)
            .offset(offset)
            .limit(page.per_page as u64)
            .all(&self.db)
            .await
            .context("list submissions")?;
        models.into_iter().map(submission_from_model).collect()
    }

    async fn create_with_log(
        &self,
        new: &NewSubmission,
    ) -> Result<Submission, FleetServiceError> {
        let model = self
            .db
            .transaction::<_, submissions::Model, sea_orm::DbErr>(|txn| {
                let new = new.clone();
                Box::pin(async move {
                    let model = submissions::ActiveModel {
                        unique_code: Set(new.unique_code.clone()),
                        creator_id: Set(new.creator_id),
                        receiver_id: Set(new.receiver_id),
                        amount_rupiah: Set(new.amount_rupiah),
                        status: Set(ApprovalStatus::Pending.as_str().to_owned()),
                        description: Set(new.description.clone()),
                        agency_id: Set(new.agency_id),
                        created_at: Set(new.created_at),
                        updated_at: Set(new.created_at),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?;

                    // The creation event itself is logged: the trail always
                    // holds at least this pending row.
                    submission_logs::ActiveModel {
                        submission_id: Set(model.id),
                        status: Set(ApprovalStatus::Pending.as_str().to_owned()),
                        actor_id: Set(new.creator_id),
                        notes: Set(None),
                        created_at: Set(new.created_at),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?;

                    Ok(model)
                })
            })
            .await
            .context("create submission with log")?;
        submission_from_model(model)
    }

    async fn update_with_log(
        &self,
        id: i32,
        changes: &SubmissionChanges,
        log: &NewLogEntry,
    ) -> Result<Submission, FleetServiceError> {
        let model = self
            .db
            .transaction::<_, submissions::Model, sea_orm::DbErr>(|txn| {
                let changes = changes.clone();
                let log = log.clone();
                Box::pin(async move {
                    let now = Utc::now();
                    let mut am = submissions::ActiveModel {
                        id: Set(id),
                        updated_at: Set(now),
                        ..Default::default()
                    };
                    if let Some(creator_id) = changes.creator_id {
                        am.creator_id = Set(creator_id);
                    }
                    if let Some(receiver_id) = changes.receiver_id {
                        am.receiver_id = Set(receiver_id);
                    }
                    if let Some(amount) = changes.amount_rupiah {
                        am.amount_rupiah = Set(amount);
                    }
                    if let Some(ref description) = changes.description {
                        am.description = Set(Some(description.clone()));
                    }
                    if let Some(status) = changes.status {
                        am.status = Set(status.as_str().to_owned());
                    }
                    let model = am.update(txn).await?;

                    submission_logs::ActiveModel {
                        submission_id: Set(id),
                        status: Set(log.status.as_str().to_owned()),
                        actor_id: Set(log.actor_id),
                        notes: Set(log.notes.clone()),
                        created_at: Set(now),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?;

                    Ok(model)
                })
            })
            .await
            .context("update submission with log")?;
        submission_from_model(model)
    }

    async fn delete(&self, id: i32) -> Result<bool, FleetServiceError> {
        let result = submissions::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete submission")?;
        Ok(result.rows_affected > 0)
    }

    async fn logs(&self, submission_id: i32) -> Result<Vec<SubmissionLog>, FleetServiceError> {
        let models = submission_logs::Entity::find()
            .filter(submission_logs::Column::SubmissionId.eq(submission_id))
            .order_by_asc(submission_logs::Column::CreatedAt)
            .order_by_asc(submission_logs::Column::Id)
            .all(&self.db)
            .await
            .context("list submission logs")?;
        models.into_iter().map(submission_log_from_model).collect()
    }
}

fn submission_from_model(model: submissions::Model) -> Result<Submission, FleetServiceError> {
    let status = model
        .status
        .parse::<ApprovalStatus>()
        .map_err(anyhow::Error::from)
        .context("parse stored submission status")?;
    Ok(Submission {
        id: model.id,
        unique_code: model.unique_code,
        creator_id: model.creator_id,
        receiver_id: model.receiver_id,
        amount_rupiah: model.amount_rupiah,
        status,
        description: model.description,
        agency_id: model.agency_id,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

fn submission_log_from_model(
    model: submission_logs::Model,
) -> Result<SubmissionLog, FleetServiceError> {
    let status = model
        .status
        .parse::<ApprovalStatus>()
        .map_err(anyhow::Error::from)
        .context("parse stored submission log status")?;
    Ok(SubmissionLog {
        id: model.id,
        submission_id: model.submission_id,
        status,
        actor_id: model.actor_id,
        notes: model.notes,
        created_at: model.created_at,
    })
}

// ── Report repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbReportRepository {
    pub db: DatabaseConnection,
}

impl ReportRepository for DbReportRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Report>, FleetServiceError> {
        let model = reports::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find report by id")?;
        model.map(report_from_model).transpose()
    }

    async fn find_by_unique_code(
        &self,
        unique_code: &str,
    ) -> Result<Option<Report>, FleetServiceError> {
        let model = reports::Entity::find()
            .filter(reports::Column::UniqueCode.eq(unique_code))
            .one(&self.db)
            .await
            .context("find report by unique code")?;
        model.map(report_from_model).transpose()
    }

    async fn list(
        &self,
        agency_id: Option<i32>,
        status: Option<ApprovalStatus>,
        page: PageRequest,
    ) -> Result<Vec<Report>, FleetServiceError> {
        let mut query = reports::Entity::find();
        if let Some(agency_id) = agency_id {
            query = query.filter(reports::Column::AgencyId.eq(agency_id));
        }
        if let Some(status) = status {
            query = query.filter(reports::Column::Status.eq(status.as_str()));
        }
        let offset = ((page.page - 1) * page.per_page) as u64;
        let models = query
            .order_by_desc(reports::Column::CreatedAt)
            .offset(offset)
            .limit(page.per_page as u64)
            .all(&self.db)
            .await
            .context("list reports")?;
        models.into_iter().map(report_from_model).collect()
    }

    async fn create_with_log(&self, new: &NewReport) -> Result<Report, FleetServiceError> {
        let model = self
            .db
            .transaction::<_, reports::Model, sea_orm::DbErr>(|txn| {
                let new = new.clone();
                Box::pin(async move {
                    let model = reports::ActiveModel {
                        unique_code: Set(new.unique_code.clone()),
                        user_id: Set(new.user_id),
                        vehicle_id: Set(new.vehicle_id),
                        amount_rupiah: Set(new.amount_rupiah),
                        amount_liter: Set(new.amount_liter),
                        status: Set(ApprovalStatus::Pending.as_str().to_owned()),
                        gps_lat: Set(new.gps_lat),
                        gps_lng: Set(new.gps_lng),
                        odometer_km: Set(new.odometer_km),
                        vehicle_photo: Set(new.evidence.vehicle_photo.clone()),
                        odometer_photo: Set(new.evidence.odometer_photo.clone()),
                        invoice_photo: Set(new.evidence.invoice_photo.clone()),
                        companion_photo: Set(new.evidence.companion_photo.clone()),
                        agency_id: Set(new.agency_id),
                        created_at: Set(new.created_at),
                        updated_at: Set(new.created_at),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?;

                    report_logs::ActiveModel {
                        report_id: Set(model.id),
                        status: Set(ApprovalStatus::Pending.as_str().to_owned()),
                        actor_id: Set(new.user_id),
                        notes: Set(None),
                        created_at: Set(new.created_at),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?;

                    Ok(model)
                })
            })
            .await
            .context("create report with log")?;
        report_from_model(model)
    }

    async fn update_status_with_log(
        &self,
        id: i32,
        status: ApprovalStatus,
        log: &NewLogEntry,
    ) -> Result<Report, FleetServiceError> {
        let model = self
            .db
            .transaction::<_, reports::Model, sea_orm::DbErr>(|txn| {
                let log = log.clone();
                Box::pin(async move {
                    let now = Utc::now();
                    let model = reports::ActiveModel {
                        id: Set(id),
                        status: Set(status.as_str().to_owned()),
                        updated_at: Set(now),
                        ..Default::default()
                    }
                    .update(txn)
                    .await?;

                    report_logs::ActiveModel {
                        report_id: Set(id),
                        status: Set(log.status.as_str().to_owned()),
                        actor_id: Set(log.actor_id),
                        notes: Set(log.notes.clone()),
                        created_at: Set(now),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?;

                    Ok(model)
                })
            })
            .await
            .context("update report status with log")?;
        report_from_model(model)
    }

    async fn update_evidence(
        &self,
        id: i32,
        patch: &EvidencePatch,
    ) -> Result<Report, FleetServiceError> {
        // No transaction and no log row: evidence patches are not audited.
        let mut am = reports::ActiveModel {
            id: Set(id),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        if let Some(gps_lat) = patch.gps_lat {
            am.gps_lat = Set(Some(gps_lat));
        }
        if let Some(gps_lng) = patch.gps_lng {
            am.gps_lng = Set(Some(gps_lng));
        }
        if let Some(odometer_km) = patch.odometer_km {
            am.odometer_km = Set(Some(odometer_km));
        }
        if let Some(ref path) = patch.vehicle_photo {
            am.vehicle_photo = Set(Some(path.clone()));
        }
        if let Some(ref path) = patch.odometer_photo {
            am.odometer_photo = Set(Some(path.clone()));
        }
        if let Some(ref path) = patch.invoice_photo {
            am.invoice_photo = Set(Some(path.clone()));
        }
        if let Some(ref path) = patch.companion_photo {
            am.companion_photo = Set(Some(path.clone()));
        }
        let model = am
            .update(&self.db)
            .await
            .context("update report evidence")?;
        report_from_model(model)
    }

    async fn logs(&self, report_id: i32) -> Result<Vec<ReportLog>, FleetServiceError> {
        let models = report_logs::Entity::find()
            .filter(report_logs::Column::ReportId.eq(report_id))
            .order_by_asc(report_logs::Column::CreatedAt)
            .order_by_asc(report_logs::Column::Id)
            .all(&self.db)
            .await
            .context("list report logs")?;
        models.into_iter().map(report_log_from_model).collect()
    }
}

fn report_from_model(model: reports::Model) -> Result<Report, FleetServiceError> {
    let status = model
        .status
        .parse::<ApprovalStatus>()
        .map_err(anyhow::Error::from)
        .context("parse stored report status")?;
    Ok(Report {
        id: model.id,
        unique_code: model.unique_code,
        user_id: model.user_id,
        vehicle_id: model.vehicle_id,
        amount_rupiah: model.amount_rupiah,
        amount_liter: model.amount_liter,
        status,
        gps_lat: model.gps_lat,
        gps_lng: model.gps_lng,
        odometer_km: model.odometer_km,
        evidence: ReportEvidence {
            vehicle_photo: model.vehicle_photo,
            odometer_photo: model.odometer_photo,
            invoice_photo: model.invoice_photo,
            companion_photo: model.companion_photo,
        },
        agency_id: model.agency_id,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

fn report_log_from_model(model: report_logs::Model) -> Result<ReportLog, FleetServiceError> {
    let status = model
        .status
        .parse::<ApprovalStatus>()
        .map_err(anyhow::Error::from)
        .context("parse stored report log status")?;
    Ok(ReportLog {
        id: model.id,
        report_id: model.report_id,
        status,
        actor_id: model.actor_id,
        notes: model.notes,
        created_at: model.created_at,
    })
}
