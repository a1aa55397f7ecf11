use sea_orm::DatabaseConnection;

use crate::domain::types::WorkflowPolicy;
use crate::infra::db::{
    DbOtpCodeRepository, DbReportRepository, DbSubmissionRepository, DbUserRepository,
    DbVehicleRepository,
};
use crate::infra::password::Argon2PasswordHasher;
use crate::usecase::otp::OtpEngine;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub jwt_secret: String,
    pub pair_token_secret: String,
    pub cookie_domain: String,
    pub policy: WorkflowPolicy,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn vehicle_repo(&self) -> DbVehicleRepository {
        DbVehicleRepository {
            db: self.db.clone(),
        }
    }

    pub fn submission_repo(&self) -> DbSubmissionRepository {
        DbSubmissionRepository {
            db: self.db.clone(),
        }
    }

    pub fn report_repo(&self) -> DbReportRepository {
        DbReportRepository {
            db: self.db.clone(),
        }
    }

    pub fn otp_engine(&self) -> OtpEngine<DbOtpCodeRepository> {
        OtpEngine {
            codes: DbOtpCodeRepository {
                db: self.db.clone(),
            },
        }
    }

    pub fn password_hasher(&self) -> Argon2PasswordHasher {
        Argon2PasswordHasher
    }
}
