use serde_json::json;
use uuid::Uuid;

use armada_domain::purpose::CodePurpose;

use crate::domain::repository::{OtpCodeRepository, UserRepository};
use crate::domain::types::OutboxEvent;
use crate::error::FleetServiceError;
use crate::usecase::otp::OtpEngine;

// ── RequestVerificationCode ──────────────────────────────────────────────────

pub struct RequestVerificationCodeInput {
    pub email: String,
}

pub struct RequestVerificationCodeUseCase<U, C>
where
    U: UserRepository,
    C: OtpCodeRepository,
{
    pub users: U,
    pub otp: OtpEngine<C>,
}

impl<U, C> RequestVerificationCodeUseCase<U, C>
where
    U: UserRepository,
    C: OtpCodeRepository,
{
    /// Always answers success; unknown emails and already-verified accounts
    /// perform no side effect (same no-enumeration policy as password reset).
    pub async fn execute(
        &self,
        input: RequestVerificationCodeInput,
    ) -> Result<(), FleetServiceError> {
        let Some(user) = self.users.find_by_email(&input.email).await? else {
            return Ok(());
        };
        if user.verified {
            return Ok(());
        }

        self.otp
            .issue_with_event(user.id, CodePurpose::Register, |code| {
                let event_id = Uuid::new_v4();
                OutboxEvent {
                    id: event_id,
                    kind: "verification_code_created".to_owned(),
                    payload: json!({ "email": input.email, "code": code.code }),
                    idempotency_key: format!("verification_code_created:{event_id}"),
                }
            })
            .await?;
        Ok(())
    }
}

// ── VerifyAccount ────────────────────────────────────────────────────────────

pub struct VerifyAccountInput {
    pub email: String,
    pub code: String,
}

pub struct VerifyAccountUseCase<U, C>
where
    U: UserRepository,
    C: OtpCodeRepository,
{
    pub users: U,
    pub otp: OtpEngine<C>,
}

impl<U, C> VerifyAccountUseCase<U, C>
where
    U: UserRepository,
    C: OtpCodeRepository,
{
    /// Unknown email and wrong/expired code both answer `InvalidOtp`.
    pub async fn execute(&self, input: VerifyAccountInput) -> Result<(), FleetServiceError> {
        let user = self
            .users
            .find_by_email(&input.email)
            .await?
            .ok_or(FleetServiceError::InvalidOtp)?;

        self.otp
            .verify(user.id, CodePurpose::Register, &input.code)
            .await
            .map_err(|e| e.into_service_error())?;

        self.users.mark_verified(user.id).await?;

        // Activation first, then burn the code.
        self.otp
            .consume(user.id, CodePurpose::Register, &input.code)
            .await?;
        Ok(())
    }
}
