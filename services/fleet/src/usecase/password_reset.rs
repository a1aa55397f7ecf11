use serde_json::json;
use uuid::Uuid;

use armada_domain::purpose::CodePurpose;

use crate::domain::repository::{OtpCodeRepository, PasswordHasher, UserRepository};
use crate::domain::types::OutboxEvent;
use crate::error::FleetServiceError;
use crate::usecase::otp::OtpEngine;

// ── RequestPasswordReset ─────────────────────────────────────────────────────

pub struct RequestPasswordResetInput {
    pub email: String,
}

pub struct RequestPasswordResetUseCase<U, C>
where
    U: UserRepository,
    C: OtpCodeRepository,
{
    pub users: U,
    pub otp: OtpEngine<C>,
}

impl<U, C> RequestPasswordResetUseCase<U, C>
where
    U: UserRepository,
    C: OtpCodeRepository,
{
    /// Always answers success. An unknown email performs no side effect but
    /// is indistinguishable from the mailed case; reset requests must not
    /// confirm which addresses have accounts.
    pub async fn execute(
        &self,
        input: RequestPasswordResetInput,
    ) -> Result<(), FleetServiceError> {
        let Some(user) = self.users.find_by_email(&input.email).await? else {
            return Ok(());
        };

        let code = self
            .otp
            .issue_with_event(user.id, CodePurpose::PasswordReset, |code| {
                let event_id = Uuid::new_v4();
                OutboxEvent {
                    id: event_id,
                    kind: "password_reset_code_created".to_owned(),
                    payload: json!({ "email": input.email, "code": code.code }),
                    idempotency_key: format!("password_reset_code_created:{event_id}"),
                }
            })
            .await?;

        tracing::debug!(user_id = user.id, expires_at = %code.expires_at, "password reset code issued");
        Ok(())
    }
}

// ── ResetPassword ────────────────────────────────────────────────────────────

pub struct ResetPasswordInput {
    pub email: String,
    pub code: String,
    pub new_password: String,
}

pub struct ResetPasswordUseCase<U, C, H>
where
    U: UserRepository,
    C: OtpCodeRepository,
    H: PasswordHasher,
{
    pub users: U,
    pub otp: OtpEngine<C>,
    pub hasher: H,
}

impl<U, C, H> ResetPasswordUseCase<U, C, H>
where
    U: UserRepository,
    C: OtpCodeRepository,
    H: PasswordHasher,
{
    /// Unknown email and wrong/expired code both answer `InvalidOtp`.
    pub async fn execute(&self, input: ResetPasswordInput) -> Result<(), FleetServiceError> {
        let user = self
            .users
            .find_by_email(&input.email)
            .await?
            .ok_or(FleetServiceError::InvalidOtp)?;

        self.otp
            .verify(user.id, CodePurpose::PasswordReset, &input.code)
            .await
            .map_err(|e| e.into_service_error())?;

        let digest = self.hasher.hash(&input.new_password)?;
        self.users.update_password(user.id, &digest).await?;

        // Consume only after the password write landed. A crash between the
        // two steps leaves the code valid for one more replay; the reverse
        // order would burn the code without applying its effect.
        self.otp
            .consume(user.id, CodePurpose::PasswordReset, &input.code)
            .await?;
        Ok(())
    }
}
