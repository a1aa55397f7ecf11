use armada_domain::purpose::CodePurpose;

use crate::domain::repository::{OtpCodeRepository, UserRepository};
use crate::error::FleetServiceError;
use crate::usecase::otp::OtpEngine;
use crate::usecase::pair_token::{decode_pair_token, encode_pair_token};

// ── StartPairing ─────────────────────────────────────────────────────────────

pub struct StartPairingUseCase<C: OtpCodeRepository> {
    pub otp: OtpEngine<C>,
    pub pair_secret: String,
}

impl<C: OtpCodeRepository> StartPairingUseCase<C> {
    /// Returns the signed token the client renders as a QR image. Repeated
    /// calls while the code is unexpired return a token wrapping the same
    /// code, so the on-screen QR stays scannable.
    pub async fn execute(&self, user_id: i32) -> Result<String, FleetServiceError> {
        let code = self.otp.get_or_create(user_id).await?;
        Ok(encode_pair_token(&self.pair_secret, user_id, &code.code))
    }
}

// ── CompletePairing ──────────────────────────────────────────────────────────

pub struct CompletePairingInput {
    pub token: String,
    pub agency_id: i32,
}

pub struct CompletePairingUseCase<U, C>
where
    U: UserRepository,
    C: OtpCodeRepository,
{
    pub users: U,
    pub otp: OtpEngine<C>,
    pub pair_secret: String,
}

impl<U, C> CompletePairingUseCase<U, C>
where
    U: UserRepository,
    C: OtpCodeRepository,
{
    /// Opens the scanned token and redeems the code it wraps. The uid comes
    /// from the signed payload, not the request, so a token scanned from one
    /// account cannot pair a different one.
    pub async fn execute(&self, input: CompletePairingInput) -> Result<i32, FleetServiceError> {
        let claims = decode_pair_token(&self.pair_secret, &input.token)
            .map_err(|_| FleetServiceError::InvalidPairToken)?;

        self.otp
            .verify(claims.uid, CodePurpose::DevicePair, &claims.code)
            .await
            .map_err(|e| e.into_service_error())?;

        if !self.users.exists(claims.uid).await? {
            return Err(FleetServiceError::UserNotFound);
        }
        self.users
            .assign_agency(claims.uid, input.agency_id)
            .await?;

        // Agency assignment first, then burn the code.
        self.otp
            .consume(claims.uid, CodePurpose::DevicePair, &claims.code)
            .await?;
        Ok(claims.uid)
    }
}
