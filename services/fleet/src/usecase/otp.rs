use chrono::{Duration, Utc};
use rand::RngExt;

use armada_domain::purpose::CodePurpose;

use crate::domain::repository::OtpCodeRepository;
use crate::domain::types::{OTP_CODE_LEN, OTP_TTL_SECS, OtpCode, OutboxEvent};
use crate::error::FleetServiceError;

/// Charset for generating one-time codes (decimal digits).
const CHARSET: &[u8] = b"0123456789";

fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..OTP_CODE_LEN)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

/// Typed verification failure. Kept engine-internal: user-facing flows
/// collapse both variants into one `InvalidOtp` answer so callers cannot
/// probe whether a code existed.
#[derive(Debug, thiserror::Error)]
pub enum OtpVerifyError {
    /// No row matches `(user, purpose, code)` — never issued or already
    /// consumed; the two are indistinguishable by design.
    #[error("code not found")]
    NotFound,
    /// The row exists but `expires_at` has passed.
    #[error("code expired")]
    Expired,
    #[error(transparent)]
    Repo(#[from] FleetServiceError),
}

impl OtpVerifyError {
    /// Collapse to the uniform user-facing error.
    pub fn into_service_error(self) -> FleetServiceError {
        match self {
            Self::NotFound | Self::Expired => FleetServiceError::InvalidOtp,
            Self::Repo(e) => e,
        }
    }
}

/// Issues, verifies, and consumes one-time codes.
///
/// Verification is non-consuming; the caller applies the guarded side effect
/// first and then calls [`OtpEngine::consume`]. There is no transaction
/// spanning the two steps — a crash in between leaves the code valid for one
/// more replay, which is accepted.
pub struct OtpEngine<R: OtpCodeRepository> {
    pub codes: R,
}

impl<R: OtpCodeRepository> OtpEngine<R> {
    /// Issue a fresh code for `(user, purpose)`, overwriting any existing one
    /// unconditionally — latest code wins, even before the old one expires.
    pub async fn issue(
        &self,
        user_id: i32,
        purpose: CodePurpose,
    ) -> Result<OtpCode, FleetServiceError> {
        let code = new_otp(user_id, purpose);
        self.codes.replace(&code).await?;
        Ok(code)
    }

    /// Like [`OtpEngine::issue`], plus an outbox event written in the same
    /// transaction (email-delivered purposes). The event is built from the
    /// freshly generated code so the delivery payload can carry its value.
    pub async fn issue_with_event<F>(
        &self,
        user_id: i32,
        purpose: CodePurpose,
        event_fn: F,
    ) -> Result<OtpCode, FleetServiceError>
    where
        F: FnOnce(&OtpCode) -> OutboxEvent,
    {
        let code = new_otp(user_id, purpose);
        let event = event_fn(&code);
        self.codes.replace_with_outbox(&code, &event).await?;
        Ok(code)
    }

    /// Non-consuming check. Succeeds repeatedly until the code is consumed,
    /// replaced, or expires.
    pub async fn verify(
        &self,
        user_id: i32,
        purpose: CodePurpose,
        value: &str,
    ) -> Result<(), OtpVerifyError> {
        let code = self
            .codes
            .find(user_id, purpose, value)
            .await?
            .ok_or(OtpVerifyError::NotFound)?;
        if code.is_expired(Utc::now()) {
            return Err(OtpVerifyError::Expired);
        }
        Ok(())
    }

    /// Burn the code after its guarded effect has been applied. Idempotent.
    pub async fn consume(
        &self,
        user_id: i32,
        purpose: CodePurpose,
        value: &str,
    ) -> Result<(), FleetServiceError> {
        self.codes.delete(user_id, purpose, value).await
    }

    /// Pairing codes are shown on screen as a QR image and must stay stable
    /// while displayed: return the existing unexpired code unchanged, only
    /// issuing when there is none or it has expired. The other purposes
    /// always rotate via [`OtpEngine::issue`].
    pub async fn get_or_create(&self, user_id: i32) -> Result<OtpCode, FleetServiceError> {
        if let Some(existing) = self
            .codes
            .find_current(user_id, CodePurpose::DevicePair)
            .await?
        {
            if !existing.is_expired(Utc::now()) {
                return Ok(existing);
            }
        }
        self.issue(user_id, CodePurpose::DevicePair).await
    }
}

fn new_otp(user_id: i32, purpose: CodePurpose) -> OtpCode {
    let now = Utc::now();
    OtpCode {
        user_id,
        purpose,
        code: generate_code(),
        expires_at: now + Duration::seconds(OTP_TTL_SECS),
        created_at: now,
    }
}
