//! One-time-code purpose discriminator.

use serde::{Deserialize, Serialize};

/// What a one-time code authorizes.
///
/// Stored as a lowercase string; part of the `otp_codes` primary key, so the
/// same user may hold one live code per purpose simultaneously.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodePurpose {
    /// Account verification after registration.
    Register,
    /// Password reset.
    PasswordReset,
    /// Device pairing via QR scan.
    DevicePair,
}

/// Error returned when parsing an unknown purpose string.
#[derive(Debug, thiserror::Error)]
#[error("unknown code purpose: {0}")]
pub struct UnknownPurpose(pub String);

impl CodePurpose {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Register => "register",
            Self::PasswordReset => "password_reset",
            Self::DevicePair => "device_pair",
        }
    }
}

impl std::str::FromStr for CodePurpose {
    type Err = UnknownPurpose;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "register" => Ok(Self::Register),
            "password_reset" => Ok(Self::PasswordReset),
            "device_pair" => Ok(Self::DevicePair),
            other => Err(UnknownPurpose(other.to_owned())),
        }
    }
}

impl std::fmt::Display for CodePurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
