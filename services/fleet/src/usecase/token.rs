use jsonwebtoken::{EncodingKey, Header, encode};
use std::time::{SystemTime, UNIX_EPOCH};

use armada_auth_types::cookie::{ACCESS_TOKEN_EXP, REFRESH_TOKEN_EXP};
use armada_auth_types::token::{JwtClaims, validate_token};

use crate::domain::repository::{PasswordHasher, UserRepository};
use crate::domain::types::User;
use crate::error::FleetServiceError;

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before UNIX epoch")
        .as_secs()
}

pub fn issue_access_token(user: &User, secret: &str) -> Result<(String, u64), FleetServiceError> {
    let exp = now_secs() + ACCESS_TOKEN_EXP;
    let claims = JwtClaims {
        sub: user.id.to_string(),
        role: user.role,
        exp,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| FleetServiceError::Internal(e.into()))?;
    Ok((token, exp))
}

pub fn issue_refresh_token(user: &User, secret: &str) -> Result<String, FleetServiceError> {
    let exp = now_secs() + REFRESH_TOKEN_EXP;
    let claims = JwtClaims {
        sub: user.id.to_string(),
        role: user.role,
        exp,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| FleetServiceError::Internal(e.into()))
}

// ── CreateToken (login) ───────────────────────────────────────────────────────

pub struct CreateTokenInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug)]
pub struct CreateTokenOutput {
    pub user: User,
    pub access_token: String,
    pub access_token_exp: u64,
    pub refresh_token: String,
}

pub struct CreateTokenUseCase<U: UserRepository, H: PasswordHasher> {
    pub users: U,
    pub hasher: H,
    pub jwt_secret: String,
}

impl<U: UserRepository, H: PasswordHasher> CreateTokenUseCase<U, H> {
    /// Unknown email, wrong password, and unverified account all answer
    /// `InvalidCredential`; login must not reveal which check failed.
    pub async fn execute(
        &self,
        input: CreateTokenInput,
    ) -> Result<CreateTokenOutput, FleetServiceError> {
        let user = self
            .users
            .find_by_email(&input.email)
            .await?
            .ok_or(FleetServiceError::InvalidCredential)?;

        if !self.hasher.verify(&user.password_digest, &input.password)? {
            return Err(FleetServiceError::InvalidCredential);
        }

        if !user.verified {
            return Err(FleetServiceError::InvalidCredential);
        }

        let (access_token, access_token_exp) = issue_access_token(&user, &self.jwt_secret)?;
        let refresh_token = issue_refresh_token(&user, &self.jwt_secret)?;

        Ok(CreateTokenOutput {
            user,
            access_token,
            access_token_exp,
            refresh_token,
        })
    }
}

// ── RefreshToken ─────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct RefreshTokenOutput {
    pub user_id: i32,
    pub user_role: u8,
    pub access_token: String,
    pub access_token_exp: u64,
    pub refresh_token: String,
}

pub struct RefreshTokenUseCase<U: UserRepository> {
    pub users: U,
    pub jwt_secret: String,
}

impl<U: UserRepository> RefreshTokenUseCase<U> {
    pub async fn execute(
        &self,
        refresh_token_value: &str,
    ) -> Result<RefreshTokenOutput, FleetServiceError> {
        // Validate refresh token (sig + exp); expired access token is irrelevant here.
        let claims = validate_token(refresh_token_value, &self.jwt_secret)
            .map_err(|_| FleetServiceError::InvalidRefreshToken)?;

        let user_id = claims
            .sub
            .parse::<i32>()
            .map_err(|_| FleetServiceError::InvalidRefreshToken)?;

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(FleetServiceError::InvalidRefreshToken)?;

        let (access_token, access_token_exp) = issue_access_token(&user, &self.jwt_secret)?;
        let refresh_token = issue_refresh_token(&user, &self.jwt_secret)?;

        Ok(RefreshTokenOutput {
            user_id: user.id,
            user_role: user.role,
            access_token,
            access_token_exp,
            refresh_token,
        })
    }
}
