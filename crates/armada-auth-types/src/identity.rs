//! Gateway-injected identity headers extractor.

use axum::extract::FromRequestParts;
use http::StatusCode;
use http::request::Parts;

/// User identity injected by the gateway via `x-armada-user-id` and
/// `x-armada-user-role` headers.
///
/// Returns 401 if `x-armada-user-id` is absent or cannot be parsed as an
/// integer. Role enforcement (403) is done by use cases after extraction.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: i32,
    pub user_role: u8,
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    // axum-core 0.5 defines this as `fn -> impl Future + Send` (not `async fn`).
    // In Rust 1.82+ precise capturing, `async fn` captures lifetimes differently,
    // causing E0195. Fix: extract values synchronously, return a 'static async move block.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let user_id = parts
            .headers
            .get("x-armada-user-id")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<i32>().ok());

        let user_role = parts
            .headers
            .get("x-armada-user-role")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u8>().ok());

        async move {
            let user_id = user_id.ok_or(StatusCode::UNAUTHORIZED)?;
            let user_role = user_role.ok_or(StatusCode::UNAUTHORIZED)?;
            Ok(Self { user_id, user_role })
        }
    }
}
