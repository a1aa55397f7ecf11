/// Fleet service configuration loaded from environment variables.
///
/// Secrets are explicit fields threaded through `AppState`; nothing reads
/// them from ambient globals after startup.
#[derive(Debug)]
pub struct FleetConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// HMAC secret for signing JWT access and refresh tokens.
    pub jwt_secret: String,
    /// HMAC secret for signing device-pairing (QR) tokens.
    pub pair_token_secret: String,
    /// Cookie domain attribute (root domain, e.g. "example.go.id").
    pub cookie_domain: String,
    /// TCP port to listen on (default 3114). Env var: `FLEET_PORT`.
    pub fleet_port: u16,
    /// Refuse edits/transitions on terminal Submissions and Reports.
    /// Default false (the permissive legacy behavior). Env var:
    /// `WORKFLOW_LOCK_TERMINAL` ("true"/"1" to enable).
    pub lock_terminal: bool,
}

impl FleetConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET"),
            pair_token_secret: std::env::var("PAIR_TOKEN_SECRET").expect("PAIR_TOKEN_SECRET"),
            cookie_domain: std::env::var("COOKIE_DOMAIN").expect("COOKIE_DOMAIN"),
            fleet_port: std::env::var("FLEET_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3114),
            lock_terminal: std::env::var("WORKFLOW_LOCK_TERMINAL")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        }
    }
}
