use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use tower_http::trace::TraceLayer;

use armada_core::health::{healthz, readyz};
use armada_core::middleware::request_id_layer;

use crate::handlers::{
    account::{
        create_password_reset_code, create_verification_code, reset_password, verify_account,
    },
    pair::{complete_pairing, start_pairing},
    report::{
        create_report, get_report, list_reports, report_logs, transition_report,
        update_report_evidence,
    },
    submission::{
        create_submission, delete_submission, get_submission, list_submissions, submission_logs,
        transition_submission, update_submission,
    },
    token::{check_token, create_token, refresh_token, revoke_token},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Token
        .route("/auth/token", get(check_token))
        .route("/auth/token", post(create_token))
        .route("/auth/token", patch(refresh_token))
        .route("/auth/token", delete(revoke_token))
        // Password reset
        .route("/auth/password/code", post(create_password_reset_code))
        .route("/auth/password", patch(reset_password))
        // Account verification
        .route("/auth/verification/code", post(create_verification_code))
        .route("/auth/verification", patch(verify_account))
        // Device pairing (QR)
        .route("/auth/pairing", post(start_pairing))
        .route("/auth/pairing", patch(complete_pairing))
        // Submissions
        .route("/submissions", post(create_submission))
        .route("/submissions", get(list_submissions))
        .route("/submissions/{id}", get(get_submission))
        .route("/submissions/{id}", patch(update_submission))
        .route("/submissions/{id}", delete(delete_submission))
        .route("/submissions/{id}/status", patch(transition_submission))
        .route("/submissions/{id}/logs", get(submission_logs))
        // Reports
        .route("/reports", post(create_report))
        .route("/reports", get(list_reports))
        .route("/reports/{id}", get(get_report))
        .route("/reports/{id}/status", patch(transition_report))
        .route("/reports/{id}/evidence", patch(update_report_evidence))
        .route("/reports/{id}/logs", get(report_logs))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
