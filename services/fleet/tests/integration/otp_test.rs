use chrono::{Duration, Utc};

use armada_domain::purpose::CodePurpose;
use armada_fleet::usecase::otp::{OtpEngine, OtpVerifyError};

use crate::helpers::MockOtpCodeRepo;

fn engine() -> OtpEngine<MockOtpCodeRepo> {
    OtpEngine {
        codes: MockOtpCodeRepo::empty(),
    }
}

#[tokio::test]
async fn should_issue_four_digit_code_with_two_minute_expiry() {
    let otp = engine();
    let code = otp.issue(42, CodePurpose::PasswordReset).await.unwrap();

    assert_eq!(code.code.len(), 4);
    assert!(code.code.chars().all(|c| c.is_ascii_digit()));
    assert_eq!((code.expires_at - code.created_at).num_seconds(), 120);
}

#[tokio::test]
async fn should_keep_exactly_one_row_per_user_and_purpose_after_double_issue() {
    let otp = engine();
    let codes = otp.codes.codes_handle();

    let first = otp.issue(42, CodePurpose::PasswordReset).await.unwrap();
    let second = otp.issue(42, CodePurpose::PasswordReset).await.unwrap();

    assert_eq!(codes.lock().unwrap().len(), 1, "issue must replace, not stack");

    // The replaced code is dead even though it never expired.
    let old = otp
        .verify(42, CodePurpose::PasswordReset, &first.code)
        .await;
    if first.code != second.code {
        assert!(matches!(old, Err(OtpVerifyError::NotFound)));
    }
    otp.verify(42, CodePurpose::PasswordReset, &second.code)
        .await
        .unwrap();
}

#[tokio::test]
async fn should_keep_codes_for_different_purposes_independent() {
    let otp = engine();
    let codes = otp.codes.codes_handle();

    let reset = otp.issue(42, CodePurpose::PasswordReset).await.unwrap();
    let register = otp.issue(42, CodePurpose::Register).await.unwrap();

    assert_eq!(codes.lock().unwrap().len(), 2);
    otp.verify(42, CodePurpose::PasswordReset, &reset.code)
        .await
        .unwrap();
    otp.verify(42, CodePurpose::Register, &register.code)
        .await
        .unwrap();
}

#[tokio::test]
async fn should_verify_repeatedly_without_consuming() {
    let otp = engine();
    let code = otp.issue(7, CodePurpose::Register).await.unwrap();

    for _ in 0..3 {
        otp.verify(7, CodePurpose::Register, &code.code)
            .await
            .unwrap();
    }
    assert_eq!(otp.codes.codes_handle().lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_fail_with_expired_once_past_the_window() {
    let otp = engine();
    let codes = otp.codes.codes_handle();
    let code = otp.issue(42, CodePurpose::PasswordReset).await.unwrap();

    // Steer the stored expiry just past now.
    codes.lock().unwrap()[0].expires_at = Utc::now() - Duration::seconds(1);

    let err = otp
        .verify(42, CodePurpose::PasswordReset, &code.code)
        .await
        .unwrap_err();
    assert!(matches!(err, OtpVerifyError::Expired));

    // Reissue after expiry: the new code verifies, the old one is gone.
    let fresh = otp.issue(42, CodePurpose::PasswordReset).await.unwrap();
    otp.verify(42, CodePurpose::PasswordReset, &fresh.code)
        .await
        .unwrap();
    if code.code != fresh.code {
        let old = otp
            .verify(42, CodePurpose::PasswordReset, &code.code)
            .await;
        assert!(matches!(old, Err(OtpVerifyError::NotFound)));
    }
}

#[tokio::test]
async fn should_answer_not_found_identically_for_consumed_and_never_issued() {
    let otp = engine();
    let code = otp.issue(7, CodePurpose::PasswordReset).await.unwrap();

    otp.verify(7, CodePurpose::PasswordReset, &code.code)
        .await
        .unwrap();
    otp.consume(7, CodePurpose::PasswordReset, &code.code)
        .await
        .unwrap();

    let consumed = otp
        .verify(7, CodePurpose::PasswordReset, &code.code)
        .await
        .unwrap_err();
    let never_issued = otp
        .verify(7, CodePurpose::PasswordReset, "no such code")
        .await
        .unwrap_err();

    // Same error shape for both; nothing leaks about which case occurred.
    assert!(matches!(consumed, OtpVerifyError::NotFound));
    assert!(matches!(never_issued, OtpVerifyError::NotFound));
}

#[tokio::test]
async fn should_treat_consume_as_idempotent() {
    let otp = engine();
    let code = otp.issue(7, CodePurpose::Register).await.unwrap();

    otp.consume(7, CodePurpose::Register, &code.code)
        .await
        .unwrap();
    // Second consume of the same value is a no-op, not an error.
    otp.consume(7, CodePurpose::Register, &code.code)
        .await
        .unwrap();
}

#[tokio::test]
async fn should_return_same_pairing_code_while_unexpired() {
    let otp = engine();

    let first = otp.get_or_create(9).await.unwrap();
    let second = otp.get_or_create(9).await.unwrap();

    // The on-screen QR must stay stable.
    assert_eq!(first.code, second.code);
    assert_eq!(first.expires_at, second.expires_at);
    assert_eq!(otp.codes.codes_handle().lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_rotate_pairing_code_once_expired() {
    let otp = engine();
    let codes = otp.codes.codes_handle();

    otp.get_or_create(9).await.unwrap();
    {
        let mut codes = codes.lock().unwrap();
        // Non-digit marker so the rotated value can never collide with it.
        codes[0].code = "old!".to_owned();
        codes[0].expires_at = Utc::now() - Duration::seconds(1);
    }

    let fresh = otp.get_or_create(9).await.unwrap();
    assert_ne!(fresh.code, "old!");
    assert!(fresh.expires_at > Utc::now());
    assert_eq!(codes.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_write_outbox_event_alongside_issued_code() {
    let otp = engine();
    let events = otp.codes.events_handle();

    let code = otp
        .issue_with_event(42, CodePurpose::PasswordReset, |code| {
            armada_fleet::domain::types::OutboxEvent {
                id: uuid::Uuid::new_v4(),
                kind: "password_reset_code_created".to_owned(),
                payload: serde_json::json!({ "email": "pic@agency.go.id", "code": code.code }),
                idempotency_key: "password_reset_code_created:test".to_owned(),
            }
        })
        .await
        .unwrap();

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, "password_reset_code_created");
    assert_eq!(events[0].payload["code"], code.code);
}
