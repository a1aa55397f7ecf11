use chrono::{Duration, Utc};

use armada_auth_types::token::validate_access_token;
use armada_domain::purpose::CodePurpose;
use armada_fleet::error::FleetServiceError;
use armada_fleet::usecase::otp::OtpEngine;
use armada_fleet::usecase::password_reset::{
    RequestPasswordResetInput, RequestPasswordResetUseCase, ResetPasswordInput,
    ResetPasswordUseCase,
};
use armada_fleet::usecase::register::{
    RequestVerificationCodeInput, RequestVerificationCodeUseCase, VerifyAccountInput,
    VerifyAccountUseCase,
};
use armada_fleet::usecase::token::{
    CreateTokenInput, CreateTokenUseCase, RefreshTokenUseCase,
};

use crate::helpers::{MockHasher, MockOtpCodeRepo, MockUserRepo, TEST_JWT_SECRET, test_user};

fn login_usecase(users: MockUserRepo) -> CreateTokenUseCase<MockUserRepo, MockHasher> {
    CreateTokenUseCase {
        users,
        hasher: MockHasher,
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    }
}

#[tokio::test]
async fn should_issue_tokens_for_valid_credentials() {
    let user = test_user(7, "pic@agency.go.id", 0);
    let uc = login_usecase(MockUserRepo::new(vec![user]));

    let out = uc
        .execute(CreateTokenInput {
            email: "pic@agency.go.id".to_owned(),
            password: "hunter2".to_owned(),
        })
        .await
        .unwrap();

    let info = validate_access_token(&out.access_token, TEST_JWT_SECRET).unwrap();
    assert_eq!(info.user_id, 7);
    assert_eq!(info.user_role, 0);
    assert_eq!(info.access_token_exp, out.access_token_exp);
}

#[tokio::test]
async fn should_answer_identically_for_unknown_email_and_wrong_password() {
    let user = test_user(7, "pic@agency.go.id", 0);
    let uc = login_usecase(MockUserRepo::new(vec![user]));

    let wrong_password = uc
        .execute(CreateTokenInput {
            email: "pic@agency.go.id".to_owned(),
            password: "wrong".to_owned(),
        })
        .await
        .unwrap_err();
    let unknown_email = uc
        .execute(CreateTokenInput {
            email: "nobody@agency.go.id".to_owned(),
            password: "hunter2".to_owned(),
        })
        .await
        .unwrap_err();

    assert!(matches!(wrong_password, FleetServiceError::InvalidCredential));
    assert!(matches!(unknown_email, FleetServiceError::InvalidCredential));
}

#[tokio::test]
async fn should_reject_unverified_account_with_same_error() {
    let mut user = test_user(7, "pic@agency.go.id", 0);
    user.verified = false;
    let uc = login_usecase(MockUserRepo::new(vec![user]));

    let result = uc
        .execute(CreateTokenInput {
            email: "pic@agency.go.id".to_owned(),
            password: "hunter2".to_owned(),
        })
        .await;
    assert!(matches!(result, Err(FleetServiceError::InvalidCredential)));
}

#[tokio::test]
async fn should_refresh_with_issued_refresh_token() {
    let user = test_user(7, "pic@agency.go.id", 0);
    let login = login_usecase(MockUserRepo::new(vec![user.clone()]));
    let out = login
        .execute(CreateTokenInput {
            email: "pic@agency.go.id".to_owned(),
            password: "hunter2".to_owned(),
        })
        .await
        .unwrap();

    let uc = RefreshTokenUseCase {
        users: MockUserRepo::new(vec![user]),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    let refreshed = uc.execute(&out.refresh_token).await.unwrap();
    assert_eq!(refreshed.user_id, 7);

    let garbage = uc.execute("not-a-jwt").await;
    assert!(matches!(
        garbage,
        Err(FleetServiceError::InvalidRefreshToken)
    ));
}

// ── Password reset flow ──────────────────────────────────────────────────────

#[tokio::test]
async fn should_swallow_reset_request_for_unknown_email() {
    let uc = RequestPasswordResetUseCase {
        users: MockUserRepo::empty(),
        otp: OtpEngine {
            codes: MockOtpCodeRepo::empty(),
        },
    };
    let codes = uc.otp.codes.codes_handle();
    let events = uc.otp.codes.events_handle();

    uc.execute(RequestPasswordResetInput {
        email: "nobody@agency.go.id".to_owned(),
    })
    .await
    .unwrap();

    assert!(codes.lock().unwrap().is_empty());
    assert!(events.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_reset_password_then_burn_the_code() {
    let user = test_user(7, "pic@agency.go.id", 0);
    let request = RequestPasswordResetUseCase {
        users: MockUserRepo::new(vec![user.clone()]),
        otp: OtpEngine {
            codes: MockOtpCodeRepo::empty(),
        },
    };
    let codes = request.otp.codes.codes_handle();
    let events = request.otp.codes.events_handle();

    request
        .execute(RequestPasswordResetInput {
            email: "pic@agency.go.id".to_owned(),
        })
        .await
        .unwrap();

    let issued = codes.lock().unwrap()[0].clone();
    assert_eq!(events.lock().unwrap().len(), 1, "email rides the outbox");

    let reset = ResetPasswordUseCase {
        users: MockUserRepo::new(vec![user]),
        otp: OtpEngine {
            codes: MockOtpCodeRepo {
                codes: codes.clone(),
                events: events.clone(),
            },
        },
        hasher: MockHasher,
    };
    let users = reset.users.users_handle();

    reset
        .execute(ResetPasswordInput {
            email: "pic@agency.go.id".to_owned(),
            code: issued.code.clone(),
            new_password: "correct horse".to_owned(),
        })
        .await
        .unwrap();

    assert_eq!(
        users.lock().unwrap()[0].password_digest,
        "digest:correct horse"
    );
    assert!(codes.lock().unwrap().is_empty(), "code consumed after the effect");

    // Replay with the burnt code fails like a code that never existed.
    let replay = reset
        .execute(ResetPasswordInput {
            email: "pic@agency.go.id".to_owned(),
            code: issued.code,
            new_password: "another".to_owned(),
        })
        .await;
    assert!(matches!(replay, Err(FleetServiceError::InvalidOtp)));
}

#[tokio::test]
async fn should_reject_expired_reset_code_without_changing_password() {
    let user = test_user(7, "pic@agency.go.id", 0);
    let uc = ResetPasswordUseCase {
        users: MockUserRepo::new(vec![user]),
        otp: OtpEngine {
            codes: MockOtpCodeRepo::empty(),
        },
        hasher: MockHasher,
    };
    let users = uc.users.users_handle();

    let code = uc.otp.issue(7, CodePurpose::PasswordReset).await.unwrap();
    uc.otp.codes.codes_handle().lock().unwrap()[0].expires_at =
        Utc::now() - Duration::seconds(1);

    let result = uc
        .execute(ResetPasswordInput {
            email: "pic@agency.go.id".to_owned(),
            code: code.code,
            new_password: "new".to_owned(),
        })
        .await;

    assert!(matches!(result, Err(FleetServiceError::InvalidOtp)));
    assert_eq!(
        users.lock().unwrap()[0].password_digest,
        "digest:hunter2",
        "password must be untouched"
    );
}

// ── Account verification flow ────────────────────────────────────────────────

#[tokio::test]
async fn should_verify_account_and_consume_register_code() {
    let mut user = test_user(7, "pic@agency.go.id", 0);
    user.verified = false;

    let request = RequestVerificationCodeUseCase {
        users: MockUserRepo::new(vec![user.clone()]),
        otp: OtpEngine {
            codes: MockOtpCodeRepo::empty(),
        },
    };
    let codes = request.otp.codes.codes_handle();
    let events = request.otp.codes.events_handle();

    request
        .execute(RequestVerificationCodeInput {
            email: "pic@agency.go.id".to_owned(),
        })
        .await
        .unwrap();
    let issued = codes.lock().unwrap()[0].clone();

    let verify = VerifyAccountUseCase {
        users: MockUserRepo::new(vec![user]),
        otp: OtpEngine {
            codes: MockOtpCodeRepo {
                codes: codes.clone(),
                events: events.clone(),
            },
        },
    };
    let users = verify.users.users_handle();

    verify
        .execute(VerifyAccountInput {
            email: "pic@agency.go.id".to_owned(),
            code: issued.code,
        })
        .await
        .unwrap();

    assert!(users.lock().unwrap()[0].verified);
    assert!(codes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_not_issue_verification_code_for_verified_account() {
    let user = test_user(7, "pic@agency.go.id", 0);
    let uc = RequestVerificationCodeUseCase {
        users: MockUserRepo::new(vec![user]),
        otp: OtpEngine {
            codes: MockOtpCodeRepo::empty(),
        },
    };
    let codes = uc.otp.codes.codes_handle();

    uc.execute(RequestVerificationCodeInput {
        email: "pic@agency.go.id".to_owned(),
    })
    .await
    .unwrap();

    assert!(codes.lock().unwrap().is_empty());
}
