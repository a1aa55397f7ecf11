use chrono::{Duration, Utc};

use armada_fleet::error::FleetServiceError;
use armada_fleet::usecase::otp::OtpEngine;
use armada_fleet::usecase::pair_token::{decode_pair_token, encode_pair_token};
use armada_fleet::usecase::pairing::{
    CompletePairingInput, CompletePairingUseCase, StartPairingUseCase,
};

use crate::helpers::{MockOtpCodeRepo, MockUserRepo, TEST_PAIR_SECRET, test_user};

fn start_usecase() -> StartPairingUseCase<MockOtpCodeRepo> {
    StartPairingUseCase {
        otp: OtpEngine {
            codes: MockOtpCodeRepo::empty(),
        },
        pair_secret: TEST_PAIR_SECRET.to_owned(),
    }
}

#[tokio::test]
async fn should_return_token_wrapping_the_stored_pairing_code() {
    let uc = start_usecase();
    let codes = uc.otp.codes.codes_handle();

    let token = uc.execute(9).await.unwrap();

    let claims = decode_pair_token(TEST_PAIR_SECRET, &token).unwrap();
    let stored = codes.lock().unwrap()[0].clone();
    assert_eq!(claims.uid, 9);
    assert_eq!(claims.code, stored.code);
}

#[tokio::test]
async fn should_keep_the_wrapped_code_stable_across_repeated_starts() {
    let uc = start_usecase();

    let first = uc.execute(9).await.unwrap();
    let second = uc.execute(9).await.unwrap();

    let a = decode_pair_token(TEST_PAIR_SECRET, &first).unwrap();
    let b = decode_pair_token(TEST_PAIR_SECRET, &second).unwrap();
    assert_eq!(a.code, b.code, "unexpired pairing code must not rotate");
}

fn complete_usecase(users: MockUserRepo) -> CompletePairingUseCase<MockUserRepo, MockOtpCodeRepo> {
    CompletePairingUseCase {
        users,
        otp: OtpEngine {
            codes: MockOtpCodeRepo::empty(),
        },
        pair_secret: TEST_PAIR_SECRET.to_owned(),
    }
}

#[tokio::test]
async fn should_assign_agency_and_consume_code_on_completion() {
    let user = test_user(9, "pic@agency.go.id", 0);
    let uc = complete_usecase(MockUserRepo::new(vec![user]));
    let users = uc.users.users_handle();
    let codes = uc.otp.codes.codes_handle();

    let code = uc.otp.get_or_create(9).await.unwrap();
    let token = encode_pair_token(TEST_PAIR_SECRET, 9, &code.code);

    let paired = uc
        .execute(CompletePairingInput {
            token: token.clone(),
            agency_id: 3,
        })
        .await
        .unwrap();

    assert_eq!(paired, 9);
    assert_eq!(users.lock().unwrap()[0].agency_id, Some(3));
    assert!(codes.lock().unwrap().is_empty(), "pairing code must be consumed");

    // Replay of the same scanned token is rejected.
    let replay = uc
        .execute(CompletePairingInput {
            token,
            agency_id: 3,
        })
        .await;
    assert!(matches!(replay, Err(FleetServiceError::InvalidOtp)));
}

#[tokio::test]
async fn should_reject_tampered_token() {
    let user = test_user(9, "pic@agency.go.id", 0);
    let uc = complete_usecase(MockUserRepo::new(vec![user]));

    let code = uc.otp.get_or_create(9).await.unwrap();
    let token = encode_pair_token(TEST_PAIR_SECRET, 9, &code.code);
    let mut tampered = token.into_bytes();
    let last = tampered.len() - 1;
    tampered[last] ^= 0x01;
    let tampered = String::from_utf8(tampered).unwrap();

    let result = uc
        .execute(CompletePairingInput {
            token: tampered,
            agency_id: 3,
        })
        .await;
    assert!(matches!(result, Err(FleetServiceError::InvalidPairToken)));
}

#[tokio::test]
async fn should_reject_token_signed_with_foreign_secret() {
    let user = test_user(9, "pic@agency.go.id", 0);
    let uc = complete_usecase(MockUserRepo::new(vec![user]));

    let code = uc.otp.get_or_create(9).await.unwrap();
    let forged = encode_pair_token("some-other-secret", 9, &code.code);

    let result = uc
        .execute(CompletePairingInput {
            token: forged,
            agency_id: 3,
        })
        .await;
    assert!(matches!(result, Err(FleetServiceError::InvalidPairToken)));
}

#[tokio::test]
async fn should_reject_expired_pairing_code_as_invalid_otp() {
    let user = test_user(9, "pic@agency.go.id", 0);
    let uc = complete_usecase(MockUserRepo::new(vec![user]));
    let codes = uc.otp.codes.codes_handle();

    let code = uc.otp.get_or_create(9).await.unwrap();
    codes.lock().unwrap()[0].expires_at = Utc::now() - Duration::seconds(1);
    let token = encode_pair_token(TEST_PAIR_SECRET, 9, &code.code);

    let result = uc
        .execute(CompletePairingInput {
            token,
            agency_id: 3,
        })
        .await;
    // Expired and unknown collapse to the same outward error.
    assert!(matches!(result, Err(FleetServiceError::InvalidOtp)));
}
