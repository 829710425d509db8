use uservault_auth::error::AuthServiceError;
use uservault_auth::usecase::login::{LoginInput, LoginOutput, LoginUseCase};
use uservault_auth_types::token::{AAL1, validate_access_token, validate_mfa_token};

use crate::helpers::{
    MockBotVerifier, MockFactorRepo, MockUserRepo, TEST_JWT_SECRET, test_factor,
    test_user_with_password,
};

fn login_input(email: &str, password: &str) -> LoginInput {
    LoginInput {
        email: email.to_owned(),
        password: password.to_owned(),
        bot_token: "captcha-token".to_owned(),
    }
}

fn usecase(users: MockUserRepo, factors: MockFactorRepo) -> LoginUseCase<MockUserRepo, MockFactorRepo, MockBotVerifier> {
    LoginUseCase {
        users,
        factors,
        bot_verifier: MockBotVerifier { ok: true },
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    }
}

#[tokio::test]
async fn should_open_session_for_valid_credentials() {
    let user = test_user_with_password("Aa1!aaaa");
    let uc = usecase(MockUserRepo::new(vec![user.clone()]), MockFactorRepo::empty());

    let out = uc
        .execute(login_input("user@example.com", "Aa1!aaaa"))
        .await
        .unwrap();

    match out {
        LoginOutput::Session {
            user_id,
            user_role,
            access_token,
            ..
        } => {
            assert_eq!(user_id, user.id);
            assert_eq!(user_role, 0);
            let info = validate_access_token(&access_token, TEST_JWT_SECRET).unwrap();
            assert_eq!(info.user_id, user.id);
            assert_eq!(info.aal, AAL1);
        }
        other => panic!("expected a session, got {other:?}"),
    }
}

#[tokio::test]
async fn should_reject_wrong_password() {
    let user = test_user_with_password("Aa1!aaaa");
    let uc = usecase(MockUserRepo::new(vec![user]), MockFactorRepo::empty());

    let result = uc
        .execute(login_input("user@example.com", "Bb2@bbbb"))
        .await;
    assert!(matches!(result, Err(AuthServiceError::InvalidCredential)));
}

#[tokio::test]
async fn should_reject_unknown_email_identically_to_wrong_password() {
    let uc = usecase(MockUserRepo::empty(), MockFactorRepo::empty());

    let result = uc
        .execute(login_input("nobody@example.com", "Aa1!aaaa"))
        .await;
    assert!(matches!(result, Err(AuthServiceError::InvalidCredential)));
}

#[tokio::test]
async fn should_reject_password_below_login_floor() {
    let uc = usecase(MockUserRepo::empty(), MockFactorRepo::empty());

    let result = uc.execute(login_input("user@example.com", "12345")).await;
    assert!(matches!(result, Err(AuthServiceError::InvalidCredential)));
}

#[tokio::test]
async fn should_reject_banned_account_after_password_check() {
    let mut user = test_user_with_password("Aa1!aaaa");
    user.banned = true;
    let uc = usecase(MockUserRepo::new(vec![user]), MockFactorRepo::empty());

    let result = uc
        .execute(login_input("user@example.com", "Aa1!aaaa"))
        .await;
    assert!(matches!(result, Err(AuthServiceError::AccountBanned)));
}

#[tokio::test]
async fn should_reject_login_when_bot_check_fails() {
    let user = test_user_with_password("Aa1!aaaa");
    let uc = LoginUseCase {
        users: MockUserRepo::new(vec![user]),
        factors: MockFactorRepo::empty(),
        bot_verifier: MockBotVerifier { ok: false },
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let result = uc
        .execute(login_input("user@example.com", "Aa1!aaaa"))
        .await;
    assert!(matches!(result, Err(AuthServiceError::BotCheckFailed)));
}

#[tokio::test]
async fn should_require_mfa_when_a_verified_factor_exists() {
    let user = test_user_with_password("Aa1!aaaa");
    let factor = test_factor(user.id, true);
    let uc = usecase(
        MockUserRepo::new(vec![user.clone()]),
        MockFactorRepo::new(vec![factor.clone()]),
    );

    let out = uc
        .execute(login_input("user@example.com", "Aa1!aaaa"))
        .await
        .unwrap();

    match out {
        LoginOutput::MfaRequired {
            factor_id,
            mfa_token,
        } => {
            assert_eq!(factor_id, factor.id);
            // The pending token names the user but opens no session.
            let info = validate_mfa_token(&mfa_token, TEST_JWT_SECRET).unwrap();
            assert_eq!(info.user_id, user.id);
            assert!(validate_access_token(&mfa_token, TEST_JWT_SECRET).is_err());
        }
        other => panic!("expected an MFA challenge, got {other:?}"),
    }
}

#[tokio::test]
async fn should_not_require_mfa_for_unverified_factor() {
    let user = test_user_with_password("Aa1!aaaa");
    let factor = test_factor(user.id, false);
    let uc = usecase(
        MockUserRepo::new(vec![user]),
        MockFactorRepo::new(vec![factor]),
    );

    let out = uc
        .execute(login_input("user@example.com", "Aa1!aaaa"))
        .await
        .unwrap();
    assert!(
        matches!(out, LoginOutput::Session { .. }),
        "abandoned enrollment must not gate login"
    );
}
