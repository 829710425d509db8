use uservault_auth::domain::types::CodePurpose;
use uservault_auth::error::AuthServiceError;
use uservault_auth::usecase::signup::{
    CompleteSignupInput, CompleteSignupUseCase, StartSignupInput, StartSignupUseCase,
};
use uservault_auth_types::token::{AAL1, validate_access_token};

use crate::helpers::{
    MockBotVerifier, MockCodeRepo, MockRateLimiter, MockUserRepo, TEST_JWT_SECRET, test_code,
    test_user,
};

fn start_input(email: &str) -> StartSignupInput {
    StartSignupInput {
        email: email.to_owned(),
        bot_token: "captcha-token".to_owned(),
        client_ip: "203.0.113.9".to_owned(),
    }
}

// ── StartSignup ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_email_signup_code_for_new_address() {
    let codes = MockCodeRepo::empty();
    let uc = StartSignupUseCase {
        users: MockUserRepo::empty(),
        codes: codes.clone(),
        rate_limiter: MockRateLimiter::new(),
        bot_verifier: MockBotVerifier { ok: true },
    };

    uc.execute(start_input("new@example.com")).await.unwrap();

    let stored = codes.codes.lock().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].email, "new@example.com");
    assert_eq!(stored[0].purpose, CodePurpose::Signup);
    assert_eq!(stored[0].code.len(), 6);
    assert!(stored[0].code.bytes().all(|b| b.is_ascii_digit()));

    let events = codes.events.lock().unwrap();
    assert_eq!(events.len(), 1, "code creation must queue an outbox event");
    assert_eq!(events[0].kind, "verification_code_created");
    assert_eq!(events[0].payload["purpose"], "signup");
}

#[tokio::test]
async fn should_reject_signup_start_for_taken_email() {
    let uc = StartSignupUseCase {
        users: MockUserRepo::new(vec![test_user()]),
        codes: MockCodeRepo::empty(),
        rate_limiter: MockRateLimiter::new(),
        bot_verifier: MockBotVerifier { ok: true },
    };

    let result = uc.execute(start_input("user@example.com")).await;
    assert!(matches!(result, Err(AuthServiceError::EmailTaken)));
}

#[tokio::test]
async fn should_reject_signup_start_when_bot_check_fails() {
    let codes = MockCodeRepo::empty();
    let uc = StartSignupUseCase {
        users: MockUserRepo::empty(),
        codes: codes.clone(),
        rate_limiter: MockRateLimiter::new(),
        bot_verifier: MockBotVerifier { ok: false },
    };

    let result = uc.execute(start_input("new@example.com")).await;
    assert!(matches!(result, Err(AuthServiceError::BotCheckFailed)));
    assert!(codes.codes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_reject_signup_start_for_malformed_email() {
    let uc = StartSignupUseCase {
        users: MockUserRepo::empty(),
        codes: MockCodeRepo::empty(),
        rate_limiter: MockRateLimiter::new(),
        bot_verifier: MockBotVerifier { ok: true },
    };

    let result = uc.execute(start_input("not-an-email")).await;
    assert!(matches!(result, Err(AuthServiceError::InvalidEmail)));
}

// ── CompleteSignup ───────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_account_and_open_session_with_valid_code() {
    let users = MockUserRepo::empty();
    let codes = MockCodeRepo::new(vec![test_code("new@example.com", CodePurpose::Signup)]);

    let uc = CompleteSignupUseCase {
        users: users.clone(),
        codes: codes.clone(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let out = uc
        .execute(CompleteSignupInput {
            email: "new@example.com".to_owned(),
            code: "123456".to_owned(),
            username: "newuser".to_owned(),
            password: "Aa1!aaaa".to_owned(),
        })
        .await
        .unwrap();

    let stored = users.users.lock().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].email, "new@example.com");
    assert_eq!(stored[0].username, "newuser");
    assert_eq!(stored[0].role, 0);

    // Fresh accounts have no second factor; the session opens at AAL1.
    let info = validate_access_token(&out.access_token, TEST_JWT_SECRET).unwrap();
    assert_eq!(info.user_id, stored[0].id);
    assert_eq!(info.aal, AAL1);

    // The code is burned.
    assert!(codes.codes.lock().unwrap()[0].used_at.is_some());
}

#[tokio::test]
async fn should_reject_wrong_code_without_creating_account() {
    let users = MockUserRepo::empty();
    let codes = MockCodeRepo::new(vec![test_code("new@example.com", CodePurpose::Signup)]);

    let uc = CompleteSignupUseCase {
        users: users.clone(),
        codes,
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let result = uc
        .execute(CompleteSignupInput {
            email: "new@example.com".to_owned(),
            code: "654321".to_owned(),
            username: "newuser".to_owned(),
            password: "Aa1!aaaa".to_owned(),
        })
        .await;

    assert!(matches!(result, Err(AuthServiceError::InvalidCode)));
    assert!(users.users.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_reject_weak_password_before_touching_the_code() {
    let codes = MockCodeRepo::new(vec![test_code("new@example.com", CodePurpose::Signup)]);

    let uc = CompleteSignupUseCase {
        users: MockUserRepo::empty(),
        codes: codes.clone(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let result = uc
        .execute(CompleteSignupInput {
            email: "new@example.com".to_owned(),
            code: "123456".to_owned(),
            username: "newuser".to_owned(),
            password: "short".to_owned(),
        })
        .await;

    assert!(matches!(result, Err(AuthServiceError::WeakPassword(_))));
    // Policy failures must not consume the code; the user retries with the
    // same emailed code.
    assert!(codes.codes.lock().unwrap()[0].used_at.is_none());
}

#[tokio::test]
async fn should_reject_taken_username_after_burning_code() {
    let codes = MockCodeRepo::new(vec![test_code("new@example.com", CodePurpose::Signup)]);

    let uc = CompleteSignupUseCase {
        users: MockUserRepo::new(vec![test_user()]),
        codes: codes.clone(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let result = uc
        .execute(CompleteSignupInput {
            email: "new@example.com".to_owned(),
            code: "123456".to_owned(),
            username: "user".to_owned(),
            password: "Aa1!aaaa".to_owned(),
        })
        .await;

    assert!(matches!(result, Err(AuthServiceError::UsernameTaken)));
    // The code goes first so a bad actor cannot probe usernames for free.
    assert!(codes.codes.lock().unwrap()[0].used_at.is_some());
}

#[tokio::test]
async fn should_reject_invalid_username() {
    let uc = CompleteSignupUseCase {
        users: MockUserRepo::empty(),
        codes: MockCodeRepo::empty(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let result = uc
        .execute(CompleteSignupInput {
            email: "new@example.com".to_owned(),
            code: "123456".to_owned(),
            username: "bad name!".to_owned(),
            password: "Aa1!aaaa".to_owned(),
        })
        .await;

    assert!(matches!(result, Err(AuthServiceError::InvalidUsername)));
}
