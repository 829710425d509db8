use uservault_auth::domain::types::{CodePurpose, MAX_CODES_PER_EMAIL, MAX_CODES_PER_IP};
use uservault_auth::error::AuthServiceError;
use uservault_auth::usecase::verification_code::{
    GenerateCodeInput, VerifyCodeInput, consume_verification_code, generate_verification_code,
};

use crate::helpers::{MockCodeRepo, MockRateLimiter};

fn generate_input(email: &str, ip: &str) -> GenerateCodeInput {
    GenerateCodeInput {
        email: email.to_owned(),
        purpose: CodePurpose::Signup,
        client_ip: ip.to_owned(),
    }
}

fn verify_input(email: &str, code: &str) -> VerifyCodeInput {
    VerifyCodeInput {
        email: email.to_owned(),
        purpose: CodePurpose::Signup,
        code: code.to_owned(),
    }
}

#[tokio::test]
async fn should_supersede_previous_code_when_a_new_one_is_issued() {
    let codes = MockCodeRepo::empty();
    let limiter = MockRateLimiter::new();

    generate_verification_code(&codes, &limiter, generate_input("a@example.com", "ip"))
        .await
        .unwrap();
    generate_verification_code(&codes, &limiter, generate_input("a@example.com", "ip"))
        .await
        .unwrap();

    let (first, second) = {
        let stored = codes.codes.lock().unwrap();
        assert_eq!(stored.len(), 2);
        assert!(stored[0].used_at.is_some(), "first code must be superseded");
        assert!(stored[1].used_at.is_none());
        (stored[0].code.clone(), stored[1].code.clone())
    };

    // Only the most recent code redeems.
    let result = consume_verification_code(&codes, verify_input("a@example.com", &first)).await;
    assert!(
        matches!(result, Err(AuthServiceError::InvalidCode)),
        "superseded code must not redeem, got {result:?}"
    );
    consume_verification_code(&codes, verify_input("a@example.com", &second))
        .await
        .unwrap();
}

#[tokio::test]
async fn should_reject_second_use_of_a_code() {
    let codes = MockCodeRepo::empty();
    let limiter = MockRateLimiter::new();

    generate_verification_code(&codes, &limiter, generate_input("a@example.com", "ip"))
        .await
        .unwrap();
    let code = codes.codes.lock().unwrap()[0].code.clone();

    consume_verification_code(&codes, verify_input("a@example.com", &code))
        .await
        .unwrap();
    let result = consume_verification_code(&codes, verify_input("a@example.com", &code)).await;
    assert!(matches!(result, Err(AuthServiceError::InvalidCode)));
}

#[tokio::test]
async fn should_scope_codes_to_their_purpose() {
    let codes = MockCodeRepo::empty();
    let limiter = MockRateLimiter::new();

    generate_verification_code(&codes, &limiter, generate_input("a@example.com", "ip"))
        .await
        .unwrap();
    let code = codes.codes.lock().unwrap()[0].code.clone();

    // A signup code does not redeem as a password-reset code.
    let result = consume_verification_code(
        &codes,
        VerifyCodeInput {
            email: "a@example.com".to_owned(),
            purpose: CodePurpose::PasswordReset,
            code,
        },
    )
    .await;
    assert!(matches!(result, Err(AuthServiceError::InvalidCode)));
}

#[tokio::test]
async fn should_reject_malformed_code_without_repository_lookup() {
    let codes = MockCodeRepo::empty();

    for bad in ["12345", "1234567", "12345a", ""] {
        let result = consume_verification_code(&codes, verify_input("a@example.com", bad)).await;
        assert!(
            matches!(result, Err(AuthServiceError::InvalidCodeFormat)),
            "expected InvalidCodeFormat for {bad:?}, got {result:?}"
        );
    }
}

#[tokio::test]
async fn should_rate_limit_code_generation_per_email() {
    let codes = MockCodeRepo::empty();
    let limiter = MockRateLimiter::new();

    for _ in 0..MAX_CODES_PER_EMAIL {
        generate_verification_code(&codes, &limiter, generate_input("a@example.com", "ip"))
            .await
            .unwrap();
    }

    let result =
        generate_verification_code(&codes, &limiter, generate_input("a@example.com", "ip")).await;
    assert!(matches!(result, Err(AuthServiceError::RateLimited)));
    assert_eq!(
        codes.codes.lock().unwrap().len(),
        MAX_CODES_PER_EMAIL as usize,
        "the blocked request must not store a code"
    );
}

#[tokio::test]
async fn should_rate_limit_code_generation_per_client_ip() {
    let codes = MockCodeRepo::empty();
    let limiter = MockRateLimiter::new();

    // Distinct emails stay under the per-email cap; the shared IP does not.
    for i in 0..MAX_CODES_PER_IP {
        generate_verification_code(
            &codes,
            &limiter,
            generate_input(&format!("user{i}@example.com"), "203.0.113.9"),
        )
        .await
        .unwrap();
    }

    let result = generate_verification_code(
        &codes,
        &limiter,
        generate_input("straggler@example.com", "203.0.113.9"),
    )
    .await;
    assert!(matches!(result, Err(AuthServiceError::RateLimited)));
}
