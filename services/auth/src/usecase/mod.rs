pub mod account;
pub mod login;
pub mod mfa;
pub mod password_reset;
pub mod signup;
pub mod token;
pub mod verification_code;
