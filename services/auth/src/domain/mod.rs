pub mod password;
pub mod repository;
pub mod totp;
pub mod types;
pub mod validate;
