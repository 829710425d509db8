//! Test utilities for UserVault services.
//!
//! Import in `#[cfg(test)]` blocks and dev-dependencies only, never in
//! production code.

pub mod token;

/// JWT secret shared by all unit/integration tests.
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-for-unit-tests-only";
