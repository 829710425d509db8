//! Auth types shared across UserVault services.
//!
//! Provides JWT validation (with authenticator assurance levels), cookie
//! builders, and the `BearerToken` extractor.

pub mod bearer;
pub mod cookie;
pub mod token;
