//! sea-orm entities for the auth service database.

pub mod mfa_factors;
pub mod outbox_events;
pub mod users;
pub mod verification_codes;
