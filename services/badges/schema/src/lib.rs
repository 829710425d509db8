//! SeaORM entities for the badges service.

pub mod badge_requests;
pub mod global_badges;
pub mod user_badges;
