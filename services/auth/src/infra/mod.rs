pub mod cache;
pub mod db;
pub mod emails;
pub mod outbox;
pub mod turnstile;
