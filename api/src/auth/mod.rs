//! Request authentication

pub mod cron_secret;

pub use cron_secret::trigger_auth_middleware;
