pub mod auth;
pub mod reserved;
