//! Automated Dhan access-token refresh.
//!
//! Replays the brokerage's consent login, either in a headless browser or
//! through a partner session, and stores the resulting access token in AWS
//! SSM Parameter Store. One linear run per invocation; both login strategies sit
//! behind the single [`auth::Handshake`] contract so the orchestration in
//! [`refresher`] never branches on deployment mode.

pub mod auth;
pub mod browser;
pub mod config;
pub mod consent;
pub mod error;
pub mod refresher;
pub mod secrets;
pub mod totp;
pub mod util;
