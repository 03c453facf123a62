//! Google Analytics 4 Data API adapter.
//!
//! [`Ga4Client`] implements [`pulseboard_core::ReportClient`] on top of the
//! `runReport` REST method, authenticating as a service account.

pub mod auth;
pub mod client;
pub mod wire;

pub use auth::{ServiceAccountTokens, TokenSource};
pub use client::Ga4Client;
