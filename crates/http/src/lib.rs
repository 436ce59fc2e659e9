//! Subs Mania HTTP client
//!
//! An authenticated client for the Subs Mania backend. Every call attaches the
//! stored access token; an expired token is renewed once, transparently, and
//! concurrent callers share a single renewal. When renewal is impossible the
//! session is torn down and the configured session-end hook fires.

#[macro_use]
extern crate tracing;

pub mod client;
pub mod error;
pub mod types;

pub use client::{
    ApiRequest, ClientConfig, CredentialStore, FormPart, SessionTerminator, SubsClient,
    SubsClientBuilder,
};
pub use error::{ClientError, ErrorEnvelope, SessionEndReason};
