//! Inference engine module
//!
//! Drives schema inference over a batch of observed transactions.
//!
//! # Overview
//!
//! The engine module provides:
//! - `InferenceSession` - Infers, buckets and samples each observation, then
//!   merges and refines per endpoint
//! - `Observation` / `Body` - Decoded transaction envelope fed to a session
//! - `SessionReport` - Final per-endpoint request/response schemas

mod session;
mod types;

pub use session::InferenceSession;
pub use types::{
    status_description, Body, EndpointReport, Observation, SessionReport, DEFAULT_CONTENT_TYPE,
};
