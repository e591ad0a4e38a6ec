//! Privacy risk scoring for web domains.
//!
//! - [`scoring`]: the engine: tracker severity lookup, score aggregation,
//!   banding, and reason-to-suggestion mapping.
//! - [`service`]: request handling around the engine (score → band →
//!   suggestions) and the liveness check.
//! - [`detector`]: derives scan requests from captured page activity.
//! - [`blocklist`]: tracker blocklist loading, matching and rebuilding.
//! - [`remote`]: optional remote scoring backends with local fallback.
//! - [`report`]: terminal and PDF renderers.
//! - [`cli`], [`config`], [`input`], [`logging`]: the command-line surface.

pub mod blocklist;
pub mod cli;
pub mod config;
pub mod detector;
pub mod input;
pub mod logging;
pub mod models;
pub mod remote;
pub mod report;
pub mod scoring;
pub mod service;
