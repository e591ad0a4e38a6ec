//! Privacy risk scoring engine.
//!
//! - [`severity`]: the ordered tracker severity table and its substring lookup.
//! - [`engine`]: score aggregation over a [`Signals`](crate::models::Signals)
//!   bundle and the score-to-[`Band`](crate::models::Band) step function.
//! - [`suggest`]: maps reasons to de-duplicated mitigation advice.
//!
//! Everything here is pure: no I/O, no shared mutable state, no errors.

pub mod engine;
pub mod severity;
pub mod suggest;
