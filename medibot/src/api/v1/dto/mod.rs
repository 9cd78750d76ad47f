//! v1 API Data Transfer Objects.
//!
//! Wire types for the dashboard API. `AnswerOrigin` is serialized straight
//! from `crate::models`.

pub mod consultations;
pub mod records;

pub use consultations::*;
pub use records::*;
