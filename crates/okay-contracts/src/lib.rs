//! # okay-contracts
//!
//! Shared types for the okay validation engine.
//!
//! Every crate in the workspace imports from here. No validation logic lives
//! in this crate, only the message format, value classification, the
//! validator trait, and the error types.

pub mod error;
pub mod message;
pub mod validator;
pub mod value;
