//! Core domain models for Deal Desk
//!
//! This crate contains the shared data structures used across
//! the legal agreement engine: evaluation inputs/results, Exhibit A
//! terms, party facts, and the rendered package payload.

pub mod error;
pub mod models;

pub use error::CoreError;
pub use models::*;
