//! Rule evaluation for the legal agreement engine
//!
//! Pure, synchronous decision logic: overlay resolution, net-policy and
//! hard-block enforcement, deep-dive module selection, clause selection,
//! and Exhibit A term normalization. Everything here is a function of
//! (rule pack, call facts); nothing holds cross-call state.

pub mod evaluator;
pub mod exhibit;
pub mod overlay;

pub use evaluator::evaluate_rules;
pub use exhibit::build_exhibit_a;
pub use overlay::{resolve_overlay, PHILA_OVERLAY};
