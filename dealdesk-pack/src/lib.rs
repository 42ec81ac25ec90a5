//! Rule Pack Store
//!
//! Loads and exposes the versioned legal rule data as an immutable value:
//! per-state net-listing policy, hard-block rules, ZIP overlay map, clause
//! bank, deep-dive modules, document chassis templates, and the Exhibit A
//! terms schema. Evaluation is a pure function of (pack, facts); the pack
//! is loaded once and never mutated.

pub mod error;
pub mod pack;

pub use error::PackError;
pub use pack::{
    Clause, DeepDiveModule, HardBlockRule, Injection, ModuleTrigger, RulePack, Templates,
};
