//! Document assembly
//!
//! Renders the Master Agreement and State Addendum from the pack's
//! chassis templates: single-pass placeholder substitution, clause-block
//! construction from the selected clause ids, and state-specific
//! provision injection from the triggered deep-dive modules.

pub mod assembler;
pub mod template;

pub use assembler::{assemble_addendum, assemble_master};
pub use template::substitute;
