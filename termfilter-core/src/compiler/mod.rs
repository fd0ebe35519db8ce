//! Pattern compilation for configured terms.
//!
//! `term` turns one `TermOptions` entry into a compiled `Term`; `term_set`
//! assembles the ordered, profile-scoped collection the engine iterates.
//!
//! License: MIT OR APACHE 2.0

pub mod term;
pub mod term_set;
