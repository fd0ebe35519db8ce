// termfilter-core/src/engines/mod.rs
//! Concrete implementations of the `FilterEngine` trait.
//!
//! # License
//! MIT OR APACHE 2.0

pub mod rewrite_engine;
