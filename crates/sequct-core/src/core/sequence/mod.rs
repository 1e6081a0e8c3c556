//! # Sequence Module
//!
//! Protein sequence primitives used by the scoring plug-ins and the command-line
//! front end: the canonical amino-acid vocabulary, validated sequences, point
//! mutations in `A12C` notation, and enumeration of candidate variants
//! (single mutants and fixed-length extensions).

pub mod alphabet;
pub mod mutation;
pub mod protein;
pub mod variants;
