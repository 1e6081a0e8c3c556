//! # SeqUCT Core Library
//!
//! Guided protein sequence design by Upper Confidence bounds applied to Trees (UCT),
//! driven by a pluggable scoring oracle.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture so that the search engine
//! stays independent of any particular fitness model.
//!
//! - **[`core`]: The Foundation.** Stateless sequence primitives (`ProteinSequence`,
//!   `Mutation`), variant enumeration, and the position-specific profile model used
//!   for fitness scoring.
//!
//! - **[`engine`]: The Logic Core.** The stateful UCT search: an arena-backed tree,
//!   the select/expand/backup loop, and the `Oracle` trait through which states are
//!   scored and expanded.
//!
//! - **[`workflows`]: The Public API.** High-level procedures that tie `core` and
//!   `engine` together, such as multi-round sequence design.

pub mod core;
pub mod engine;
pub mod workflows;
