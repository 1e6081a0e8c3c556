//! # Core Module
//!
//! Stateless foundations shared by the engine plug-ins and the public workflows.
//!
//! ## Architecture
//!
//! - **Sequence Representation** ([`sequence`]) - Amino-acid vocabulary, validated
//!   sequences, point mutations and variant enumeration
//! - **Fitness Scoring** ([`scoring`]) - Profile model, incremental score cache,
//!   candidate filtering and mutation suggestions
//!
//! Nothing in this layer knows about search trees; the engine consumes it only
//! through the oracle implementation in [`crate::engine::profile_oracle`].

pub mod scoring;
pub mod sequence;
