//! # Engine Module
//!
//! The stateful search machinery of SeqUCT: an arena-backed tree, the UCT
//! select/expand/backup loop, and the oracle boundary it drives.
//!
//! ## Overview
//!
//! A search starts from a single root state and repeatedly asks an [`oracle::Oracle`]
//! to score the leaf reached by following the best `Q + U` child. The oracle's
//! proposed successors become children of that leaf, and its value estimate is
//! added to every node on the path back towards the root. The engine is generic
//! over the oracle's state, move and continuation types; [`profile_oracle`]
//! provides the protein-design oracle built on [`crate::core::scoring`].
//!
//! ## Architecture
//!
//! - **Tree** ([`tree`], [`node`], [`ids`]) - Slot-map arena of nodes addressed by stable keys
//! - **Search Loop** ([`search`]) - The UCT driver, search statistics and cancellation hooks
//! - **Oracle Boundary** ([`oracle`]) - The trait implemented by scoring back ends
//! - **Configuration** ([`config`]) - Search and design parameters with validating builders
//! - **Progress Monitoring** ([`progress`]) - Optional callback for phase and task events
//! - **Error Handling** ([`error`]) - Engine-specific error types
//!
//! ## Key Capabilities
//!
//! - **Deterministic tie-breaking** in insertion order for both selection and the final choice
//! - **Continuation threading** so oracles can carry caches between calls
//! - **Cooperative cancellation** checked between iterations

pub mod cancellation;
pub mod config;
pub mod error;
pub mod ids;
pub mod node;
pub mod oracle;
pub mod profile_oracle;
pub mod progress;
pub mod search;
pub mod tree;
