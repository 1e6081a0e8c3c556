//! # Scoring Module
//!
//! Stateless fitness scoring used by the reference oracle.
//!
//! - [`profile`] - Position-specific log-odds model loaded from CSV
//! - [`cache`] - Raw-score memo threaded between evaluations as the oracle continuation
//! - [`filter`] - Narrowing of candidate moves before they become tree children
//! - [`priors`] - Softmax conversion of candidate fitness into exploration priors
//! - [`suggest`] - Ranking of beneficial single mutants and positions

pub mod cache;
pub mod filter;
pub mod priors;
pub mod profile;
pub mod suggest;
