//! # Workflows Module
//!
//! High-level entry points that run complete design procedures on top of the
//! search engine.
//!
//! ## Overview
//!
//! Workflows own the setup a caller would otherwise repeat: building the
//! profile oracle from a [`DesignConfig`](crate::engine::config::DesignConfig),
//! threading the score cache from one search to the next, reporting progress,
//! and collecting per-round results.
//!
//! - **Design Workflow** ([`design`]) - Multi-round UCT design starting from a seed sequence

pub mod design;
