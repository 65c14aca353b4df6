//! # Swiss Pairer
//!
//! A Swiss-system chess tournament manager core: pairing, scoring,
//! tiebreaks, and director overrides, independent of any front-end.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (sections, players, rounds, pairings)
//! - **engine**: Pairing, result application, roster ops, director edits
//! - **calculate**: Tiebreaks and standings computation
//! - **storage**: Section snapshot persistence
//! - **config**: Configuration loading and validation

pub mod calculate;
pub mod config;
pub mod engine;
pub mod models;
pub mod storage;

pub use models::*;
