//! # Engine Module
//!
//! Stateful pieces of pathway-search orchestration: deciding whether a conformation is
//! physically acceptable, and handing endpoint pairs to the external path-search engine.
//!
//! ## Overview
//!
//! The engine consumes the motif index built by [`crate::core::topology`] and turns it into
//! torsion-based validity checks, which are exposed as acceptance filters for search drivers.
//! Independently, it packages two endpoints together with the system files and permutation
//! groups into a connect job, runs the engine binary over a file-based protocol, and reports
//! what came back.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Connect job settings and pass-through parameter blocks
//! - **Validity** ([`validity`]) - Peptide-bond isomer and alpha-carbon chirality checks
//! - **Filters** ([`filters`]) - Closures wrapping the checks for search drivers
//! - **Connect Jobs** ([`job`]) - Working directory protocol and process invocation
//! - **Progress Monitoring** ([`progress`]) - Phase events for front ends
//! - **Error Handling** ([`error`]) - Spawn failures and the aggregating engine error

pub mod config;
pub mod error;
pub mod filters;
pub mod job;
pub mod progress;
pub mod validity;
