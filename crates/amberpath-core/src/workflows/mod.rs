//! # Workflows Module
//!
//! Top-level entry points for pathway searches between two conformations.
//!
//! ## Overview
//!
//! [`system::AmberSystem`] wires a potential to the motif index, the validity checks and the
//! connect-job machinery. It is built once per biomolecule and then hands out acceptance
//! filters to search drivers and [`connect::ConnectJob`]s for endpoint pairs.
//!
//! - **System** ([`system`]) - Construction, filters, pass-through search parameters and
//!   potential diagnostics
//! - **Connect** ([`connect`]) - Running one endpoint pair through the external engine

pub mod connect;
pub mod system;
