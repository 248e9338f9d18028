//! # AMBERPATH Core Library
//!
//! Structural validity filtering and saddle-search job orchestration for the discovery of
//! transition pathways between two conformations of an AMBER-parameterized biomolecule.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture so that each concern can be tested
//! in isolation.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Topology`, `Coordinates`,
//!   `PermutationGroup`), AMBER file readers, motif indexing over the topology graph, and
//!   torsion geometry.
//!
//! - **[`engine`]: The Logic Core.** Validity checking, acceptance filters for external
//!   search drivers, pass-through search parameters, and the file-based protocol spoken with
//!   the external double-ended connect executable.
//!
//! - **[`workflows`]: The Public API.** `AmberSystem` wires a potential, the motif index, the
//!   checker, and the job spawner together and hands out jobs bound to the system.

pub mod core;
pub mod engine;
pub mod workflows;
