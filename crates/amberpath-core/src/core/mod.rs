//! # Core Module
//!
//! The stateless foundation of AMBERPATH: molecular data models, file formats, topology-derived
//! motif indexing, and geometry.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Atom records, bonds, flat coordinate vectors,
//!   and permutation-equivalence groups
//! - **Collaborator Interfaces** ([`forcefield`]) - The `Potential` trait implemented by
//!   external energy models
//! - **File I/O** ([`io`]) - AMBER topology and coordinate readers, PDB residue records, and the
//!   plain coordinate listing used by the external connect engine
//! - **Structural Knowledge** ([`topology`]) - Peptide-bond and alpha-carbon motif quartets,
//!   and per-residue permutation tables
//! - **Geometry** ([`utils`]) - Torsion angles over flat coordinate vectors
//!
//! Everything in this layer is a pure function of its inputs; nothing here spawns processes
//! or keeps mutable state between calls.

pub mod forcefield;
pub mod io;
pub mod models;
pub mod topology;
pub mod utils;
