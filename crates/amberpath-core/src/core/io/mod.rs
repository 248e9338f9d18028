//! Provides input/output functionality for the file formats exchanged with AMBER tooling and
//! the external connect engine.
//!
//! Readers produce the stateless models of [`crate::core::models`]: `prmtop` yields a
//! `Topology`, `inpcrd` and `listing` yield `Coordinates`, and `pdb` yields residue-annotated
//! atom records used to derive permutation groups. The `listing` writer produces the exact
//! byte format the connect engine expects for its endpoint files.

pub mod error;
pub mod inpcrd;
pub mod listing;
pub mod pdb;
pub mod prmtop;
pub mod traits;
