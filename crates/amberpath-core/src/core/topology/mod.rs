//! # Topology Module
//!
//! Structural knowledge derived from the covalent topology and from residue naming.
//!
//! ## Overview
//!
//! - **Motif indexing** ([`motifs`]) - Locates peptide-bond quartets (C, O, N, H) and
//!   alpha-carbon chirality quartets (CA, C, CB, N) from atom names and bond adjacency. The
//!   resulting index lists are what the validity checks measure torsions over.
//! - **Permutation tables** ([`permutations`]) - Groups of interchangeable atoms per residue
//!   type (methyl hydrogens, carboxylate oxygens, ...), resolved against a residue-annotated
//!   structure into a `PermutationGroup`.
//!
//! ```ignore
//! use amberpath::core::topology::motifs::{MotifIndex, MotifSearch};
//!
//! let index = MotifIndex::build(&topology, MotifSearch::IndexLayout)?;
//! println!("{} peptide bonds", index.peptide_bonds().len());
//! ```

pub mod motifs;
pub mod permutations;
