//! # Core Models Module
//!
//! Data structures describing a molecular system as the search machinery sees it: a static
//! covalent topology and a stream of flat coordinate vectors proposed by external drivers.
//!
//! ## Key Components
//!
//! - [`atom`] - Atom records (index and name) as they appear in the topology
//! - [`topology`] - The atom list plus the undirected bond set, with adjacency queries
//! - [`coordinates`] - Flat `3N` coordinate vectors and per-atom position access
//! - [`permutation`] - Groups of physically interchangeable atoms
//!
//! ```ignore
//! use amberpath::core::models::{atom::AtomRecord, topology::{Bond, Topology}};
//!
//! let topology = Topology::new(
//!     vec![AtomRecord::new(0, "C"), AtomRecord::new(1, "O")],
//!     vec![Bond::new(0, 1)],
//! )?;
//! assert_eq!(topology.neighbors(0), &[1]);
//! ```

pub mod atom;
pub mod coordinates;
pub mod permutation;
pub mod topology;
