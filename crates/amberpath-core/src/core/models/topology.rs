use super::atom::AtomRecord;
use std::collections::HashSet;
use thiserror::Error;

/// An undirected covalent bond between two atoms, stored by zero-based index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bond {
    pub atom1: usize, // Index of the first atom
    pub atom2: usize, // Index of the second atom
}

impl Bond {
    pub fn new(atom1: usize, atom2: usize) -> Self {
        Self { atom1, atom2 }
    }

    pub fn contains(&self, atom: usize) -> bool {
        self.atom1 == atom || self.atom2 == atom
    }

    /// Returns the partner of `atom` in this bond, if `atom` takes part in it.
    pub fn partner(&self, atom: usize) -> Option<usize> {
        if self.atom1 == atom {
            Some(self.atom2)
        } else if self.atom2 == atom {
            Some(self.atom1)
        } else {
            None
        }
    }

    fn key(&self) -> (usize, usize) {
        (self.atom1.min(self.atom2), self.atom1.max(self.atom2))
    }
}

/// A contiguous run of atoms belonging to one residue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResidueSpan {
    /// Residue label, e.g. "ALA" or "NALA".
    pub name: String,
    /// One-based residue sequence number.
    pub number: usize,
    /// Index of the first atom of the residue.
    pub first_atom: usize,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TopologyError {
    #[error("Atom record at position {position} carries index {index}; indices must be contiguous from 0")]
    NonContiguousIndex { position: usize, index: usize },
    #[error("Bond ({atom1}, {atom2}) references an atom outside 0..{atom_count}")]
    BondOutOfRange {
        atom1: usize,
        atom2: usize,
        atom_count: usize,
    },
    #[error("Bond ({0}, {0}) connects an atom to itself")]
    SelfBond(usize),
    #[error("Residue '{name}' starts at atom {first_atom}, which is out of order or out of range")]
    InvalidResidueSpan { name: String, first_atom: usize },
}

/// The static covalent topology of a molecular system.
///
/// Atom `i` of the topology is atom `i` of every coordinate vector used with it. The bond set
/// is undirected; adjacency lists are built once on construction and kept in bond order, so
/// neighbor enumeration is deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Topology {
    atoms: Vec<AtomRecord>,
    bonds: Vec<Bond>,
    residues: Vec<ResidueSpan>,
    adjacency: Vec<Vec<usize>>,
}

impl Topology {
    /// Builds a topology from atom records and bonds.
    ///
    /// Duplicate bonds (in either direction) are collapsed to their first occurrence.
    ///
    /// # Errors
    ///
    /// Returns an error if atom indices are not `0..n` in order, or if a bond references a
    /// missing atom or joins an atom to itself.
    pub fn new(atoms: Vec<AtomRecord>, bonds: Vec<Bond>) -> Result<Self, TopologyError> {
        for (position, atom) in atoms.iter().enumerate() {
            if atom.index != position {
                return Err(TopologyError::NonContiguousIndex {
                    position,
                    index: atom.index,
                });
            }
        }

        let atom_count = atoms.len();
        let mut seen = HashSet::new();
        let mut unique_bonds = Vec::with_capacity(bonds.len());
        let mut adjacency = vec![Vec::new(); atom_count];

        for bond in bonds {
            if bond.atom1 >= atom_count || bond.atom2 >= atom_count {
                return Err(TopologyError::BondOutOfRange {
                    atom1: bond.atom1,
                    atom2: bond.atom2,
                    atom_count,
                });
            }
            if bond.atom1 == bond.atom2 {
                return Err(TopologyError::SelfBond(bond.atom1));
            }
            if seen.insert(bond.key()) {
                adjacency[bond.atom1].push(bond.atom2);
                adjacency[bond.atom2].push(bond.atom1);
                unique_bonds.push(bond);
            }
        }

        Ok(Self {
            atoms,
            bonds: unique_bonds,
            residues: Vec::new(),
            adjacency,
        })
    }

    /// Attaches residue spans. Spans must start at strictly increasing atom indices.
    pub fn with_residues(mut self, residues: Vec<ResidueSpan>) -> Result<Self, TopologyError> {
        let mut previous: Option<usize> = None;
        for residue in &residues {
            let out_of_order = previous.is_some_and(|p| residue.first_atom <= p);
            if out_of_order || residue.first_atom >= self.atoms.len() {
                return Err(TopologyError::InvalidResidueSpan {
                    name: residue.name.clone(),
                    first_atom: residue.first_atom,
                });
            }
            previous = Some(residue.first_atom);
        }
        self.residues = residues;
        Ok(self)
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn atoms(&self) -> &[AtomRecord] {
        &self.atoms
    }

    pub fn atom(&self, index: usize) -> Option<&AtomRecord> {
        self.atoms.get(index)
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn residues(&self) -> &[ResidueSpan] {
        &self.residues
    }

    /// Returns the atoms bonded to `index`, in bond order. Unknown indices have no neighbors.
    pub fn neighbors(&self, index: usize) -> &[usize] {
        self.adjacency.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn are_bonded(&self, a: usize, b: usize) -> bool {
        self.neighbors(a).contains(&b)
    }

    /// Returns `true` if the atom at `index` exists and carries the given name.
    pub fn is_named(&self, index: usize, token: &str) -> bool {
        self.atom(index).is_some_and(|atom| atom.is_named(token))
    }

    /// Indices of every atom carrying exactly the given name, in ascending order.
    pub fn indices_named(&self, token: &str) -> Vec<usize> {
        self.atoms
            .iter()
            .filter(|atom| atom.is_named(token))
            .map(|atom| atom.index)
            .collect()
    }

    /// Finds the residue that owns the atom at `index`, if residue spans are known.
    pub fn residue_of(&self, index: usize) -> Option<&ResidueSpan> {
        if index >= self.atoms.len() {
            return None;
        }
        let position = self
            .residues
            .partition_point(|residue| residue.first_atom <= index);
        position.checked_sub(1).map(|p| &self.residues[p])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atoms(names: &[&str]) -> Vec<AtomRecord> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| AtomRecord::new(i, name))
            .collect()
    }

    #[test]
    fn bond_partner_returns_other_atom() {
        let bond = Bond::new(3, 7);
        assert_eq!(bond.partner(3), Some(7));
        assert_eq!(bond.partner(7), Some(3));
        assert_eq!(bond.partner(5), None);
        assert!(bond.contains(3));
        assert!(!bond.contains(4));
    }

    #[test]
    fn neighbors_are_undirected() {
        let topology =
            Topology::new(atoms(&["N", "CA", "C"]), vec![Bond::new(0, 1), Bond::new(2, 1)])
                .unwrap();
        assert_eq!(topology.neighbors(1), &[0, 2]);
        assert_eq!(topology.neighbors(0), &[1]);
        assert_eq!(topology.neighbors(2), &[1]);
        assert!(topology.are_bonded(2, 1));
        assert!(!topology.are_bonded(0, 2));
    }

    #[test]
    fn duplicate_bonds_are_collapsed() {
        let topology =
            Topology::new(atoms(&["C", "O"]), vec![Bond::new(0, 1), Bond::new(1, 0)]).unwrap();
        assert_eq!(topology.bonds().len(), 1);
        assert_eq!(topology.neighbors(0), &[1]);
    }

    #[test]
    fn unknown_index_has_no_neighbors() {
        let topology = Topology::new(atoms(&["C"]), vec![]).unwrap();
        assert!(topology.neighbors(10).is_empty());
        assert!(!topology.is_named(10, "C"));
    }

    #[test]
    fn non_contiguous_indices_are_rejected() {
        let records = vec![AtomRecord::new(0, "C"), AtomRecord::new(2, "O")];
        assert_eq!(
            Topology::new(records, vec![]),
            Err(TopologyError::NonContiguousIndex {
                position: 1,
                index: 2
            })
        );
    }

    #[test]
    fn out_of_range_and_self_bonds_are_rejected() {
        assert!(matches!(
            Topology::new(atoms(&["C", "O"]), vec![Bond::new(0, 5)]),
            Err(TopologyError::BondOutOfRange { atom_count: 2, .. })
        ));
        assert_eq!(
            Topology::new(atoms(&["C", "O"]), vec![Bond::new(1, 1)]),
            Err(TopologyError::SelfBond(1))
        );
    }

    #[test]
    fn indices_named_lists_matching_atoms_in_order() {
        let topology = Topology::new(atoms(&["C", "O", "N", "C", "CA"]), vec![]).unwrap();
        assert_eq!(topology.indices_named("C"), vec![0, 3]);
        assert_eq!(topology.indices_named("CA"), vec![4]);
        assert!(topology.indices_named("CB").is_empty());
    }

    #[test]
    fn residue_of_finds_owning_span() {
        let topology = Topology::new(atoms(&["N", "CA", "C", "N", "CA", "C"]), vec![])
            .unwrap()
            .with_residues(vec![
                ResidueSpan {
                    name: "ALA".into(),
                    number: 1,
                    first_atom: 0,
                },
                ResidueSpan {
                    name: "GLY".into(),
                    number: 2,
                    first_atom: 3,
                },
            ])
            .unwrap();
        assert_eq!(topology.residue_of(2).unwrap().name, "ALA");
        assert_eq!(topology.residue_of(3).unwrap().name, "GLY");
        assert_eq!(topology.residue_of(5).unwrap().number, 2);
        assert!(topology.residue_of(6).is_none());
    }

    #[test]
    fn residue_spans_must_be_ordered() {
        let result = Topology::new(atoms(&["N", "CA"]), vec![])
            .unwrap()
            .with_residues(vec![
                ResidueSpan {
                    name: "ALA".into(),
                    number: 1,
                    first_atom: 1,
                },
                ResidueSpan {
                    name: "GLY".into(),
                    number: 2,
                    first_atom: 1,
                },
            ]);
        assert!(matches!(
            result,
            Err(TopologyError::InvalidResidueSpan { first_atom: 1, .. })
        ));
    }
}
