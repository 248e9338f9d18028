use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PermutationError {
    #[error("Permutation group {group} has {size} atom(s); at least two are required")]
    TooSmall { group: usize, size: usize },
    #[error("Atom {atom} appears in more than one permutation group")]
    Overlap { atom: usize },
    #[error("Permutation group {group} references atom {atom}, but the system has {atom_count} atoms")]
    OutOfRange {
        group: usize,
        atom: usize,
        atom_count: usize,
    },
}

/// A set of disjoint groups of physically interchangeable atoms (zero-based indices).
///
/// An empty set means "no permutation symmetry" and is a perfectly valid value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermutationGroup {
    groups: Vec<Vec<usize>>,
}

impl PermutationGroup {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a permutation set, checking that every group has at least two atoms and that
    /// groups are disjoint.
    pub fn new(groups: Vec<Vec<usize>>) -> Result<Self, PermutationError> {
        let mut seen = HashSet::new();
        for (group_index, group) in groups.iter().enumerate() {
            if group.len() < 2 {
                return Err(PermutationError::TooSmall {
                    group: group_index,
                    size: group.len(),
                });
            }
            for &atom in group {
                if !seen.insert(atom) {
                    return Err(PermutationError::Overlap { atom });
                }
            }
        }
        Ok(Self { groups })
    }

    pub fn groups(&self) -> &[Vec<usize>] {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Checks that every referenced atom exists in a system of `atom_count` atoms.
    pub fn validate_against(&self, atom_count: usize) -> Result<(), PermutationError> {
        for (group_index, group) in self.groups.iter().enumerate() {
            if let Some(&atom) = group.iter().find(|&&atom| atom >= atom_count) {
                return Err(PermutationError::OutOfRange {
                    group: group_index,
                    atom,
                    atom_count,
                });
            }
        }
        Ok(())
    }
}
