use std::fmt;

/// A single atom as described by the covalent topology.
///
/// Only the zero-based index and the atom name are tracked. The name is the AMBER atom name
/// (e.g. "CA", "HB2") with surrounding whitespace removed; motif indexing relies on exact
/// name tokens, so no case folding is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AtomRecord {
    /// Zero-based position of the atom in the topology and in every coordinate vector.
    pub index: usize,
    /// The trimmed atom name.
    pub name: String,
}

impl AtomRecord {
    pub fn new(index: usize, name: &str) -> Self {
        Self {
            index,
            name: name.trim().to_string(),
        }
    }

    /// Returns `true` if the atom carries exactly the given name token.
    pub fn is_named(&self, token: &str) -> bool {
        self.name == token
    }
}

impl fmt::Display for AtomRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.index)
    }
}
