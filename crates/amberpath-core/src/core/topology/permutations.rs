use crate::core::io::error::FormatError;
use crate::core::io::pdb::{PdbFile, PdbResidue};
use crate::core::io::traits::StructureFile;
use crate::core::models::permutation::{PermutationError, PermutationGroup};
use phf::{Map, phf_map};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Conventional name of the terminal-annotated structure that permutation groups are read
/// from. Terminal residues carry an `N` or `C` prefix (e.g. `NALA`, `CGLY`).
pub const PERMUTATION_PDB_FILENAME: &str = "coordsModTerm.pdb";

type AtomGroups = &'static [&'static [&'static str]];

static RESIDUE_PERMUTATIONS: Map<&'static str, AtomGroups> = phf_map! {
    "ALA" => &[&["HB1", "HB2", "HB3"]],
    "ARG" => &[&["HH11", "HH12"], &["HH21", "HH22"]],
    "ASN" => &[&["HD21", "HD22"]],
    "ASP" => &[&["OD1", "OD2"]],
    "GLN" => &[&["HE21", "HE22"]],
    "GLU" => &[&["OE1", "OE2"]],
    "ILE" => &[&["HG21", "HG22", "HG23"], &["HD11", "HD12", "HD13"]],
    "LEU" => &[&["HD11", "HD12", "HD13"], &["HD21", "HD22", "HD23"]],
    "LYS" => &[&["HZ1", "HZ2", "HZ3"]],
    "MET" => &[&["HE1", "HE2", "HE3"]],
    "THR" => &[&["HG21", "HG22", "HG23"]],
    "VAL" => &[&["HG11", "HG12", "HG13"], &["HG21", "HG22", "HG23"]],
    "ACE" => &[&["HH31", "HH32", "HH33"]],
    "NME" => &[&["HH31", "HH32", "HH33"]],
    "NHE" => &[&["HN1", "HN2"]],
};

const N_TERMINAL_GROUPS: AtomGroups = &[&["H1", "H2", "H3"]];
const C_TERMINAL_GROUPS: AtomGroups = &[&["O", "OXT"]];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Terminus {
    N,
    C,
    Internal,
}

fn split_residue_name(name: &str) -> (Terminus, &str) {
    if name.len() == 4 {
        match name.as_bytes()[0] {
            b'N' => return (Terminus::N, &name[1..]),
            b'C' => return (Terminus::C, &name[1..]),
            _ => {}
        }
    }
    (Terminus::Internal, name)
}

/// Atom-name groups that are interchangeable within a residue of the given (possibly
/// terminal-annotated) name.
pub fn residue_permutations(residue_name: &str) -> Vec<&'static [&'static str]> {
    let (terminus, core_name) = split_residue_name(residue_name);
    let mut groups: Vec<&'static [&'static str]> = RESIDUE_PERMUTATIONS
        .get(core_name)
        .map(|groups| groups.to_vec())
        .unwrap_or_default();
    match terminus {
        Terminus::N => groups.extend_from_slice(N_TERMINAL_GROUPS),
        Terminus::C => groups.extend_from_slice(C_TERMINAL_GROUPS),
        Terminus::Internal => {}
    }
    groups
}

/// Resolves the per-residue tables against concrete residues.
///
/// A group is dropped (with a debug diagnostic) when one of its atoms is absent, which
/// happens for alternative protonation states.
pub fn permutation_group_from_residues(
    residues: &[PdbResidue],
) -> Result<PermutationGroup, PermutationError> {
    let mut groups = Vec::new();
    for residue in residues {
        for names in residue_permutations(&residue.name) {
            let indices: Option<Vec<usize>> =
                names.iter().map(|name| residue.atom_index(name)).collect();
            match indices {
                Some(indices) => groups.push(indices),
                None => debug!(
                    "Residue {} {} lacks one of {:?}; permutation group skipped.",
                    residue.name, residue.number, names
                ),
            }
        }
    }
    PermutationGroup::new(groups)
}

#[derive(Debug, Error)]
pub enum PermutationLoadError {
    #[error("Failed to read permutation structure '{path}': {source}")]
    Format { path: String, source: FormatError },
    #[error("Invalid permutation groups in '{path}': {source}")]
    Invalid {
        path: String,
        source: PermutationError,
    },
}

/// Loads permutation groups from a terminal-annotated structure file.
///
/// A missing file is not an error: it means the system has no permutation symmetry, and an
/// empty group is returned with a warning.
pub fn load_permutation_group(path: &Path) -> Result<PermutationGroup, PermutationLoadError> {
    if !path.exists() {
        warn!(
            "Permutation structure {:?} not found; assuming no permutation symmetry.",
            path
        );
        return Ok(PermutationGroup::empty());
    }

    let path_str = path.to_string_lossy().to_string();
    let residues = PdbFile::read_from_path(path).map_err(|source| PermutationLoadError::Format {
        path: path_str.clone(),
        source,
    })?;
    let group = permutation_group_from_residues(&residues).map_err(|source| {
        PermutationLoadError::Invalid {
            path: path_str,
            source,
        }
    })?;
    info!(
        "Loaded {} permutation group(s) from {:?}.",
        group.len(),
        path
    );
    Ok(group)
}
