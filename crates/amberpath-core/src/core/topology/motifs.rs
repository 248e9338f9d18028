use crate::core::models::topology::Topology;
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info};

const CARBONYL_C: &str = "C";
const CARBONYL_O: &str = "O";
const AMIDE_N: &str = "N";
const AMIDE_H: &str = "H";
const ALPHA_C: &str = "CA";
const BETA_C: &str = "CB";

/// Four atom indices in a fixed role order.
///
/// Peptide-bond quartets are stored as (C, O, N, H) and chirality quartets as
/// (CA, C, CB, N). The torsion that classifies both motifs is measured with the first two
/// roles exchanged: O-C-N-H for the peptide bond and the C-CA-CB-N improper for the alpha
/// carbon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MotifQuartet {
    atoms: [usize; 4],
}

impl MotifQuartet {
    pub fn new(atoms: [usize; 4]) -> Self {
        Self { atoms }
    }

    /// The atoms in role order.
    pub fn atoms(&self) -> [usize; 4] {
        self.atoms
    }

    /// The atoms in the order the classifying torsion is measured over.
    pub fn torsion_atoms(&self) -> [usize; 4] {
        let [a, b, c, d] = self.atoms;
        [b, a, c, d]
    }

    /// The first atom: the carbonyl carbon of a peptide bond or the alpha carbon of a chiral
    /// center.
    pub fn anchor(&self) -> usize {
        self.atoms[0]
    }
}

impl fmt::Display for MotifQuartet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.atoms;
        write!(f, "({a}, {b}, {c}, {d})")
    }
}

/// How peptide-bond quartets are located.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MotifSearch {
    /// Every `C` at index `i` followed by `O`, `N`, `H` at `i+1..=i+3`. The layout is checked
    /// against the bond set when the topology has bonds.
    #[default]
    IndexLayout,
    /// Pattern match over the bond graph: `C` bonded to an `O` and an `N`, that `N` bonded to
    /// an `H`. Independent of atom ordering.
    BondGraph,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MotifError {
    #[error(
        "Atoms starting at carbonyl carbon {carbonyl} follow the C,O,N,H index layout but are not bonded as a peptide unit"
    )]
    LayoutViolation { carbonyl: usize },
    #[error(
        "Alpha carbon {alpha_carbon} does not have exactly one C, at most one CB and exactly one N neighbor (found {neighbors:?})"
    )]
    MalformedChiralCenter {
        alpha_carbon: usize,
        neighbors: Vec<usize>,
    },
}

/// Motif quartets derived once from a topology.
///
/// The lists are only meaningful for the topology they were built from; build a new index
/// whenever the topology changes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MotifIndex {
    peptide_bonds: Vec<MotifQuartet>,
    chiral_centers: Vec<MotifQuartet>,
    achiral_alpha_carbons: Vec<usize>,
}

impl MotifIndex {
    pub fn build(topology: &Topology, search: MotifSearch) -> Result<Self, MotifError> {
        let peptide_bonds = build_peptide_bond_quartets(topology, search)?;
        let ChiralCenters {
            quartets: chiral_centers,
            achiral,
        } = find_chiral_centers(topology)?;

        info!(
            "Indexed {} peptide bond(s) and {} chiral center(s) ({} achiral alpha carbon(s) skipped).",
            peptide_bonds.len(),
            chiral_centers.len(),
            achiral.len()
        );
        debug!("Peptide bond quartets (C, O, N, H): {:?}", peptide_bonds);
        debug!("Chirality quartets (CA, C, CB, N): {:?}", chiral_centers);

        Ok(Self {
            peptide_bonds,
            chiral_centers,
            achiral_alpha_carbons: achiral,
        })
    }

    pub fn peptide_bonds(&self) -> &[MotifQuartet] {
        &self.peptide_bonds
    }

    pub fn chiral_centers(&self) -> &[MotifQuartet] {
        &self.chiral_centers
    }

    /// Alpha carbons without a `CB` neighbor (glycine), which have no handedness to check.
    pub fn achiral_alpha_carbons(&self) -> &[usize] {
        &self.achiral_alpha_carbons
    }
}

/// Locates peptide-bond quartets (C, O, N, H).
///
/// # Errors
///
/// With [`MotifSearch::IndexLayout`], returns [`MotifError::LayoutViolation`] when a name
/// match is contradicted by a non-empty bond set.
pub fn build_peptide_bond_quartets(
    topology: &Topology,
    search: MotifSearch,
) -> Result<Vec<MotifQuartet>, MotifError> {
    match search {
        MotifSearch::IndexLayout => peptide_bonds_by_layout(topology),
        MotifSearch::BondGraph => Ok(peptide_bonds_by_graph(topology)),
    }
}

/// Locates chirality quartets (CA, C, CB, N). Glycine-like alpha carbons are skipped.
///
/// # Errors
///
/// Returns [`MotifError::MalformedChiralCenter`] for any other neighbor shape.
pub fn build_chirality_quartets(topology: &Topology) -> Result<Vec<MotifQuartet>, MotifError> {
    find_chiral_centers(topology).map(|centers| centers.quartets)
}

fn peptide_bonds_by_layout(topology: &Topology) -> Result<Vec<MotifQuartet>, MotifError> {
    let oxygens: HashSet<usize> = topology.indices_named(CARBONYL_O).into_iter().collect();
    let nitrogens: HashSet<usize> = topology.indices_named(AMIDE_N).into_iter().collect();
    let hydrogens: HashSet<usize> = topology.indices_named(AMIDE_H).into_iter().collect();
    let check_bonds = !topology.bonds().is_empty();

    let mut quartets = Vec::new();
    for c in topology.indices_named(CARBONYL_C) {
        let (o, n, h) = (c + 1, c + 2, c + 3);
        if !(oxygens.contains(&o) && nitrogens.contains(&n) && hydrogens.contains(&h)) {
            continue;
        }
        if check_bonds
            && !(topology.are_bonded(c, o) && topology.are_bonded(c, n) && topology.are_bonded(n, h))
        {
            return Err(MotifError::LayoutViolation { carbonyl: c });
        }
        quartets.push(MotifQuartet::new([c, o, n, h]));
    }
    Ok(quartets)
}

fn peptide_bonds_by_graph(topology: &Topology) -> Vec<MotifQuartet> {
    let named_neighbor = |atom: usize, token: &str| {
        topology
            .neighbors(atom)
            .iter()
            .copied()
            .find(|&n| topology.is_named(n, token))
    };

    topology
        .indices_named(CARBONYL_C)
        .into_iter()
        .filter_map(|c| {
            let o = named_neighbor(c, CARBONYL_O)?;
            let n = named_neighbor(c, AMIDE_N)?;
            let h = named_neighbor(n, AMIDE_H)?;
            Some(MotifQuartet::new([c, o, n, h]))
        })
        .collect()
}

struct ChiralCenters {
    quartets: Vec<MotifQuartet>,
    achiral: Vec<usize>,
}

fn find_chiral_centers(topology: &Topology) -> Result<ChiralCenters, MotifError> {
    let mut quartets = Vec::new();
    let mut achiral = Vec::new();

    for ca in topology.indices_named(ALPHA_C) {
        let neighbors = topology.neighbors(ca);
        let with_name = |token: &str| -> Vec<usize> {
            neighbors
                .iter()
                .copied()
                .filter(|&n| topology.is_named(n, token))
                .collect()
        };
        let carbonyls = with_name(CARBONYL_C);
        let betas = with_name(BETA_C);
        let amides = with_name(AMIDE_N);

        match (carbonyls.as_slice(), betas.as_slice(), amides.as_slice()) {
            ([c], [cb], [n]) => quartets.push(MotifQuartet::new([ca, *c, *cb, *n])),
            ([_], [], [_]) => {
                debug!("Alpha carbon {} has no CB neighbor; skipping chirality check.", ca);
                achiral.push(ca);
            }
            ([], _, []) => {
                debug!(
                    "Atom {} is named CA but has no backbone C or N neighbor; not an alpha carbon.",
                    ca
                );
            }
            _ => {
                let found = std::iter::once(ca)
                    .chain(carbonyls)
                    .chain(betas)
                    .chain(amides)
                    .collect();
                return Err(MotifError::MalformedChiralCenter {
                    alpha_carbon: ca,
                    neighbors: found,
                });
            }
        }
    }

    Ok(ChiralCenters { quartets, achiral })
}
