use crate::core::topology::motifs::{MotifIndex, MotifQuartet};
use crate::core::utils::geometry::torsion_from_coords;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeptideIsomer {
    Trans,
    Cis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handedness {
    L,
    D,
}

/// Trans iff the O-C-N-H torsion lies strictly inside `(90, 270)`. Both bounds are cis.
pub fn classify_peptide_torsion(torsion: f64) -> PeptideIsomer {
    if torsion > 90.0 && torsion < 270.0 {
        PeptideIsomer::Trans
    } else {
        PeptideIsomer::Cis
    }
}

/// L iff the C-CA-CB-N improper is at least 180 degrees.
pub fn classify_alpha_torsion(torsion: f64) -> Handedness {
    if torsion >= 180.0 {
        Handedness::L
    } else {
        Handedness::D
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotifKind {
    PeptideBond,
    ChiralCenter,
}

impl MotifKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MotifKind::PeptideBond => "peptide-bond",
            MotifKind::ChiralCenter => "chiral-center",
        }
    }

    fn accepts(&self, torsion: f64) -> bool {
        match self {
            MotifKind::PeptideBond => classify_peptide_torsion(torsion) == PeptideIsomer::Trans,
            MotifKind::ChiralCenter => classify_alpha_torsion(torsion) == Handedness::L,
        }
    }
}

/// One measured motif. `torsion` is `None` when the quartet indexes past the coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TorsionReport {
    pub kind: MotifKind,
    pub quartet: MotifQuartet,
    pub torsion: Option<f64>,
    pub valid: bool,
}

impl TorsionReport {
    fn measure(kind: MotifKind, quartet: MotifQuartet, coords: &[f64]) -> Self {
        let torsion = torsion_from_coords(coords, quartet.torsion_atoms());
        Self {
            kind,
            quartet,
            torsion,
            valid: torsion.is_some_and(|t| kind.accepts(t)),
        }
    }

    pub fn state_label(&self) -> &'static str {
        match (self.kind, self.torsion) {
            (_, None) => "unmeasurable",
            (MotifKind::PeptideBond, Some(t)) => match classify_peptide_torsion(t) {
                PeptideIsomer::Trans => "trans",
                PeptideIsomer::Cis => "cis",
            },
            (MotifKind::ChiralCenter, Some(t)) => match classify_alpha_torsion(t) {
                Handedness::L => "L",
                Handedness::D => "D",
            },
        }
    }
}

impl fmt::Display for TorsionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.torsion {
            Some(t) => write!(
                f,
                "{} {} at {:.2} deg ({})",
                self.kind.as_str(),
                self.quartet,
                t,
                self.state_label()
            ),
            None => write!(
                f,
                "{} {} outside coordinate vector",
                self.kind.as_str(),
                self.quartet
            ),
        }
    }
}

fn first_violation(
    kind: MotifKind,
    coords: &[f64],
    quartets: &[MotifQuartet],
) -> Option<TorsionReport> {
    quartets
        .iter()
        .map(|&q| TorsionReport::measure(kind, q, coords))
        .find(|report| !report.valid)
}

fn check(kind: MotifKind, coords: &[f64], quartets: &[MotifQuartet]) -> bool {
    match first_violation(kind, coords, quartets) {
        None => true,
        Some(report) => {
            if report.torsion.is_some() {
                debug!("Rejected conformation: {}", report);
            } else {
                warn!("Rejected conformation: {}", report);
            }
            false
        }
    }
}

/// The first peptide bond that is not trans, if any.
pub fn find_cis_peptide_bond(coords: &[f64], quartets: &[MotifQuartet]) -> Option<TorsionReport> {
    first_violation(MotifKind::PeptideBond, coords, quartets)
}

/// The first alpha carbon that is not L, if any.
pub fn find_d_chiral_center(coords: &[f64], quartets: &[MotifQuartet]) -> Option<TorsionReport> {
    first_violation(MotifKind::ChiralCenter, coords, quartets)
}

/// True iff every peptide bond is trans. An empty list passes.
pub fn is_peptide_bond_trans(coords: &[f64], quartets: &[MotifQuartet]) -> bool {
    check(MotifKind::PeptideBond, coords, quartets)
}

/// True iff every chiral center is L. An empty list passes.
pub fn is_chirality_correct(coords: &[f64], quartets: &[MotifQuartet]) -> bool {
    check(MotifKind::ChiralCenter, coords, quartets)
}

/// Validity checks bound to one system's motif index.
///
/// Cloning is cheap and clones share the index, so a checker can be moved into filters
/// running on other threads.
#[derive(Debug, Clone)]
pub struct ValidityChecker {
    index: Arc<MotifIndex>,
}

impl ValidityChecker {
    pub fn new(index: Arc<MotifIndex>) -> Self {
        Self { index }
    }

    pub fn index(&self) -> &MotifIndex {
        &self.index
    }

    pub fn is_peptide_bond_trans(&self, coords: &[f64]) -> bool {
        is_peptide_bond_trans(coords, self.index.peptide_bonds())
    }

    pub fn is_chirality_correct(&self, coords: &[f64]) -> bool {
        is_chirality_correct(coords, self.index.chiral_centers())
    }

    pub fn is_valid(&self, coords: &[f64]) -> bool {
        self.is_peptide_bond_trans(coords) && self.is_chirality_correct(coords)
    }

    /// Measures every motif; peptide bonds first, then chiral centers, each in index order.
    pub fn report(&self, coords: &[f64]) -> Vec<TorsionReport> {
        let peptides = self
            .index
            .peptide_bonds()
            .iter()
            .map(|&q| TorsionReport::measure(MotifKind::PeptideBond, q, coords));
        let centers = self
            .index
            .chiral_centers()
            .iter()
            .map(|&q| TorsionReport::measure(MotifKind::ChiralCenter, q, coords));
        peptides.chain(centers).collect()
    }
}
