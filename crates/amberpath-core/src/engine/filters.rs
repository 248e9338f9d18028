use super::validity::ValidityChecker;
use std::sync::Arc;

/// Acceptance hook of the global-search driver: `(energy, coords) -> accept`.
pub type AcceptanceFilter = Arc<dyn Fn(f64, &[f64]) -> bool + Send + Sync>;

/// Per-node validity hook of the path-connection driver.
pub type NodeFilter = Arc<dyn Fn(&[f64]) -> bool + Send + Sync>;

/// Rejects conformations with any cis peptide bond. The energy is ignored.
pub fn cis_trans_filter(checker: ValidityChecker) -> AcceptanceFilter {
    Arc::new(move |_energy: f64, coords: &[f64]| checker.is_peptide_bond_trans(coords))
}

/// Rejects conformations with any D alpha carbon. The energy is ignored.
pub fn chirality_filter(checker: ValidityChecker) -> AcceptanceFilter {
    Arc::new(move |_energy: f64, coords: &[f64]| checker.is_chirality_correct(coords))
}

/// Accepts only when every filter accepts, evaluating in order and stopping at the first
/// rejection.
pub fn all_of(filters: Vec<AcceptanceFilter>) -> AcceptanceFilter {
    Arc::new(move |energy: f64, coords: &[f64]| filters.iter().all(|f| f(energy, coords)))
}

/// Adapts an acceptance filter to path nodes, which carry no energy.
pub fn node_filter(filter: AcceptanceFilter) -> NodeFilter {
    Arc::new(move |coords: &[f64]| filter(f64::NAN, coords))
}
