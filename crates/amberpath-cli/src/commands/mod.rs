pub mod check;
pub mod connect;
pub mod index;

use crate::config::ResolvedConfig;
use crate::error::Result;
use amberpath::core::forcefield::potential::TopologyOnly;
use amberpath::workflows::system::AmberSystem;
use tracing::info;

/// Builds the system every subcommand works on from the merged settings.
pub(crate) fn load_system(resolved: ResolvedConfig) -> Result<AmberSystem<TopologyOnly>> {
    info!(
        "Loading topology from {:?}",
        &resolved.system.files.prmtop
    );
    let system = AmberSystem::from_files(resolved.system, &resolved.permutations)?;
    info!(
        "Indexed {} atoms: {} peptide bond(s), {} chiral center(s), {} permutation group(s).",
        system.atom_count(),
        system.motif_index().peptide_bonds().len(),
        system.motif_index().chiral_centers().len(),
        system.permutations().len()
    );
    Ok(system)
}
