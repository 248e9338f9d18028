use crate::cli::IndexArgs;
use crate::commands::load_system;
use crate::config::PartialAmberConfig;
use crate::error::Result;
use amberpath::core::topology::motifs::MotifIndex;
use tracing::info;

pub async fn run(args: IndexArgs) -> Result<()> {
    let partial = PartialAmberConfig::discover(args.system.config.as_deref())?;
    info!("Merging configuration from file and CLI arguments...");
    let resolved = partial.merge_with_cli(&args.system, None, None, None)?;
    let system = load_system(resolved)?;

    print!("{}", render_index(system.motif_index(), system.atom_count()));
    Ok(())
}

/// Human-readable listing of every quartet the validity checks measure.
pub fn render_index(index: &MotifIndex, atom_count: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!("Atoms: {}\n", atom_count));

    out.push_str(&format!(
        "Peptide bonds (C, O, N, H): {}\n",
        index.peptide_bonds().len()
    ));
    for quartet in index.peptide_bonds() {
        out.push_str(&format!("  {}\n", quartet));
    }

    out.push_str(&format!(
        "Chiral centers (CA, C, CB, N): {}\n",
        index.chiral_centers().len()
    ));
    for quartet in index.chiral_centers() {
        out.push_str(&format!("  {}\n", quartet));
    }

    if !index.achiral_alpha_carbons().is_empty() {
        let skipped: Vec<String> = index
            .achiral_alpha_carbons()
            .iter()
            .map(usize::to_string)
            .collect();
        out.push_str(&format!(
            "Skipped alpha carbons without CB: {}\n",
            skipped.join(", ")
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use crate::commands::fixtures::system_dir;
    use crate::config::PartialAmberConfig;
    use amberpath::core::models::atom::AtomRecord;
    use amberpath::core::models::topology::{Bond, Topology};
    use amberpath::core::topology::motifs::MotifSearch;
    use clap::Parser;

    #[test]
    fn renders_the_indexed_peptide_unit() {
        let fx = system_dir("");
        let config = fx.config.to_str().unwrap();
        let args = match Cli::parse_from(["amberpath", "index", "-c", config]).command {
            Commands::Index(args) => args,
            other => panic!("unexpected command: {other:?}"),
        };
        let resolved = PartialAmberConfig::from_file(&fx.config)
            .unwrap()
            .merge_with_cli(&args.system, None, None, None)
            .unwrap();
        let system = load_system(resolved).unwrap();

        let text = render_index(system.motif_index(), system.atom_count());
        assert_eq!(
            text,
            "Atoms: 4\nPeptide bonds (C, O, N, H): 1\n  (0, 1, 2, 3)\nChiral centers (CA, C, CB, N): 0\n"
        );
    }

    #[test]
    fn lists_glycine_alpha_carbons_as_skipped() {
        let atoms = ["N", "CA", "HA2", "HA3", "C"]
            .iter()
            .enumerate()
            .map(|(i, n)| AtomRecord::new(i, n))
            .collect();
        let bonds = [(0, 1), (1, 2), (1, 3), (1, 4)]
            .iter()
            .map(|&(a, b)| Bond::new(a, b))
            .collect();
        let topology = Topology::new(atoms, bonds).unwrap();
        let index = MotifIndex::build(&topology, MotifSearch::IndexLayout).unwrap();

        assert_eq!(
            render_index(&index, 5),
            "Atoms: 5\nPeptide bonds (C, O, N, H): 0\nChiral centers (CA, C, CB, N): 0\nSkipped alpha carbons without CB: 1\n"
        );
    }
}
