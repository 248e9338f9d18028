use crate::error::{CliError, Result};
use amberpath::core::io::inpcrd::InpcrdFile;
use amberpath::core::io::listing::CoordinateListing;
use amberpath::core::io::traits::StructureFile;
use amberpath::core::models::coordinates::Coordinates;
use std::path::Path;

const AMBER_COORDINATE_EXTENSIONS: [&str; 4] = ["inpcrd", "crd", "rst7", "restrt"];

/// Reads a conformation, choosing the format from the file extension. Anything that is not
/// an AMBER coordinate file is read as a plain listing.
pub fn read_coordinates(path: &Path) -> Result<Coordinates> {
    let is_amber = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            AMBER_COORDINATE_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        });

    let result = if is_amber {
        InpcrdFile::read_from_path(path)
    } else {
        CoordinateListing::read_from_path(path)
    };
    result.map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })
}

/// Reads a conformation and checks it against the system size.
pub fn read_coordinates_for(path: &Path, atom_count: usize) -> Result<Coordinates> {
    let coords = read_coordinates(path)?;
    if coords.atom_count() != atom_count {
        return Err(CliError::Argument(format!(
            "{} holds {} atoms but the topology has {}",
            path.display(),
            coords.atom_count(),
            atom_count
        )));
    }
    Ok(coords)
}
