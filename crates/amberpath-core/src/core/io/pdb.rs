use super::error::{FormatError, ParseErrorKind};
use super::traits::StructureFile;
use std::io::BufRead;

/// One `ATOM`/`HETATM` record, reduced to what residue-based lookups need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdbAtom {
    /// Zero-based position of the record in the file, which is the topology index for
    /// structures written from the same topology.
    pub index: usize,
    pub name: String,
    /// Residue name, up to four characters so terminal-annotated names such as `NALA` fit.
    pub residue_name: String,
    pub residue_number: isize,
}

/// A run of consecutive records sharing residue number and name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdbResidue {
    pub name: String,
    pub number: isize,
    pub atoms: Vec<PdbAtom>,
}

impl PdbResidue {
    /// Finds the index of the atom with the given name within this residue.
    pub fn atom_index(&self, name: &str) -> Option<usize> {
        self.atoms.iter().find(|a| a.name == name).map(|a| a.index)
    }
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end.min(line.len())).unwrap_or("").trim()
}

/// Reader for the residue layout of PDB files.
///
/// Only `ATOM` and `HETATM` records are read; `MODEL`/`ENDMDL` are not interpreted, so a
/// multi-model file yields the atoms of every model in sequence.
pub struct PdbFile;

impl StructureFile for PdbFile {
    type Output = Vec<PdbResidue>;
    type Error = FormatError;

    fn read_from(reader: &mut impl BufRead) -> Result<Vec<PdbResidue>, FormatError> {
        let mut residues: Vec<PdbResidue> = Vec::new();
        let mut index = 0;

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            let record_type = slice_and_trim(&line, 0, 6);
            if record_type != "ATOM" && record_type != "HETATM" {
                continue;
            }
            if !line.is_ascii() {
                return Err(FormatError::parse(line_num, ParseErrorKind::NonAscii));
            }

            let name = slice_and_trim(&line, 12, 16);
            let residue_name = slice_and_trim(&line, 17, 21);
            let number_str = slice_and_trim(&line, 22, 26);
            let residue_number: isize = number_str.parse().map_err(|_| {
                FormatError::parse(line_num, ParseErrorKind::InvalidInt(number_str.into()))
            })?;

            let atom = PdbAtom {
                index,
                name: name.to_string(),
                residue_name: residue_name.to_string(),
                residue_number,
            };
            index += 1;

            match residues.last_mut() {
                Some(residue)
                    if residue.number == residue_number && residue.name == residue_name =>
                {
                    residue.atoms.push(atom);
                }
                _ => residues.push(PdbResidue {
                    name: residue_name.to_string(),
                    number: residue_number,
                    atoms: vec![atom],
                }),
            }
        }

        Ok(residues)
    }
}
