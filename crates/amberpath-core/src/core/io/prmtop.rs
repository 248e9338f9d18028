use super::error::{FormatError, ParseErrorKind};
use super::traits::StructureFile;
use crate::core::models::atom::AtomRecord;
use crate::core::models::topology::{Bond, ResidueSpan, Topology};
use phf::{Set, phf_set};
use std::collections::HashMap;
use std::io::BufRead;

/// Sections of the parameter/topology file that the topology model is built from. Every
/// other section (charges, masses, force constants) belongs to the potential and is skipped.
static TOPOLOGY_FLAGS: Set<&'static str> = phf_set! {
    "POINTERS",
    "ATOM_NAME",
    "RESIDUE_LABEL",
    "RESIDUE_POINTER",
    "BONDS_INC_HYDROGEN",
    "BONDS_WITHOUT_HYDROGEN",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FieldFormat {
    width: usize,
}

impl FieldFormat {
    /// Parses a Fortran edit descriptor such as `20a4`, `10I8` or `5E16.8`.
    fn parse(spec: &str) -> Option<Self> {
        let spec = spec.trim();
        let letter_pos = spec.find(|c: char| c.is_ascii_alphabetic())?;
        let width_digits: String = spec[letter_pos + 1..]
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        let width: usize = width_digits.parse().ok()?;
        if width == 0 {
            return None;
        }
        Some(Self { width })
    }
}

#[derive(Debug, Default)]
struct Section {
    format: Option<FieldFormat>,
    items: Vec<(usize, String)>,
}

/// Reader for AMBER parameter/topology (`prmtop`) files.
///
/// Produces the covalent [`Topology`]: atom names from `ATOM_NAME`, residue spans from
/// `RESIDUE_LABEL`/`RESIDUE_POINTER`, and the union of `BONDS_INC_HYDROGEN` and
/// `BONDS_WITHOUT_HYDROGEN`. Bond entries use the coordinate-array convention, so the
/// zero-based atom index is the stored value divided by three.
pub struct PrmtopFile;

impl StructureFile for PrmtopFile {
    type Output = Topology;
    type Error = FormatError;

    fn read_from(reader: &mut impl BufRead) -> Result<Topology, FormatError> {
        let sections = read_sections(reader)?;

        let pointers = int_items(&sections, "POINTERS")?;
        let atom_count = match pointers.first() {
            Some(&(_, n)) if n >= 0 => n as usize,
            Some(&(line, n)) => {
                return Err(FormatError::parse(
                    line,
                    ParseErrorKind::InvalidInt(n.to_string()),
                ));
            }
            None => return Err(FormatError::MissingSection("POINTERS (NATOM)".into())),
        };

        let names = string_items(&sections, "ATOM_NAME")?;
        if names.len() != atom_count {
            return Err(FormatError::Inconsistency(format!(
                "POINTERS declares {} atoms but ATOM_NAME lists {}",
                atom_count,
                names.len()
            )));
        }
        let atoms = names
            .iter()
            .enumerate()
            .map(|(i, name)| AtomRecord::new(i, name))
            .collect();

        let mut bonds = Vec::new();
        for flag in ["BONDS_INC_HYDROGEN", "BONDS_WITHOUT_HYDROGEN"] {
            bonds.extend(read_bonds(&sections, flag)?);
        }

        let topology = Topology::new(atoms, bonds)?;
        let residues = read_residues(&sections)?;
        Ok(topology.with_residues(residues)?)
    }
}

fn read_sections(reader: &mut impl BufRead) -> Result<HashMap<String, Section>, FormatError> {
    let mut sections: HashMap<String, Section> = HashMap::new();
    let mut current: Option<String> = None;

    for (line_num, line_res) in reader.lines().enumerate() {
        let line = line_res?;
        let line_num = line_num + 1;

        if let Some(flag) = line.strip_prefix("%FLAG") {
            let flag = flag.trim().to_string();
            current = TOPOLOGY_FLAGS.contains(flag.as_str()).then(|| {
                sections.entry(flag.clone()).or_default();
                flag
            });
            continue;
        }
        if let Some(spec) = line.strip_prefix("%FORMAT") {
            if let Some(section) = current.as_ref().and_then(|f| sections.get_mut(f)) {
                let inner = spec.trim().trim_start_matches('(').trim_end_matches(')');
                let format = FieldFormat::parse(inner).ok_or_else(|| {
                    FormatError::parse(line_num, ParseErrorKind::InvalidFormat(inner.into()))
                })?;
                section.format = Some(format);
            }
            continue;
        }
        if line.starts_with('%') {
            // %VERSION and %COMMENT lines carry no data.
            continue;
        }

        let Some(section) = current.as_ref().and_then(|f| sections.get_mut(f)) else {
            continue;
        };
        let format = section
            .format
            .ok_or_else(|| FormatError::parse(line_num, ParseErrorKind::DataOutsideSection))?;
        if !line.is_ascii() {
            return Err(FormatError::parse(line_num, ParseErrorKind::NonAscii));
        }
        for chunk in line.as_bytes().chunks(format.width) {
            let field = String::from_utf8_lossy(chunk).trim().to_string();
            if !field.is_empty() {
                section.items.push((line_num, field));
            }
        }
    }

    Ok(sections)
}

fn string_items(
    sections: &HashMap<String, Section>,
    flag: &str,
) -> Result<Vec<String>, FormatError> {
    sections
        .get(flag)
        .map(|s| s.items.iter().map(|(_, v)| v.clone()).collect())
        .ok_or_else(|| FormatError::MissingSection(flag.into()))
}

fn int_items(
    sections: &HashMap<String, Section>,
    flag: &str,
) -> Result<Vec<(usize, i64)>, FormatError> {
    let section = sections
        .get(flag)
        .ok_or_else(|| FormatError::MissingSection(flag.into()))?;
    section
        .items
        .iter()
        .map(|(line, value)| {
            value
                .parse::<i64>()
                .map(|v| (*line, v))
                .map_err(|_| FormatError::parse(*line, ParseErrorKind::InvalidInt(value.clone())))
        })
        .collect()
}

fn read_bonds(sections: &HashMap<String, Section>, flag: &str) -> Result<Vec<Bond>, FormatError> {
    // A topology without hydrogens (or without heavy-atom bonds) may omit the section.
    if !sections.contains_key(flag) {
        return Ok(Vec::new());
    }
    let values = int_items(sections, flag)?;
    if values.len() % 3 != 0 {
        return Err(FormatError::Inconsistency(format!(
            "{} holds {} values, expected triples of (atom, atom, type)",
            flag,
            values.len()
        )));
    }

    values
        .chunks_exact(3)
        .map(|triple| {
            let a = coordinate_offset_to_index(triple[0])?;
            let b = coordinate_offset_to_index(triple[1])?;
            Ok(Bond::new(a, b))
        })
        .collect()
}

fn coordinate_offset_to_index((line, value): (usize, i64)) -> Result<usize, FormatError> {
    if value < 0 || value % 3 != 0 {
        return Err(FormatError::parse(
            line,
            ParseErrorKind::InvalidInt(value.to_string()),
        ));
    }
    Ok((value / 3) as usize)
}

fn read_residues(sections: &HashMap<String, Section>) -> Result<Vec<ResidueSpan>, FormatError> {
    let (Some(_), Some(_)) = (
        sections.get("RESIDUE_LABEL"),
        sections.get("RESIDUE_POINTER"),
    ) else {
        return Ok(Vec::new());
    };

    let labels = string_items(sections, "RESIDUE_LABEL")?;
    let pointers = int_items(sections, "RESIDUE_POINTER")?;
    if labels.len() != pointers.len() {
        return Err(FormatError::Inconsistency(format!(
            "RESIDUE_LABEL lists {} residues but RESIDUE_POINTER lists {}",
            labels.len(),
            pointers.len()
        )));
    }

    labels
        .into_iter()
        .zip(pointers)
        .enumerate()
        .map(|(i, (name, (line, first)))| {
            if first < 1 {
                return Err(FormatError::parse(
                    line,
                    ParseErrorKind::InvalidInt(first.to_string()),
                ));
            }
            Ok(ResidueSpan {
                name,
                number: i + 1,
                first_atom: (first - 1) as usize,
            })
        })
        .collect()
}
