use super::error::{FormatError, ParseErrorKind};
use super::traits::StructureFile;
use crate::core::models::coordinates::Coordinates;
use std::io::BufRead;

const FIELD_WIDTH: usize = 12;
const MAX_PREALLOCATED_VALUES: usize = 1 << 20;

/// Reader for AMBER restart/coordinate (`inpcrd`) files.
///
/// The first line is a title, the second starts with the atom count (optionally followed by
/// a time stamp), and the remaining lines hold `6F12.7` coordinates. Anything past the first
/// `3N` values (velocities, box dimensions) is ignored.
pub struct InpcrdFile;

impl StructureFile for InpcrdFile {
    type Output = Coordinates;
    type Error = FormatError;

    fn read_from(reader: &mut impl BufRead) -> Result<Coordinates, FormatError> {
        let mut lines = reader.lines();

        lines
            .next()
            .transpose()?
            .ok_or_else(|| FormatError::MissingSection("title line".into()))?;

        let count_line = lines
            .next()
            .transpose()?
            .ok_or_else(|| FormatError::MissingSection("atom count line".into()))?;
        let count_field = count_line.split_whitespace().next().unwrap_or("");
        let atom_count: usize = count_field
            .parse()
            .map_err(|_| FormatError::parse(2, ParseErrorKind::InvalidInt(count_field.into())))?;

        let expected = atom_count.checked_mul(3).ok_or_else(|| {
            FormatError::parse(2, ParseErrorKind::InvalidInt(count_field.into()))
        })?;
        let mut values = Vec::with_capacity(expected.min(MAX_PREALLOCATED_VALUES));

        for (offset, line_res) in lines.enumerate() {
            if values.len() == expected {
                break;
            }
            let line = line_res?;
            let line_num = offset + 3;
            if !line.is_ascii() {
                return Err(FormatError::parse(line_num, ParseErrorKind::NonAscii));
            }
            for chunk in line.as_bytes().chunks(FIELD_WIDTH) {
                let field = String::from_utf8_lossy(chunk);
                let field = field.trim();
                if field.is_empty() || values.len() == expected {
                    continue;
                }
                let value: f64 = field.parse().map_err(|_| {
                    FormatError::parse(line_num, ParseErrorKind::InvalidFloat(field.into()))
                })?;
                values.push(value);
            }
        }

        if values.len() != expected {
            return Err(FormatError::Inconsistency(format!(
                "expected {} coordinate values for {} atoms, found {}",
                expected,
                atom_count,
                values.len()
            )));
        }

        Ok(Coordinates::from_flat(values)?)
    }
}
