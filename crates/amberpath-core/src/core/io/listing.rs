use super::error::{FormatError, ParseErrorKind};
use super::traits::{StructureFile, StructureWriter};
use crate::core::models::coordinates::Coordinates;
use std::io::{BufRead, Write};

/// The plain coordinate listing used for the connect engine's `start` and `finish` files.
///
/// One atom per line in index order, three space-separated values with six decimals each
/// (`"%f %f %f"`). The engine parses this textually, so the format is fixed.
pub struct CoordinateListing;

impl StructureWriter for CoordinateListing {
    type Input = [f64];
    type Error = FormatError;

    fn write_to(coords: &[f64], writer: &mut impl Write) -> Result<(), FormatError> {
        if coords.len() % 3 != 0 {
            return Err(FormatError::Inconsistency(format!(
                "coordinate vector of length {} is not a multiple of 3",
                coords.len()
            )));
        }
        for xyz in coords.chunks_exact(3) {
            writeln!(writer, "{:.6} {:.6} {:.6}", xyz[0], xyz[1], xyz[2])?;
        }
        Ok(())
    }
}

impl StructureFile for CoordinateListing {
    type Output = Coordinates;
    type Error = FormatError;

    fn read_from(reader: &mut impl BufRead) -> Result<Coordinates, FormatError> {
        let mut values = Vec::new();
        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() != 3 {
                return Err(FormatError::parse(
                    line_num,
                    ParseErrorKind::FieldCount {
                        expected: 3,
                        found: fields.len(),
                    },
                ));
            }
            for field in fields {
                let value: f64 = field.parse().map_err(|_| {
                    FormatError::parse(line_num, ParseErrorKind::InvalidFloat(field.into()))
                })?;
                values.push(value);
            }
        }
        Ok(Coordinates::from_flat(values)?)
    }
}
