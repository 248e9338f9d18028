use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Defines the interface for reading a structure-related file format.
///
/// Implementors parse one format into one model type; the path-based helpers are provided so
/// that every format opens files the same way.
pub trait StructureFile {
    /// The model produced by a successful read.
    type Output;

    /// The error type for I/O and parse failures.
    type Error: Error + From<io::Error>;

    /// Reads the model from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or the reader fails.
    fn read_from(reader: &mut impl BufRead) -> Result<Self::Output, Self::Error>;

    /// Reads the model from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self::Output, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }
}

/// Defines the interface for writing a model in a given file format.
pub trait StructureWriter {
    /// The model consumed by the writer.
    type Input: ?Sized;

    /// The error type for write failures.
    type Error: Error + From<io::Error>;

    /// Writes the model to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_to(input: &Self::Input, writer: &mut impl Write) -> Result<(), Self::Error>;

    /// Writes the model to a newly created file, flushing before returning.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(input: &Self::Input, path: P) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(input, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
