use std::error::Error;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Defines the interface for reading a delimited table into typed records.
///
/// Implementors decide the delimiter, the accepted header names, and how each row maps
/// onto [`Self::Record`]. Rows are returned unvalidated; semantic checks belong to the
/// models that consume them.
pub trait TableFile {
    /// The record type produced for each data row.
    type Record;

    /// The error type for read operations.
    type Error: Error + From<io::Error>;

    /// Reads every record from `reader`.
    ///
    /// # Errors
    ///
    /// Returns an error if the header is unusable or a row cannot be decoded.
    fn read_from(reader: impl Read) -> Result<Vec<Self::Record>, Self::Error>;

    /// Reads every record from the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Self::Record>, Self::Error> {
        let file = File::open(path)?;
        Self::read_from(BufReader::new(file))
    }
}
