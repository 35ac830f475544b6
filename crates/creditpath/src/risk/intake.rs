use std::io::Read;
use std::path::Path;

use super::domain::BorrowerInputs;

/// One borrower row from a batch file. Rows that fail to parse keep their error text.
#[derive(Debug, Clone, PartialEq)]
pub struct IntakeRow {
    pub line: u64,
    pub inputs: Result<BorrowerInputs, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("failed to read borrower file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid borrower CSV data: {0}")]
    Csv(#[from] csv::Error),
}

/// Reads borrower inputs from CSV with headers named after the form fields.
pub struct BorrowerCsvImporter;

impl BorrowerCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<IntakeRow>, IntakeError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<IntakeRow>, IntakeError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = csv_reader.headers()?.clone();
        let mut rows = Vec::new();

        for record in csv_reader.records() {
            let record = record?;
            let line = record
                .position()
                .map(|position| position.line())
                .unwrap_or_default();
            let inputs = record
                .deserialize::<BorrowerInputs>(Some(&headers))
                .map_err(|err| err.to_string());
            rows.push(IntakeRow { line, inputs });
        }

        Ok(rows)
    }
}
