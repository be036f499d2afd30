//! Equipment import
//!
//! Readers that turn JSON or CSV files into `Equipment` records for the
//! command-line front end. CSV columns are matched by header name against
//! the record's field names; rows that fail to parse or validate are
//! reported and skipped instead of aborting the whole import.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::Reader;

use crate::error::{FleetError, FleetResult};
use crate::models::Equipment;

/// Supported input formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Csv,
}

impl InputFormat {
    /// Guess the format from a file extension
    pub fn from_path(path: &Path) -> FleetResult<Self> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => Ok(Self::Json),
            Some("csv") => Ok(Self::Csv),
            _ => Err(FleetError::Import(format!(
                "Unsupported input file '{}': expected a .json or .csv file",
                path.display()
            ))),
        }
    }
}

/// Result of reading an equipment file
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    /// Records that parsed and validated
    pub imported: Vec<Equipment>,
    /// Error messages by 1-based data row
    pub error_messages: BTreeMap<usize, String>,
}

impl ImportResult {
    pub fn errors(&self) -> usize {
        self.error_messages.len()
    }
}

/// Parse equipment rows from a CSV reader with a header row
pub fn parse_csv_from_reader<R: Read>(reader: &mut Reader<R>) -> ImportResult {
    let mut result = ImportResult::default();

    for (idx, row) in reader.deserialize::<Equipment>().enumerate() {
        let row_number = idx + 1;
        let parsed = row
            .map_err(|e| format!("Error reading CSV record: {}", e))
            .and_then(|equipment| {
                equipment
                    .validate()
                    .map(|_| equipment)
                    .map_err(|e| e.to_string())
            });

        match parsed {
            Ok(equipment) => result.imported.push(equipment),
            Err(message) => {
                tracing::warn!(row = row_number, %message, "skipping equipment row");
                result.error_messages.insert(row_number, message);
            }
        }
    }

    result
}

/// Read equipment from CSV text
pub fn read_equipment_csv<R: Read>(input: R) -> ImportResult {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(input);
    parse_csv_from_reader(&mut reader)
}

/// Read a JSON array of equipment records
///
/// JSON input is all-or-nothing for syntax; structurally invalid records
/// are reported per element like CSV rows.
pub fn read_equipment_json<R: Read>(input: R) -> FleetResult<ImportResult> {
    let records: Vec<Equipment> = serde_json::from_reader(input)?;
    let mut result = ImportResult::default();

    for (idx, equipment) in records.into_iter().enumerate() {
        match equipment.validate() {
            Ok(()) => result.imported.push(equipment),
            Err(e) => {
                tracing::warn!(row = idx + 1, error = %e, "skipping equipment record");
                result.error_messages.insert(idx + 1, e.to_string());
            }
        }
    }

    Ok(result)
}

/// Load equipment from a `.json` or `.csv` file
pub fn load_equipment_file(path: &Path) -> FleetResult<ImportResult> {
    let format = InputFormat::from_path(path)?;
    let file = File::open(path)
        .map_err(|e| FleetError::Io(format!("Failed to open '{}': {}", path.display(), e)))?;
    let reader = BufReader::new(file);

    let result = match format {
        InputFormat::Json => read_equipment_json(reader)?,
        InputFormat::Csv => read_equipment_csv(reader),
    };

    tracing::info!(
        path = %path.display(),
        imported = result.imported.len(),
        errors = result.errors(),
        "loaded equipment file"
    );
    Ok(result)
}
