//! CSV import of energy/tariff events.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use serde::Deserialize;

use crate::error::{LedgerError, Result};
use crate::events::Event;

/// One data row of an event source. Extra columns are ignored.
#[derive(Debug, Deserialize)]
struct EventRow {
    #[serde(rename = "NMI")]
    nmi: String,
    #[serde(rename = "DATE")]
    date: String,
    #[serde(rename = "ENERGY")]
    energy: String,
    #[serde(rename = "TARIFF")]
    tariff: String,
}

/// Reads every event from the CSV file at `path`.
///
/// # Errors
///
/// Returns `NotFound` if the file does not exist, `Io` for other open
/// failures, and `ParseRow` for the first row that cannot be parsed.
pub fn read_events_from_path(path: &Path) -> Result<Vec<Event>> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => LedgerError::NotFound {
            path: path.to_path_buf(),
        },
        _ => LedgerError::Io(e),
    })?;
    read_events(io::BufReader::new(file))
}

/// Reads every event from CSV text with an `NMI,DATE,ENERGY,TARIFF` header.
///
/// Rows are returned in source order. Nothing is returned unless every row
/// parses.
///
/// # Errors
///
/// Returns `ParseRow` carrying the 1-based data line of the first bad row.
pub fn read_events(reader: impl Read) -> Result<Vec<Event>> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

    let mut events = Vec::new();
    for (idx, row) in rdr.deserialize::<EventRow>().enumerate() {
        let line = idx as u64 + 1;
        let parsed = row
            .map_err(LedgerError::from)
            .and_then(|r| Event::parse(&r.nmi, &r.date, &r.energy, &r.tariff));
        match parsed {
            Ok(event) => events.push(event),
            Err(source) => {
                return Err(LedgerError::ParseRow {
                    line,
                    source: Box::new(source),
                });
            }
        }
    }
    Ok(events)
}
