// CSV import - register a fleet of chassis numbers in one go
//
// Expects a header row with a `chassis_number` column; extra columns are
// ignored. Each row becomes one `createCar` invocation.

use crate::command::CREATE_CAR;
use crate::error;
use crate::host::ChaincodeHost;
use crate::ledger::LedgerStore;
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct CarRow {
    chassis_number: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub inserted: usize,
    pub duplicates: usize,
}

pub fn load_chassis_numbers(csv_path: &Path) -> Result<Vec<String>> {
    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("Failed to open CSV file {}", csv_path.display()))?;
    read_chassis_numbers(file)
}

pub fn read_chassis_numbers<R: Read>(reader: R) -> Result<Vec<String>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut chassis_numbers = Vec::new();

    for (line, result) in rdr.deserialize().enumerate() {
        let row: CarRow = result.with_context(|| format!("Failed to read CSV row {}", line + 1))?;
        let chassis = row.chassis_number.trim();
        if !chassis.is_empty() {
            chassis_numbers.push(chassis.to_string());
        }
    }

    Ok(chassis_numbers)
}

/// Create every chassis number; existing ones are skipped and counted.
pub fn import_cars<S: LedgerStore>(
    host: &mut ChaincodeHost<S>,
    chassis_numbers: &[String],
) -> Result<ImportSummary> {
    let mut summary = ImportSummary::default();

    for chassis in chassis_numbers {
        let response = host.invoke(&[CREATE_CAR, chassis.as_str()]);

        if response.is_ok() {
            summary.inserted += 1;
        } else if response.status == error::CONFLICT {
            debug!(chassis = %chassis, "skipping existing car");
            summary.duplicates += 1;
        } else {
            return Err(anyhow!(
                "import stopped at {}: {}",
                chassis,
                response.message
            ));
        }
    }

    info!(
        inserted = summary.inserted,
        duplicates = summary.duplicates,
        "import finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LifecycleConfig;
    use crate::ledger::MemoryLedger;

    #[test]
    fn test_read_chassis_numbers_skips_blank_rows() {
        let csv = "chassis_number,model\n1000,Sedan\n  ,Coupe\n\n2000,Hatch\n";
        let rows = read_chassis_numbers(csv.as_bytes()).unwrap();

        assert_eq!(rows, vec!["1000", "2000"]);
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let csv = "vin\n1000\n";
        assert!(read_chassis_numbers(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_import_twice_counts_duplicates() {
        let mut host = ChaincodeHost::new(MemoryLedger::new(), LifecycleConfig::default());
        let rows = vec!["1000".to_string(), "2000".to_string(), "3000".to_string()];

        let first = import_cars(&mut host, &rows).unwrap();
        let second = import_cars(&mut host, &rows).unwrap();

        assert_eq!(first, ImportSummary { inserted: 3, duplicates: 0 });
        assert_eq!(second, ImportSummary { inserted: 0, duplicates: 3 });
        assert_eq!(host.store().keys().unwrap().len(), 3);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fleet.csv");
        std::fs::write(&path, "chassis_number\nMA3-1\nMA3-2\n").unwrap();

        assert_eq!(load_chassis_numbers(&path).unwrap(), vec!["MA3-1", "MA3-2"]);
    }
}
