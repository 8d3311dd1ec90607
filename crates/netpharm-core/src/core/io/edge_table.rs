use super::traits::TableFile;
use crate::core::models::interaction::RawInteraction;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::io::{self, Read};
use thiserror::Error;
use tracing::debug;

const ENTITY_A_COLUMNS: [&str; 2] = ["entity_A", "preferredName_A"];
const ENTITY_B_COLUMNS: [&str; 2] = ["entity_B", "preferredName_B"];
const SCORE_COLUMN: &str = "score";

#[derive(Debug, Error)]
pub enum EdgeTableError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Malformed interaction table: {0}")]
    Csv(#[from] csv::Error),
    #[error("Interaction table has no '{0}' column")]
    MissingColumn(&'static str),
}

/// A tab-separated interaction table with a header row.
///
/// Either the generic `entity_A`/`entity_B` columns or STRING's
/// `preferredName_A`/`preferredName_B` columns are accepted, together with `score`.
/// Other columns are ignored, as are blank lines and lines starting with `#`.
pub struct EdgeTable;

impl EdgeTable {
    fn locate(
        headers: &StringRecord,
        candidates: &[&'static str],
    ) -> Result<usize, EdgeTableError> {
        candidates
            .iter()
            .find_map(|name| headers.iter().position(|h| h == *name))
            .ok_or(EdgeTableError::MissingColumn(candidates[0]))
    }
}

impl TableFile for EdgeTable {
    type Record = RawInteraction;
    type Error = EdgeTableError;

    fn read_from(reader: impl Read) -> Result<Vec<RawInteraction>, EdgeTableError> {
        let mut reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .comment(Some(b'#'))
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let a_idx = Self::locate(&headers, &ENTITY_A_COLUMNS)?;
        let b_idx = Self::locate(&headers, &ENTITY_B_COLUMNS)?;
        let score_idx = Self::locate(&headers, &[SCORE_COLUMN])?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(RawInteraction::new(
                record.get(a_idx).unwrap_or_default(),
                record.get(b_idx).unwrap_or_default(),
                record.get(score_idx).unwrap_or_default(),
            ));
        }
        debug!(rows = rows.len(), "Interaction table read.");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn reads_generic_entity_columns() {
        let table = "entity_A\tentity_B\tscore\nEGFR\tGRB2\t999\nSRC\tEGFR\t0.85\n";
        let rows = EdgeTable::read_from(table.as_bytes()).unwrap();
        assert_eq!(
            rows,
            vec![
                RawInteraction::new("EGFR", "GRB2", "999"),
                RawInteraction::new("SRC", "EGFR", "0.85"),
            ]
        );
    }

    #[test]
    fn reads_string_style_columns_and_ignores_extras() {
        let table = "stringId_A\tstringId_B\tpreferredName_A\tpreferredName_B\tncbiTaxonId\tscore\n\
                     9606.ENSP1\t9606.ENSP2\tTP53\tMDM2\t9606\t998\n";
        let rows = EdgeTable::read_from(table.as_bytes()).unwrap();
        assert_eq!(rows, vec![RawInteraction::new("TP53", "MDM2", "998")]);
    }

    #[test]
    fn short_rows_yield_blank_fields_instead_of_errors() {
        let table = "entity_A\tentity_B\tscore\n# comment\nAKT1\n\nAKT1\tMTOR\t900\n";
        let rows = EdgeTable::read_from(table.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], RawInteraction::new("AKT1", "", ""));
    }

    #[test]
    fn missing_score_column_is_reported() {
        let table = "entity_A\tentity_B\tweight\nA\tB\t1\n";
        let err = EdgeTable::read_from(table.as_bytes()).unwrap_err();
        assert!(matches!(err, EdgeTableError::MissingColumn("score")));
    }

    #[test]
    fn reads_from_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("interactions.tsv");
        fs::write(&path, "entity_A\tentity_B\tscore\nA\tB\t700\n").unwrap();
        let rows = EdgeTable::read_from_path(&path).unwrap();
        assert_eq!(rows.len(), 1);

        let missing = EdgeTable::read_from_path(dir.path().join("absent.tsv"));
        assert!(matches!(missing, Err(EdgeTableError::Io(_))));
    }
}
