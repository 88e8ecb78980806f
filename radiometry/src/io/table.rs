//! Two-column comma-separated table loader
//!
//! Datasheet curves are stored as headerless `x,y` rows, for example
//! `550,0.56` for a QE sample. Every non-blank line is data.

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim};
use log::{debug, info};
use thiserror::Error;

/// Errors raised while loading a two-column table
#[derive(Debug, Error)]
pub enum TableError {
    #[error("Cannot open table {path}: {source}")]
    Resource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}:{line}: {message}")]
    Parse {
        path: PathBuf,
        line: u64,
        message: String,
    },
}

/// Load a headerless two-column CSV file into paired x/y sequences.
///
/// The returned vectors always have equal length and keep file order.
///
/// # Errors
///
/// * `TableError::Resource` - the file is missing or unreadable
/// * `TableError::Parse` - a row does not hold exactly two numeric fields
pub fn load_two_column<P: AsRef<Path>>(path: P) -> Result<(Vec<f64>, Vec<f64>), TableError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| TableError::Resource {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(file);

    let mut xs = Vec::new();
    let mut ys = Vec::new();

    for result in reader.records() {
        let record = result.map_err(|e| csv_error(path, e))?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if record.len() != 2 {
            return Err(TableError::Parse {
                path: path.to_path_buf(),
                line,
                message: format!("expected 2 fields, found {}", record.len()),
            });
        }

        let x = parse_field(path, line, &record[0])?;
        let y = parse_field(path, line, &record[1])?;
        debug!("{}:{line}: {x}, {y}", path.display());

        xs.push(x);
        ys.push(y);
    }

    info!("Loaded {} rows from {}", xs.len(), path.display());
    Ok((xs, ys))
}

fn parse_field(path: &Path, line: u64, field: &str) -> Result<f64, TableError> {
    field.parse::<f64>().map_err(|_| TableError::Parse {
        path: path.to_path_buf(),
        line,
        message: format!("'{field}' is not a number"),
    })
}

fn csv_error(path: &Path, err: csv::Error) -> TableError {
    let line = err.position().map(|p| p.line()).unwrap_or(0);
    match err.into_kind() {
        csv::ErrorKind::Io(source) => TableError::Resource {
            path: path.to_path_buf(),
            source,
        },
        other => TableError::Parse {
            path: path.to_path_buf(),
            line,
            message: format!("{other:?}"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn table_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_loads_pairs_in_file_order() {
        let file = table_file("400,0.32\n410,0.35\n420, 0.38\n");
        let (xs, ys) = load_two_column(file.path()).unwrap();

        assert_eq!(xs, vec![400.0, 410.0, 420.0]);
        assert_eq!(ys, vec![0.32, 0.35, 0.38]);
    }

    #[test]
    fn test_row_count_matches_line_count() {
        let contents: String = (0..33)
            .map(|i| format!("{},{}\n", 400 + 10 * i, i as f64 / 100.0))
            .collect();
        let file = table_file(&contents);
        let (xs, ys) = load_two_column(file.path()).unwrap();

        assert_eq!(xs.len(), 33);
        assert_eq!(ys.len(), 33);
    }

    #[test]
    fn test_first_line_is_data() {
        let file = table_file("0.18,2.5\n0.35,4.0\n");
        let (xs, _) = load_two_column(file.path()).unwrap();
        assert_eq!(xs[0], 0.18);
    }

    #[test]
    fn test_scientific_notation() {
        let file = table_file("1e-1,2.5E1\n");
        let (xs, ys) = load_two_column(file.path()).unwrap();
        assert_eq!(xs, vec![0.1]);
        assert_eq!(ys, vec![25.0]);
    }

    #[test]
    fn test_missing_file_is_resource_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_two_column(dir.path().join("qe-dcc1545m.csv"));
        assert!(matches!(result, Err(TableError::Resource { .. })));
    }

    #[test]
    fn test_non_numeric_field_is_parse_error() {
        let file = table_file("400,0.32\nwavelength,qe\n");
        match load_two_column(file.path()) {
            Err(TableError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_wrong_field_count_is_parse_error() {
        let single = table_file("400\n");
        assert!(matches!(
            load_two_column(single.path()),
            Err(TableError::Parse { .. })
        ));

        let triple = table_file("400,0.3,1\n");
        assert!(matches!(
            load_two_column(triple.path()),
            Err(TableError::Parse { .. })
        ));
    }
}
