//! Line-oriented error series input.
//!
//! Each data line holds either a bare value or `index,value`. A bare value
//! takes the previous line's index plus one (0 for the first line), so bare
//! and indexed lines can be mixed. Indices must be unique. Blank lines and
//! lines starting with `#` are skipped.

use std::collections::HashSet;
use std::io::BufRead;
use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("no values found")]
    Empty,
}

/// Parse a series from any buffered reader.
pub fn parse_series<R: BufRead>(reader: R) -> Result<Vec<(u64, f64)>, InputError> {
    let mut points = Vec::new();
    let mut seen = HashSet::new();
    let mut next_index = Some(0u64);

    for (i, line) in reader.lines().enumerate() {
        let line_no = i + 1;
        let line = line.map_err(|e| InputError::Malformed {
            line: line_no,
            reason: e.to_string(),
        })?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (index, value) = match line.split_once(',') {
            Some((index, value)) => (
                parse_index(index.trim(), line_no)?,
                parse_value(value.trim(), line_no)?,
            ),
            None => (
                next_index.ok_or_else(|| InputError::Malformed {
                    line: line_no,
                    reason: "no index follows the previous one".to_string(),
                })?,
                parse_value(line, line_no)?,
            ),
        };
        if !seen.insert(index) {
            return Err(InputError::Malformed {
                line: line_no,
                reason: format!("duplicate index {index}"),
            });
        }
        next_index = index.checked_add(1);
        points.push((index, value));
    }

    Ok(points)
}

fn parse_index(s: &str, line: usize) -> Result<u64, InputError> {
    s.parse().map_err(|_| InputError::Malformed {
        line,
        reason: format!("invalid index '{s}'"),
    })
}

fn parse_value(s: &str, line: usize) -> Result<f64, InputError> {
    s.parse().map_err(|_| InputError::Malformed {
        line,
        reason: format!("invalid value '{s}'"),
    })
}

/// Read a non-empty series from a file.
pub fn read_series(path: &Path) -> Result<Vec<(u64, f64)>, InputError> {
    let file = std::fs::File::open(path).map_err(|source| InputError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let points = parse_series(std::io::BufReader::new(file))?;
    if points.is_empty() {
        return Err(InputError::Empty);
    }
    Ok(points)
}

/// Read only the values of a series, dropping indices.
pub fn read_values(path: &Path) -> Result<Vec<f64>, InputError> {
    Ok(read_series(path)?.into_iter().map(|(_, v)| v).collect())
}

/// Write one value per line.
pub fn write_values(path: &Path, values: &[f64]) -> Result<(), InputError> {
    let mut out = String::with_capacity(values.len() * 20);
    for v in values {
        out.push_str(&v.to_string());
        out.push('\n');
    }
    std::fs::write(path, out).map_err(|source| InputError::Io {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_values() {
        let points = parse_series("0.5\n1.25\n3\n".as_bytes()).unwrap();
        assert_eq!(points, vec![(0, 0.5), (1, 1.25), (2, 3.0)]);
    }

    #[test]
    fn test_indexed_values() {
        let points = parse_series("10, 0.5\n20,1.5\n".as_bytes()).unwrap();
        assert_eq!(points, vec![(10, 0.5), (20, 1.5)]);
    }

    #[test]
    fn test_bare_values_follow_previous_index() {
        let points = parse_series("5,0.1\n0.2\n1,0.3\n0.4\n".as_bytes()).unwrap();
        assert_eq!(points, vec![(5, 0.1), (6, 0.2), (1, 0.3), (2, 0.4)]);
    }

    #[test]
    fn test_duplicate_index_is_rejected() {
        let err = parse_series("5,0.1\n0.2\n6,0.3\n".as_bytes()).unwrap_err();
        match err {
            InputError::Malformed { line, reason } => {
                assert_eq!(line, 3);
                assert_eq!(reason, "duplicate index 6");
            }
            other => panic!("unexpected error: {other}"),
        }

        assert!(parse_series("0.1\n0,0.2\n".as_bytes()).is_err());
    }

    #[test]
    fn test_comments_and_blank_lines_are_skipped() {
        let input = "# baseline errors\n\n0.1\n   \n# more\n0.2\n";
        let points = parse_series(input.as_bytes()).unwrap();
        assert_eq!(points, vec![(0, 0.1), (1, 0.2)]);
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let err = parse_series("0.1\n\nabc\n".as_bytes()).unwrap_err();
        match err {
            InputError::Malformed { line, reason } => {
                assert_eq!(line, 3);
                assert!(reason.contains("abc"));
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = parse_series("x,0.1\n".as_bytes()).unwrap_err();
        assert!(err.to_string().starts_with("line 1"));
    }

    #[test]
    fn test_negative_values_parse() {
        // Domain checks belong to the scoring library, not the parser.
        let points = parse_series("-1.0\n".as_bytes()).unwrap();
        assert_eq!(points, vec![(0, -1.0)]);
    }

    #[test]
    fn test_write_then_read_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("errors.txt");
        write_values(&path, &[0.5, 1.75, 0.0]).unwrap();
        assert_eq!(read_values(&path).unwrap(), vec![0.5, 1.75, 0.0]);
    }

    #[test]
    fn test_empty_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        std::fs::write(&path, "# nothing\n").unwrap();
        assert!(matches!(read_series(&path), Err(InputError::Empty)));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            read_series(Path::new("/nonexistent/errors.txt")),
            Err(InputError::Io { .. })
        ));
    }
}
