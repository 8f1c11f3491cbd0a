//! Reading initial particle positions from plain-text files.
//!
//! The format is one particle per line, three whitespace-separated
//! coordinates. Blank lines and lines starting with `#` are ignored.

use crate::error::{Error, Result};
use crate::types::Vec3;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Parse positions from any buffered reader.
///
/// # Errors
///
/// Returns [`Error::Input`] for malformed rows or a row count different from
/// `expected`, and [`Error::Io`] if the underlying reader fails.
pub fn read_positions<R: BufRead>(reader: R, expected: usize) -> Result<Vec<Vec3>> {
    let mut positions = Vec::with_capacity(expected);

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        if fields.len() != 3 {
            return Err(Error::Input(format!(
                "line {}: expected 3 coordinates, found {}",
                index + 1,
                fields.len()
            )));
        }

        let mut coords = [0.0; 3];
        for (k, field) in fields.iter().enumerate() {
            coords[k] = field.parse().map_err(|e| {
                Error::Input(format!("line {}: bad coordinate {:?}: {}", index + 1, field, e))
            })?;
        }
        positions.push(Vec3::new(coords[0], coords[1], coords[2]));
    }

    if positions.len() != expected {
        return Err(Error::Input(format!(
            "expected {} positions, found {}",
            expected,
            positions.len()
        )));
    }
    Ok(positions)
}

/// Read positions from a file, adding the path to any input error.
pub fn load_positions<P: AsRef<Path>>(path: P, expected: usize) -> Result<Vec<Vec3>> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| Error::Input(format!("cannot open position file {}: {}", path.display(), e)))?;
    read_positions(BufReader::new(file), expected).map_err(|e| match e {
        Error::Input(msg) => Error::Input(format!("{}: {}", path.display(), msg)),
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_plain_rows() {
        let data = "0.0 0.0 0.0\n1.0 2.0 3.0\n";
        let positions = read_positions(Cursor::new(data), 2).unwrap();
        assert_eq!(positions.len(), 2);
        assert!((positions[1] - Vec3::new(1.0, 2.0, 3.0)).norm() < 1e-14);
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let data = "# liquid start\n\n0.5 0.5 0.5\n  \n# trailing\n1.5 1.5 1.5\n";
        let positions = read_positions(Cursor::new(data), 2).unwrap();
        assert_eq!(positions.len(), 2);
        assert!((positions[0].x - 0.5).abs() < 1e-14);
    }

    #[test]
    fn accepts_tabs_and_extra_spaces() {
        let data = "0.1\t0.2   0.3\n";
        let positions = read_positions(Cursor::new(data), 1).unwrap();
        assert!((positions[0].z - 0.3).abs() < 1e-14);
    }

    #[test]
    fn reports_wrong_column_count_with_line_number() {
        let data = "0.0 0.0 0.0\n1.0 2.0\n";
        let err = read_positions(Cursor::new(data), 2).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("line 2"), "message was {:?}", msg);
        assert!(msg.contains("found 2"));
    }

    #[test]
    fn reports_unparseable_coordinate() {
        let data = "0.0 zero 0.0\n";
        let err = read_positions(Cursor::new(data), 1).unwrap_err();
        assert!(err.to_string().contains("bad coordinate"));
    }

    #[test]
    fn reports_row_count_mismatch() {
        let data = "0.0 0.0 0.0\n";
        let err = read_positions(Cursor::new(data), 3).unwrap_err();
        assert!(err.to_string().contains("expected 3 positions, found 1"));
    }

    #[test]
    fn missing_file_error_names_the_path() {
        let err = load_positions("/no/such/dir/liquid.txt", 4).unwrap_err();
        assert!(err.to_string().contains("/no/such/dir/liquid.txt"));
    }
}
