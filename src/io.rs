//! Points ingestion and matrix presentation.
//!
//! Input is newline-delimited text, one point per line, fields separated by
//! a single delimiter character (`,` by default). Every record must have the
//! field count of the first one; blank lines are skipped. Output is the
//! [`Matrix`] `Display` form: four decimals, comma-separated, one row per line.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use log::debug;

use crate::error::{Error, Result};
use crate::matrix::Matrix;

/// Field separator used when none is given.
pub const DEFAULT_DELIMITER: char = ',';

/// Parse one record into `out`.
fn parse_record(line: &str, delimiter: char, line_no: usize, out: &mut Vec<f64>) -> Result<()> {
    for field in line.split(delimiter) {
        let field = field.trim();
        let value: f64 = field.parse().map_err(|_| Error::MalformedInput {
            line: line_no,
            reason: format!("'{field}' is not a number"),
        })?;
        if !value.is_finite() {
            return Err(Error::MalformedInput {
                line: line_no,
                reason: format!("'{field}' is not finite"),
            });
        }
        out.push(value);
    }
    Ok(())
}

/// Read an `n × d` points matrix with a custom delimiter.
pub fn read_points_with<R: BufRead>(reader: R, delimiter: char) -> Result<Matrix> {
    let mut data = Vec::new();
    let mut rows = 0usize;
    let mut dim = 0usize;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let line_no = idx + 1;
        let before = data.len();
        parse_record(&line, delimiter, line_no, &mut data)?;
        let fields = data.len() - before;
        if rows == 0 {
            dim = fields;
        } else if fields != dim {
            return Err(Error::MalformedInput {
                line: line_no,
                reason: format!("expected {dim} fields, found {fields}"),
            });
        }
        rows += 1;
    }

    if rows == 0 {
        return Err(Error::MalformedInput {
            line: 0,
            reason: "no points".into(),
        });
    }
    debug!("Read {} points of dimension {}", rows, dim);
    Matrix::from_vec(data, rows, dim)
}

/// Read an `n × d` comma-separated points matrix.
pub fn read_points<R: BufRead>(reader: R) -> Result<Matrix> {
    read_points_with(reader, DEFAULT_DELIMITER)
}

/// Read a comma-separated points file.
pub fn read_points_file<P: AsRef<Path>>(path: P) -> Result<Matrix> {
    let file = File::open(path.as_ref())?;
    read_points(BufReader::new(file))
}

/// Write `m` in presentation form.
pub fn write_matrix<W: Write>(mut out: W, m: &Matrix) -> Result<()> {
    write!(out, "{m}")?;
    out.flush()?;
    Ok(())
}
