use std::io::Read;
use std::path::Path;

use ndarray::Array2;

use crate::SpectralError;

/// Reads a headerless CSV of numbers into an n x d matrix. Every line must have the same
/// number of fields.
pub fn read_observations<R: Read>(reader: R) -> crate::Result<Array2<f64>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut values = Vec::new();
    let mut n_rows = 0;
    let mut n_cols = None;

    for (line, record) in csv_reader.records().enumerate() {
        let record = record?;
        let width = *n_cols.get_or_insert(record.len());
        if record.len() != width {
            return Err(SpectralError::DimensionMismatch {
                expected: width,
                found: record.len(),
            });
        }
        for field in record.iter() {
            let value: f64 = field.parse().map_err(|_| {
                SpectralError::invalid_input(format!(
                    "line {}: '{field}' is not a number",
                    line + 1
                ))
            })?;
            values.push(value);
        }
        n_rows += 1;
    }

    let n_cols = n_cols.unwrap_or(0);
    if n_rows == 0 || n_cols == 0 {
        return Err(SpectralError::invalid_input("input file holds no observations"));
    }

    log::debug!("loaded {n_rows} observations with {n_cols} features");
    Ok(Array2::from_shape_vec((n_rows, n_cols), values)?)
}

pub fn read_observations_from_path<P: AsRef<Path>>(path: P) -> crate::Result<Array2<f64>> {
    let file = std::fs::File::open(path.as_ref())?;
    read_observations(std::io::BufReader::new(file))
}
