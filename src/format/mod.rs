//! Text rendering shared by every goal: four digits after the decimal point, values separated
//! by commas, one matrix row per line.

use std::io::Write;

use ndarray::ArrayView2;

/// Fixed four decimals. Small negatives keep their sign, so `-0.00004` prints as `-0.0000`.
pub fn format_value(value: f64) -> String {
    format!("{value:.4}")
}

pub fn format_row<'a, I>(values: I) -> String
where
    I: IntoIterator<Item = &'a f64>,
{
    values
        .into_iter()
        .map(|&v| format_value(v))
        .collect::<Vec<_>>()
        .join(",")
}

/// Every row followed by a newline.
pub fn format_matrix(matrix: ArrayView2<f64>) -> String {
    let mut out = String::new();
    for row in matrix.rows() {
        out.push_str(&format_row(row.iter()));
        out.push('\n');
    }
    out
}

pub fn format_indices(indices: &[usize]) -> String {
    indices
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

pub fn write_matrix<W: Write>(writer: &mut W, matrix: ArrayView2<f64>) -> std::io::Result<()> {
    for row in matrix.rows() {
        writeln!(writer, "{}", format_row(row.iter()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    #[test]
    fn test_identity() {
        let eye = Array2::<f64>::eye(2);
        let text = format_matrix(eye.view());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["1.0000,0.0000", "0.0000,1.0000"]);
    }

    #[test]
    fn test_rounding_and_sign() {
        assert_eq!(format_value(0.123456), "0.1235");
        assert_eq!(format_value(-2.5), "-2.5000");
        assert_eq!(format_value(-0.00004), "-0.0000");
        assert_eq!(format_value(-0.0), "-0.0000");
        assert_eq!(format_value(0.00004), "0.0000");
        assert_eq!(format_value(-0.00005001), "-0.0001");
        assert_eq!(format_value(1234.5), "1234.5000");
    }

    #[test]
    fn test_indices() {
        assert_eq!(format_indices(&[3, 0, 12]), "3,0,12");
        assert_eq!(format_indices(&[]), "");
    }

    #[test]
    fn test_write_matrix_matches_format() {
        let m = array![[0.5, -1.25, 3.0], [1e-6, 2.0, -7.125]];
        let mut buf = Vec::new();
        write_matrix(&mut buf, m.view()).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), format_matrix(m.view()));
        assert_eq!(format_matrix(m.view()), "0.5000,-1.2500,3.0000\n0.0000,2.0000,-7.1250\n");
    }
}
