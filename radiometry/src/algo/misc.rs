//! Interpolation and sampling grids for tabulated sensor data.
//!
//! Datasheet curves (QE, filter transmittance, floating diffusion capacitance)
//! arrive as sparse samples. These helpers resample them:
//!
//! - **Linear interpolation**: binary-search lookup on ascending abscissae
//! - **Evenly spaced grids**: endpoint-inclusive `linspace`
//! - **Short decimals**: `format_decimal` for labels and table headers

use thiserror::Error;

/// Errors that can occur during interpolation operations.
#[derive(Error, Debug, PartialEq)]
pub enum InterpError {
    #[error("Value {0} is out of bounds for interpolation range [{1}, {2}]")]
    OutOfBounds(f64, f64, f64),
    #[error("Input vectors must have at least 2 points")]
    InsufficientData,
    #[error("Input vectors must have the same length")]
    MismatchedLengths,
    #[error("X values must be sorted in ascending order")]
    UnsortedData,
}

/// Linearly interpolate `ys` at `x` over ascending abscissae `xs`.
///
/// Exact hits on a sample return that sample unchanged, so resampling a
/// curve on its own wavelengths is lossless.
///
/// # Examples
///
/// ```rust
/// use radiometry::algo::misc::interp;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let wavelengths = vec![400.0, 500.0, 600.0];
/// let qe = vec![0.30, 0.50, 0.40];
///
/// assert_eq!(interp(450.0, &wavelengths, &qe)?, 0.40);
/// assert_eq!(interp(500.0, &wavelengths, &qe)?, 0.50);
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// * `InterpError::OutOfBounds` - x is outside the range \\[xs\\[0\\], xs\\[n-1\\]\\]
/// * `InterpError::InsufficientData` - Less than 2 data points provided
/// * `InterpError::MismatchedLengths` - xs and ys have different lengths
/// * `InterpError::UnsortedData` - xs array is not strictly ascending
pub fn interp(x: f64, xs: &[f64], ys: &[f64]) -> Result<f64, InterpError> {
    if xs.len() != ys.len() {
        return Err(InterpError::MismatchedLengths);
    }

    if xs.len() < 2 {
        return Err(InterpError::InsufficientData);
    }

    if xs.windows(2).any(|pair| pair[1] <= pair[0]) {
        return Err(InterpError::UnsortedData);
    }

    let min_x = xs[0];
    let max_x = xs[xs.len() - 1];

    // NaN fails both comparisons, catch it here too
    if !(x >= min_x && x <= max_x) {
        return Err(InterpError::OutOfBounds(x, min_x, max_x));
    }

    // xs is strictly ascending and x is finite, total_cmp orders them
    let idx = match xs.binary_search_by(|sample| sample.total_cmp(&x)) {
        Ok(exact_idx) => return Ok(ys[exact_idx]),
        Err(insert_idx) => insert_idx,
    };

    let (x1, x2) = (xs[idx - 1], xs[idx]);
    let (y1, y2) = (ys[idx - 1], ys[idx]);

    let t = (x - x1) / (x2 - x1);
    Ok(y1 + t * (y2 - y1))
}

/// Evenly spaced samples over `[start, stop]`, both endpoints included.
///
/// `linspace(400.0, 720.0, 33)` yields the 10 nm analysis grid. Each sample
/// is computed as `start + i * step` rather than accumulated, so the grid
/// lands exactly on round wavelengths.
pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            (0..num)
                .map(|i| {
                    if i == num - 1 {
                        stop
                    } else {
                        start + i as f64 * step
                    }
                })
                .collect()
        }
    }
}

/// Format `value` with at most `max_decimals` decimals, trailing zeros dropped
///
/// `format_decimal(1.5, 3)` is `"1.5"`, `format_decimal(983.0, 3)` is `"983"`.
pub fn format_decimal(value: f64, max_decimals: usize) -> String {
    let text = format!("{value:.max_decimals$}");
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal(1.5, 3), "1.5");
        assert_eq!(format_decimal(983.0, 3), "983");
        assert_eq!(format_decimal(0.04, 6), "0.04");
        assert_eq!(format_decimal(1.23456, 3), "1.235");
        assert_eq!(format_decimal(20.0, 0), "20");
    }

    #[test]
    fn test_exact_match() {
        let xs = vec![400.0, 500.0, 600.0, 700.0];
        let ys = vec![0.1, 0.2, 0.3, 0.4];
        assert_eq!(interp(500.0, &xs, &ys).unwrap(), 0.2);
        assert_eq!(interp(700.0, &xs, &ys).unwrap(), 0.4);
    }

    #[test]
    fn test_linear_interpolation() {
        let xs = vec![1.0, 2.0, 3.0];
        let ys = vec![10.0, 20.0, 30.0];
        assert_eq!(interp(1.5, &xs, &ys).unwrap(), 15.0);
        assert_eq!(interp(2.5, &xs, &ys).unwrap(), 25.0);
    }

    #[test]
    fn test_out_of_bounds() {
        let xs = vec![1.0, 2.0, 3.0];
        let ys = vec![10.0, 20.0, 30.0];
        assert_eq!(
            interp(0.5, &xs, &ys),
            Err(InterpError::OutOfBounds(0.5, 1.0, 3.0))
        );
        assert!(matches!(
            interp(3.5, &xs, &ys),
            Err(InterpError::OutOfBounds(_, _, _))
        ));
        assert!(matches!(
            interp(f64::NAN, &xs, &ys),
            Err(InterpError::OutOfBounds(_, _, _))
        ));
    }

    #[test]
    fn test_mismatched_lengths() {
        let xs = vec![1.0, 2.0, 3.0];
        let ys = vec![10.0, 20.0];
        assert_eq!(interp(1.5, &xs, &ys), Err(InterpError::MismatchedLengths));
    }

    #[test]
    fn test_insufficient_data() {
        assert_eq!(
            interp(1.0, &[1.0], &[10.0]),
            Err(InterpError::InsufficientData)
        );
    }

    #[test]
    fn test_unsorted_data() {
        let xs = vec![2.0, 1.0, 3.0];
        let ys = vec![20.0, 10.0, 30.0];
        assert_eq!(interp(1.5, &xs, &ys), Err(InterpError::UnsortedData));
    }

    #[test]
    fn test_linspace_analysis_grid() {
        let grid = linspace(400.0, 720.0, 33);
        assert_eq!(grid.len(), 33);
        assert_eq!(grid[0], 400.0);
        assert_eq!(grid[15], 550.0);
        assert_eq!(grid[32], 720.0);
    }

    #[test]
    fn test_linspace_degenerate_counts() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(3.0, 9.0, 1), vec![3.0]);
        assert_eq!(linspace(0.0, 1.0, 2), vec![0.0, 1.0]);
    }
}
