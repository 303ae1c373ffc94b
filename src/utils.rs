//! Utils for testing and debugging.

use crate::multiarray::Array2d;

/// Panics if the two arrays differ in shape, or if any pair of elements
/// differs by more than `tol`.
///
/// Works for any pair of `Array2d<f64>` or `Array3d<f64>` values.
#[macro_export]
macro_rules! assert_arrays_approx_eq {
    ($actual:expr, $expected:expr, $tol:expr) => {{
        let actual = &$actual;
        let expected = &$expected;
        let tol: f64 = $tol;

        assert_eq!(
            actual.data().len(),
            expected.data().len(),
            "array sizes do not match"
        );

        let diffs = actual
            .data()
            .iter()
            .zip(expected.data().iter())
            .enumerate()
            .filter(|(_, (a, e))| !((**a - **e as f64).abs() <= tol))
            .collect::<Vec<_>>();

        if !diffs.is_empty() {
            let mut err = "arrays do not match. ".to_string();

            let diff_messages = diffs
                .iter()
                .take(5)
                .map(|(i, (a, e))| format!("\nindex {}: actual {}, expected {}", i, a, e))
                .collect::<Vec<_>>()
                .join("");

            err.push_str(&diff_messages);
            panic!("{}", err)
        }
    }};
}

/// Vertical and horizontal gradients to use in benchmarks. These are
/// neither noise nor similar to natural images, just a convenience to get
/// gradients covering every orientation bin.
pub fn bench_gradients(rows: usize, columns: usize) -> (Array2d<f64>, Array2d<f64>) {
    let gradient_rows = Array2d::from_fn(rows, columns, |r, c| ((r % 7 + c % 6) as f64) - 5.0);
    let gradient_columns =
        Array2d::from_fn(rows, columns, |r, c| ((r % 5) as f64) - ((c % 9) as f64));
    (gradient_rows, gradient_columns)
}

/// Gradients equal to `(gradient_row, gradient_column)` at every pixel.
pub fn constant_gradients(
    rows: usize,
    columns: usize,
    gradient_row: f64,
    gradient_column: f64,
) -> (Array2d<f64>, Array2d<f64>) {
    (
        Array2d::from_fn(rows, columns, |_, _| gradient_row),
        Array2d::from_fn(rows, columns, |_, _| gradient_column),
    )
}
