//! Per-cell histograms of oriented gradients.
//! http://lear.inrialpes.fr/people/triggs/pubs/Dalal-cvpr05.pdf
//!
//! An image is split into a grid of `cell_rows x cell_columns` pixel cells.
//! For each cell and each of `number_of_orientations` equal-width bins of the
//! undirected range `[0, 180)` degrees, the histogram value is the sum of the
//! gradient magnitudes of the cell's pixels whose orientation falls in that
//! bin, divided by the cell area.
//!
//! Block normalisation and descriptor assembly are left to the caller.

use crate::gradients::GradientField;
use crate::multiarray::{Array2d, Array3d};
use log::{debug, trace};
use std::ops::Range;

pub use crate::error::HogError;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Width of the undirected orientation range, in degrees.
pub const ORIENTATION_RANGE: f64 = 180.0;

/// Parameters for HoG cell histograms.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HogOptions {
    /// Height of a cell in pixels.
    pub cell_rows: usize,
    /// Width of a cell in pixels.
    pub cell_columns: usize,
    /// Number of cells computed down the image.
    pub number_of_cells_rows: usize,
    /// Number of cells computed across the image.
    pub number_of_cells_columns: usize,
    /// Number of orientation bins dividing `[0, 180)`.
    pub number_of_orientations: usize,
}

impl HogOptions {
    /// Options with an explicit cell grid.
    pub fn new(
        cell_rows: usize,
        cell_columns: usize,
        number_of_cells_rows: usize,
        number_of_cells_columns: usize,
        number_of_orientations: usize,
    ) -> HogOptions {
        HogOptions {
            cell_rows,
            cell_columns,
            number_of_cells_rows,
            number_of_cells_columns,
            number_of_orientations,
        }
    }

    /// Options using as many whole cells as fit in an image of the given size.
    /// Any partial cell at the bottom or right edge is left out.
    pub fn covering(
        size_rows: usize,
        size_columns: usize,
        cell_rows: usize,
        cell_columns: usize,
        number_of_orientations: usize,
    ) -> HogOptions {
        HogOptions {
            cell_rows,
            cell_columns,
            number_of_cells_rows: size_rows.checked_div(cell_rows).unwrap_or(0),
            number_of_cells_columns: size_columns.checked_div(cell_columns).unwrap_or(0),
            number_of_orientations,
        }
    }

    /// Rejects options that would divide by zero.
    pub fn validate(&self) -> Result<(), HogError> {
        if self.number_of_orientations == 0 {
            return Err(HogError::ZeroOrientations);
        }
        if self.cell_rows == 0 || self.cell_columns == 0 {
            return Err(HogError::ZeroCellSize {
                cell_rows: self.cell_rows,
                cell_columns: self.cell_columns,
            });
        }
        Ok(())
    }

    /// Lengths of the histogram tensor: cell rows, cell columns, then bins.
    pub fn histogram_lengths(&self) -> [usize; 3] {
        [
            self.number_of_cells_rows,
            self.number_of_cells_columns,
            self.number_of_orientations,
        ]
    }
}

/// A half-open range `[lower, upper)` of orientations, in degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrientationBin {
    /// Smallest orientation in the bin.
    pub lower: f64,
    /// Smallest orientation above the bin.
    pub upper: f64,
}

impl OrientationBin {
    /// The `index`th of `number_of_orientations` equal-width bins.
    ///
    /// Bounds are computed as `180 * i / n` so that adjacent bins share
    /// bit-identical bounds and the last bin ends at exactly 180.
    pub fn for_index(index: usize, number_of_orientations: usize) -> OrientationBin {
        let n = number_of_orientations as f64;
        OrientationBin {
            lower: ORIENTATION_RANGE * index as f64 / n,
            upper: ORIENTATION_RANGE * (index + 1) as f64 / n,
        }
    }

    /// True if `orientation` lies in `[lower, upper)`.
    pub fn contains(&self, orientation: f64) -> bool {
        orientation >= self.lower && orientation < self.upper
    }

    /// Width of the bin in degrees.
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// All `number_of_orientations` bins, in index order.
pub fn orientation_bins(number_of_orientations: usize) -> impl Iterator<Item = OrientationBin> {
    (0..number_of_orientations).map(move |i| OrientationBin::for_index(i, number_of_orientations))
}

/// Index of the bin containing `orientation`, or `None` if it lies outside
/// `[0, 180)` or is NaN.
pub fn bin_for(orientation: f64, number_of_orientations: usize) -> Option<usize> {
    if !(0.0..ORIENTATION_RANGE).contains(&orientation) || number_of_orientations == 0 {
        return None;
    }
    let estimate = (orientation * number_of_orientations as f64 / ORIENTATION_RANGE) as usize;
    // The estimate can be off by one either side at bin bounds.
    let first = estimate.saturating_sub(1);
    let last = (estimate + 1).min(number_of_orientations - 1);
    (first..=last).find(|&i| OrientationBin::for_index(i, number_of_orientations).contains(orientation))
}

/// Offsets from a cell center to the pixels of the cell, as half-open ranges.
///
/// For a side of length `s` the range is `-(s / 2)..(s + 1) / 2`, which covers
/// exactly `s` pixels for both odd and even sides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellWindow {
    /// Row offsets.
    pub rows: Range<isize>,
    /// Column offsets.
    pub columns: Range<isize>,
}

impl CellWindow {
    /// The window of a `cell_rows x cell_columns` cell.
    pub fn new(cell_rows: usize, cell_columns: usize) -> CellWindow {
        CellWindow {
            rows: side_offsets(cell_rows),
            columns: side_offsets(cell_columns),
        }
    }
}

fn side_offsets(side: usize) -> Range<isize> {
    let side = side as isize;
    -(side / 2)..(side + 1) / 2
}

/// Validated HoG options. Validation occurs when instances of this struct
/// are created, so functions receiving a spec can assume that it is valid.
///
/// Image bounds always come from the [`GradientField`] being histogrammed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct HogSpec {
    options: HogOptions,
}

impl HogSpec {
    /// Returns an error if the options would divide by zero.
    pub fn new(options: HogOptions) -> Result<HogSpec, HogError> {
        options.validate()?;
        Ok(HogSpec { options })
    }

    /// Original options.
    pub fn options(&self) -> HogOptions {
        self.options
    }

    /// Nominal area of a cell in pixels. Cells cut off by the image boundary
    /// are still normalised by this value.
    pub fn cell_area(&self) -> f64 {
        (self.options.cell_rows * self.options.cell_columns) as f64
    }

    /// Lengths of the histogram tensor this spec produces.
    pub fn histogram_lengths(&self) -> [usize; 3] {
        self.options.histogram_lengths()
    }

    /// Pixel offsets covered by each cell around its center.
    pub fn window(&self) -> CellWindow {
        CellWindow::new(self.options.cell_rows, self.options.cell_columns)
    }

    /// Pixel coordinates `(row, column)` of the center of the given cell.
    pub fn cell_center(&self, cell_row: usize, cell_column: usize) -> (usize, usize) {
        (
            self.options.cell_rows / 2 + cell_row * self.options.cell_rows,
            self.options.cell_columns / 2 + cell_column * self.options.cell_columns,
        )
    }
}

/// Computes the histogram value of one cell for one orientation bin.
///
/// Sums the magnitudes of pixels in `window` around `center` whose orientation
/// lies in `bin`, skipping pixels outside the image, and divides by
/// `cell_area`.
pub fn cell_hog(
    field: &GradientField,
    bin: OrientationBin,
    center: (usize, usize),
    window: &CellWindow,
    cell_area: f64,
) -> f64 {
    let (size_rows, size_columns) = field.dimensions();
    let magnitude = field.magnitude();
    let orientation = field.orientation();
    let mut total = 0.0;

    for row_offset in window.rows.clone() {
        let row = match offset_index(center.0, row_offset, size_rows) {
            Some(row) => row,
            None => continue,
        };

        for column_offset in window.columns.clone() {
            let column = match offset_index(center.1, column_offset, size_columns) {
                Some(column) => column,
                None => continue,
            };
            if !bin.contains(orientation[(row, column)]) {
                continue;
            }

            total += magnitude[(row, column)];
        }
    }

    total / cell_area
}

/// `base + offset` if it lies in `[0, len)`.
fn offset_index(base: usize, offset: isize, len: usize) -> Option<usize> {
    base.checked_add_signed(offset).filter(|&i| i < len)
}

/// Computes the cell histograms of an image from its vertical
/// (`gradient_rows`) and horizontal (`gradient_columns`) gradients.
///
/// Returns an array with lengths `[number_of_cells_rows,
/// number_of_cells_columns, number_of_orientations]`.
///
/// # Examples
/// ```
/// use hog_cells::hog::{cell_histograms, HogOptions};
/// use hog_cells::multiarray::Array2d;
///
/// // Every pixel has a purely vertical gradient of magnitude 1.
/// let gradient_rows = Array2d::from_fn(4, 4, |_, _| 1.0);
/// let gradient_columns = Array2d::from_fn(4, 4, |_, _| 0.0);
///
/// let options = HogOptions::new(2, 2, 2, 2, 2);
/// let hist = cell_histograms(&gradient_rows, &gradient_columns, options).unwrap();
///
/// assert_eq!(hist.lengths(), [2, 2, 2]);
/// // 90 degrees falls in the second bin, [90, 180).
/// assert_eq!(hist.inner_slice(1, 0), &[0.0, 1.0]);
/// ```
pub fn cell_histograms(
    gradient_rows: &Array2d<f64>,
    gradient_columns: &Array2d<f64>,
    options: HogOptions,
) -> Result<Array3d<f64>, HogError> {
    options.validate()?;
    let mut out = Array3d::new(options.histogram_lengths());
    cell_histograms_into(gradient_rows, gradient_columns, options, &mut out)?;
    Ok(out)
}

/// As [`cell_histograms`], but overwrites every entry of a caller-provided
/// histogram. Its previous contents are never read.
pub fn cell_histograms_into(
    gradient_rows: &Array2d<f64>,
    gradient_columns: &Array2d<f64>,
    options: HogOptions,
    out: &mut Array3d<f64>,
) -> Result<(), HogError> {
    options.validate()?;
    check_output(&options, out)?;
    let field = GradientField::from_gradients(gradient_rows, gradient_columns)?;
    cell_histograms_from_field(&field, options, out)
}

/// As [`cell_histograms_into`], reusing a precomputed gradient field.
pub fn cell_histograms_from_field(
    field: &GradientField,
    options: HogOptions,
    out: &mut Array3d<f64>,
) -> Result<(), HogError> {
    let (size_rows, size_columns) = field.dimensions();
    let spec = HogSpec::new(options)?;
    check_output(&options, out)?;

    debug!(
        "computing {:?} cell histograms for a {}x{} image",
        spec.histogram_lengths(),
        size_rows,
        size_columns
    );

    let window = spec.window();
    let cell_area = spec.cell_area();

    for (i, bin) in orientation_bins(options.number_of_orientations).enumerate() {
        trace!("bin {} covers [{}, {})", i, bin.lower, bin.upper);

        for r_i in 0..options.number_of_cells_rows {
            for c_i in 0..options.number_of_cells_columns {
                let center = spec.cell_center(r_i, c_i);
                out[[r_i, c_i, i]] = cell_hog(field, bin, center, &window, cell_area);
            }
        }
    }

    Ok(())
}

/// Parallel version of [`cell_histograms`]. Each worker fills whole rows of
/// cells, so the result is identical to the sequential computation.
#[cfg(feature = "rayon")]
pub fn cell_histograms_par(
    gradient_rows: &Array2d<f64>,
    gradient_columns: &Array2d<f64>,
    options: HogOptions,
) -> Result<Array3d<f64>, HogError> {
    options.validate()?;
    let mut out = Array3d::new(options.histogram_lengths());
    cell_histograms_par_into(gradient_rows, gradient_columns, options, &mut out)?;
    Ok(out)
}

/// Parallel version of [`cell_histograms_into`].
#[cfg(feature = "rayon")]
pub fn cell_histograms_par_into(
    gradient_rows: &Array2d<f64>,
    gradient_columns: &Array2d<f64>,
    options: HogOptions,
    out: &mut Array3d<f64>,
) -> Result<(), HogError> {
    options.validate()?;
    check_output(&options, out)?;
    let field = GradientField::from_gradients(gradient_rows, gradient_columns)?;
    let (size_rows, size_columns) = field.dimensions();
    let spec = HogSpec::new(options)?;

    debug!(
        "computing {:?} cell histograms for a {}x{} image in parallel",
        spec.histogram_lengths(),
        size_rows,
        size_columns
    );

    let n = options.number_of_orientations;
    let row_len = options.number_of_cells_columns * n;
    if row_len == 0 {
        return Ok(());
    }

    let window = spec.window();
    let cell_area = spec.cell_area();

    out.data_mut()
        .par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(r_i, cells)| {
            for (c_i, hist) in cells.chunks_mut(n).enumerate() {
                let center = spec.cell_center(r_i, c_i);
                for (value, bin) in hist.iter_mut().zip(orientation_bins(n)) {
                    *value = cell_hog(&field, bin, center, &window, cell_area);
                }
            }
        });

    Ok(())
}

fn check_output(options: &HogOptions, out: &Array3d<f64>) -> Result<(), HogError> {
    let expected = options.histogram_lengths();
    if out.lengths() != expected {
        return Err(HogError::OutputShapeMismatch {
            expected,
            actual: out.lengths(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{bench_gradients, constant_gradients};

    #[test]
    fn test_validate() {
        assert_eq!(HogOptions::new(2, 2, 1, 1, 9).validate(), Ok(()));
        assert_eq!(
            HogOptions::new(2, 2, 1, 1, 0).validate(),
            Err(HogError::ZeroOrientations)
        );
        assert_eq!(
            HogOptions::new(0, 3, 1, 1, 9).validate(),
            Err(HogError::ZeroCellSize {
                cell_rows: 0,
                cell_columns: 3
            })
        );
        assert!(HogSpec::new(HogOptions::new(2, 0, 1, 1, 9)).is_err());
    }

    #[test]
    fn test_covering() {
        let options = HogOptions::covering(10, 17, 4, 5, 9);
        assert_eq!(options.number_of_cells_rows, 2);
        assert_eq!(options.number_of_cells_columns, 3);
        assert_eq!(options.histogram_lengths(), [2, 3, 9]);
        assert_eq!(HogOptions::covering(10, 10, 0, 5, 9).number_of_cells_rows, 0);
    }

    #[test]
    fn test_bins_partition_orientation_range() {
        for n in 1..20 {
            let bins: Vec<_> = orientation_bins(n).collect();
            assert_eq!(bins.len(), n);
            assert_eq!(bins[0].lower, 0.0);
            assert_eq!(bins[n - 1].upper, 180.0);
            for pair in bins.windows(2) {
                assert_eq!(pair[0].upper, pair[1].lower);
            }
            let total: f64 = bins.iter().map(|b| b.width()).sum();
            assert_approx_eq!(total, 180.0, 1e-9);
        }
    }

    #[test]
    fn test_bin_bounds_belong_to_one_bin() {
        let n = 9;
        for bin in orientation_bins(n) {
            let owners = orientation_bins(n).filter(|b| b.contains(bin.lower)).count();
            assert_eq!(owners, 1);
        }
        assert_eq!(bin_for(0.0, n), Some(0));
        assert_eq!(bin_for(20.0, n), Some(1));
        assert_eq!(bin_for(179.999, n), Some(8));
        assert_eq!(bin_for(180.0, n), None);
        assert_eq!(bin_for(-0.5, n), None);
        assert_eq!(bin_for(f64::NAN, n), None);
    }

    #[test]
    fn test_cell_window() {
        let even = CellWindow::new(4, 2);
        assert_eq!(even.rows, -2..2);
        assert_eq!(even.columns, -1..1);
        let odd = CellWindow::new(3, 1);
        assert_eq!(odd.rows, -1..2);
        assert_eq!(odd.columns, 0..1);
        assert_eq!(odd.rows.len(), 3);
    }

    #[test]
    fn test_cell_center() {
        let options = HogOptions::new(3, 4, 4, 3, 1);
        let spec = HogSpec::new(options).unwrap();
        assert_eq!(spec.options(), options);
        assert_eq!(spec.histogram_lengths(), [4, 3, 1]);
        assert_eq!(spec.cell_center(0, 0), (1, 2));
        assert_eq!(spec.cell_center(2, 1), (7, 6));
        assert_eq!(spec.cell_area(), 12.0);
    }

    #[test]
    fn test_single_bin_uniform_gradient() {
        let (rows, columns) = constant_gradients(4, 4, 1.0, 0.0);
        let hist = cell_histograms(&rows, &columns, HogOptions::new(2, 2, 2, 2, 1)).unwrap();
        assert_eq!(hist.lengths(), [2, 2, 1]);
        assert_eq!(hist.data(), &[1.0; 4]);
    }

    #[test]
    fn test_two_bins_uniform_gradient() {
        let (rows, columns) = constant_gradients(4, 4, 1.0, 0.0);
        let hist = cell_histograms(&rows, &columns, HogOptions::new(2, 2, 2, 2, 2)).unwrap();
        for r in 0..2 {
            for c in 0..2 {
                assert_eq!(hist.inner_slice(r, c), &[0.0, 1.0]);
            }
        }
    }

    #[test]
    fn test_interior_cell_sums_window() {
        // 6x6 image with 2x2 cells; the cell at (1, 1) covers rows and columns 2..4.
        let rows = Array2d::from_fn(6, 6, |r, c| (r * 6 + c) as f64);
        let columns: Array2d<f64> = Array2d::new(6, 6);
        let hist = cell_histograms(&rows, &columns, HogOptions::new(2, 2, 3, 3, 1)).unwrap();

        let expected = (14.0 + 15.0 + 20.0 + 21.0) / 4.0;
        assert_approx_eq!(hist[[1, 1, 0]], expected, 1e-12);
    }

    #[test]
    fn test_odd_cell_window_is_centered() {
        // 3x3 cells centered at (1, 1) cover rows and columns 0..3.
        let rows = Array2d::from_fn(3, 3, |r, c| (1 + r * 3 + c) as f64);
        let columns: Array2d<f64> = Array2d::new(3, 3);
        let hist = cell_histograms(&rows, &columns, HogOptions::new(3, 3, 1, 1, 1)).unwrap();
        assert_approx_eq!(hist[[0, 0, 0]], 45.0 / 9.0, 1e-12);
    }

    #[test]
    fn test_boundary_cell_uses_nominal_area() {
        // Two rows of 4x4 cells over a 6 row image: the second row of cells
        // only has two rows of pixels inside the image.
        let (rows, columns) = constant_gradients(6, 4, 0.0, 2.0);
        let hist = cell_histograms(&rows, &columns, HogOptions::new(4, 4, 2, 1, 1)).unwrap();
        assert_approx_eq!(hist[[0, 0, 0]], 2.0, 1e-12);
        assert_approx_eq!(hist[[1, 0, 0]], 2.0 * 8.0 / 16.0, 1e-12);
    }

    #[test]
    fn test_cells_beyond_image_are_zero() {
        let (rows, columns) = constant_gradients(2, 2, 1.0, 1.0);
        let hist = cell_histograms(&rows, &columns, HogOptions::new(2, 2, 2, 2, 4)).unwrap();
        assert!(hist.inner_slice(0, 0).iter().any(|&v| v > 0.0));
        assert_eq!(hist.inner_slice(0, 1), &[0.0; 4]);
        assert_eq!(hist.inner_slice(1, 0), &[0.0; 4]);
        assert_eq!(hist.inner_slice(1, 1), &[0.0; 4]);
    }

    #[test]
    fn test_orientation_on_bin_bound_goes_to_upper_bin() {
        // 45 degrees is the lower bound of the second of four bins.
        let (rows, columns) = constant_gradients(2, 2, 1.0, 1.0);
        let hist = cell_histograms(&rows, &columns, HogOptions::new(2, 2, 1, 1, 4)).unwrap();
        let field = GradientField::from_gradients(&rows, &columns).unwrap();
        let expected_bin = bin_for(field.orientation()[(0, 0)], 4).unwrap();
        let m = field.magnitude()[(0, 0)];

        for (i, v) in hist.inner_slice(0, 0).iter().enumerate() {
            if i == expected_bin {
                assert_approx_eq!(*v, m, 1e-12);
            } else {
                assert_eq!(*v, 0.0);
            }
        }
    }

    #[test]
    fn test_into_overwrites_previous_contents() {
        let (rows, columns) = constant_gradients(4, 4, 1.0, 0.0);
        let options = HogOptions::new(2, 2, 2, 2, 2);
        let mut out = Array3d::from_raw([2, 2, 2], vec![f64::NAN; 8]).unwrap();
        cell_histograms_into(&rows, &columns, options, &mut out).unwrap();
        assert_eq!(out.data(), &[0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_into_rejects_wrong_output_shape() {
        let (rows, columns) = constant_gradients(4, 4, 1.0, 0.0);
        let mut out = Array3d::new([2, 2, 3]);
        assert_eq!(
            cell_histograms_into(&rows, &columns, HogOptions::new(2, 2, 2, 2, 2), &mut out),
            Err(HogError::OutputShapeMismatch {
                expected: [2, 2, 2],
                actual: [2, 2, 3]
            })
        );
    }

    #[test]
    fn test_rejects_invalid_options_before_gradients() {
        let rows: Array2d<f64> = Array2d::new(2, 2);
        let columns: Array2d<f64> = Array2d::new(3, 3);
        assert_eq!(
            cell_histograms(&rows, &columns, HogOptions::new(2, 2, 1, 1, 0)),
            Err(HogError::ZeroOrientations)
        );
        assert!(matches!(
            cell_histograms(&rows, &columns, HogOptions::new(2, 2, 1, 1, 3)),
            Err(HogError::GradientShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_idempotent() {
        let (rows, columns) = bench_gradients(20, 30);
        let options = HogOptions::covering(20, 30, 4, 6, 9);
        let first = cell_histograms(&rows, &columns, options).unwrap();
        let second = cell_histograms(&rows, &columns, options).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_grid() {
        let (rows, columns) = constant_gradients(4, 4, 1.0, 0.0);
        let hist = cell_histograms(&rows, &columns, HogOptions::new(2, 2, 0, 2, 3)).unwrap();
        assert!(hist.is_empty());
        assert_eq!(hist.lengths(), [0, 2, 3]);
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn test_parallel_matches_sequential() {
        let (rows, columns) = bench_gradients(23, 31);
        let options = HogOptions::new(5, 4, 5, 8, 7);
        let sequential = cell_histograms(&rows, &columns, options).unwrap();
        let parallel = cell_histograms_par(&rows, &columns, options).unwrap();
        assert_eq!(sequential, parallel);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_options_serde_round_trip() {
        let options = HogOptions::new(8, 8, 16, 8, 9);
        let json = serde_json::to_string(&options).unwrap();
        assert!(json.contains("\"number_of_orientations\":9"));
        let parsed: HogOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, options);
    }
}
