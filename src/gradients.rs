//! Gradient magnitude and undirected orientation computed from a pair of
//! gradient arrays.
//!
//! The gradients themselves (e.g. from a Sobel or finite difference filter)
//! are computed elsewhere; this module only turns each `(vertical, horizontal)`
//! pair into a magnitude and an orientation in degrees within `[0, 180)`.

use crate::error::HogError;
use crate::multiarray::Array2d;
use itertools::multizip;

/// Euclidean norm of a gradient vector.
pub fn magnitude(gradient_row: f64, gradient_column: f64) -> f64 {
    gradient_column.hypot(gradient_row)
}

/// Undirected orientation of a gradient vector in degrees, within `[0, 180)`.
///
/// Opposite directions share an orientation. A zero gradient has orientation 0.
pub fn orientation(gradient_row: f64, gradient_column: f64) -> f64 {
    let degrees = gradient_row
        .atan2(gradient_column)
        .to_degrees()
        .rem_euclid(180.0);
    // rem_euclid rounds tiny negative angles up to the modulus itself.
    if degrees >= 180.0 {
        0.0
    } else {
        // A zero angle may carry the sign of a -0.0 gradient_row.
        degrees + 0.0
    }
}

/// Per-pixel gradient magnitudes and orientations of an image.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientField {
    magnitude: Array2d<f64>,
    orientation: Array2d<f64>,
}

impl GradientField {
    /// Computes magnitude and orientation at every pixel from the vertical
    /// (`gradient_rows`) and horizontal (`gradient_columns`) gradients.
    pub fn from_gradients(
        gradient_rows: &Array2d<f64>,
        gradient_columns: &Array2d<f64>,
    ) -> Result<GradientField, HogError> {
        if gradient_rows.dimensions() != gradient_columns.dimensions() {
            return Err(HogError::GradientShapeMismatch {
                rows: gradient_rows.dimensions(),
                columns: gradient_columns.dimensions(),
            });
        }

        let (rows, columns) = gradient_rows.dimensions();
        let mut magnitudes = Array2d::new(rows, columns);
        let mut orientations = Array2d::new(rows, columns);

        for (gr, gc, m, o) in multizip((
            gradient_rows.data(),
            gradient_columns.data(),
            magnitudes.data_mut(),
            orientations.data_mut(),
        )) {
            *m = magnitude(*gr, *gc);
            *o = orientation(*gr, *gc);
        }

        Ok(GradientField {
            magnitude: magnitudes,
            orientation: orientations,
        })
    }

    /// Gradient magnitude at each pixel.
    pub fn magnitude(&self) -> &Array2d<f64> {
        &self.magnitude
    }

    /// Undirected gradient orientation at each pixel, in degrees.
    pub fn orientation(&self) -> &Array2d<f64> {
        &self.orientation
    }

    /// `(rows, columns)` of the underlying image.
    pub fn dimensions(&self) -> (usize, usize) {
        self.magnitude.dimensions()
    }

    /// Consumes the field, returning `(magnitude, orientation)`.
    pub fn into_parts(self) -> (Array2d<f64>, Array2d<f64>) {
        (self.magnitude, self.orientation)
    }
}
