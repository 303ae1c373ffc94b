//! Per-cell histograms of oriented gradients (HoG).
//!
//! Takes the vertical and horizontal intensity gradients of an image, derives
//! the gradient magnitude and undirected orientation at each pixel, and
//! accumulates them into one histogram per image cell. Gradients can come from
//! any filter; images loaded with the [image] crate can be converted with
//! [`Array2d::from_luma`](multiarray::Array2d::from_luma).
//!
//! [image]: https://github.com/image-rs/image
#![deny(missing_docs)]
#![allow(
    clippy::cast_lossless,
    clippy::too_many_arguments,
    clippy::needless_range_loop,
    clippy::many_single_char_names
)]

#[cfg(test)]
#[macro_use]
extern crate assert_approx_eq;

#[macro_use]
pub mod utils;
pub mod definitions;
pub mod error;
pub mod gradients;
pub mod hog;
pub mod multiarray;
#[cfg(test)]
mod proptest_utils;

pub use crate::error::HogError;
pub use crate::gradients::GradientField;
pub use crate::hog::{cell_histograms, cell_histograms_into, HogOptions};
pub use crate::multiarray::{Array2d, Array3d};
