//! Type aliases shared with the `image` crate.

use image::{ImageBuffer, Pixel};

/// An `ImageBuffer` containing Pixels of type P with storage `Vec<P::Subpixel>`.
/// Gradient images produced with the `image` crate arrive as this type.
pub type Image<P> = ImageBuffer<P, Vec<<P as Pixel>::Subpixel>>;
