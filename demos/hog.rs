//! Demonstrates computing cell histograms for a grayscale image.
//!
//! Run with an image path to histogram that image, or with no arguments to
//! use a generated test pattern.

use hog_cells::hog::{bin_for, orientation_bins};
use hog_cells::{cell_histograms, Array2d, GradientField, HogOptions};
use image::{open, GrayImage, Luma};
use std::env;
use std::path::Path;

/// Central differences of a grayscale image, zero at the border.
fn central_differences(image: &GrayImage) -> (Array2d<f64>, Array2d<f64>) {
    let intensity = Array2d::from_luma(image);
    let (rows, columns) = intensity.dimensions();
    let gradient_rows = Array2d::from_fn(rows, columns, |r, c| {
        if r == 0 || r + 1 == rows {
            0.0
        } else {
            intensity[(r + 1, c)] - intensity[(r - 1, c)]
        }
    });
    let gradient_columns = Array2d::from_fn(rows, columns, |r, c| {
        if c == 0 || c + 1 == columns {
            0.0
        } else {
            intensity[(r, c + 1)] - intensity[(r, c - 1)]
        }
    });
    (gradient_rows, gradient_columns)
}

/// A bright disc on a dark background, so every orientation shows up.
fn test_pattern(side: u32) -> GrayImage {
    let center = side as f32 / 2.0;
    let radius = side as f32 / 3.0;
    GrayImage::from_fn(side, side, |x, y| {
        let dx = x as f32 - center;
        let dy = y as f32 - center;
        Luma([if dx * dx + dy * dy < radius * radius { 200u8 } else { 30u8 }])
    })
}

fn main() {
    let image = match env::args().nth(1) {
        Some(arg) => open(Path::new(&arg))
            .unwrap_or_else(|e| panic!("Could not load image at {:?}: {}", arg, e))
            .to_luma8(),
        None => test_pattern(48),
    };

    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        println!("empty image, nothing to histogram");
        return;
    }
    let (gradient_rows, gradient_columns) = central_differences(&image);

    let number_of_orientations = 9;
    let options = HogOptions::covering(height as usize, width as usize, 8, 8, number_of_orientations);
    let hist = cell_histograms(&gradient_rows, &gradient_columns, options)
        .expect("cell size and orientation count are positive");

    println!(
        "{}x{} image, {} x {} cells of 8x8 pixels, {} orientation bins",
        width, height, options.number_of_cells_rows, options.number_of_cells_columns, number_of_orientations
    );

    // Total weight per bin across the whole grid.
    let mut totals = vec![0.0; number_of_orientations];
    for r_i in 0..options.number_of_cells_rows {
        for c_i in 0..options.number_of_cells_columns {
            for (total, v) in totals.iter_mut().zip(hist.inner_slice(r_i, c_i)) {
                *total += v;
            }
        }
    }
    for (bin, total) in orientation_bins(number_of_orientations).zip(&totals) {
        println!("[{:6.1}, {:6.1}): {:10.3}", bin.lower, bin.upper, total);
    }

    // The strongest pixel and the bin it fell into.
    let field = GradientField::from_gradients(&gradient_rows, &gradient_columns)
        .expect("gradients share the image shape");
    let strongest = field
        .magnitude()
        .data()
        .iter()
        .enumerate()
        .fold((0, 0.0), |best, (i, &m)| if m > best.1 { (i, m) } else { best });
    let (row, column) = (strongest.0 / width as usize, strongest.0 % width as usize);
    let orientation = field.orientation()[(row, column)];
    println!(
        "strongest gradient {:.1} at ({}, {}), orientation {:.1} in bin {:?}",
        strongest.1,
        row,
        column,
        orientation,
        bin_for(orientation, number_of_orientations)
    );
}
