use crate::multiarray::Array2d;
use proptest::{
    sample::SizeRange,
    strategy::{BoxedStrategy, Strategy},
};
use std::ops::RangeInclusive;

/// Create a strategy to generate same-shaped vertical and horizontal gradient
/// arrays with dimensions selected within the specified ranges.
pub(crate) fn arbitrary_gradients(
    rows_range: impl Into<SizeRange>,
    columns_range: impl Into<SizeRange>,
) -> BoxedStrategy<(Array2d<f64>, Array2d<f64>)> {
    dims(rows_range, columns_range)
        .prop_flat_map(|(r, c)| (arbitrary_array_fixed(r, c), arbitrary_array_fixed(r, c)))
        .boxed()
}

fn arbitrary_array_fixed(rows: usize, columns: usize) -> BoxedStrategy<Array2d<f64>> {
    // Include exact zeros so flat regions and axis-aligned gradients show up.
    let value = proptest::prop_oneof![
        1 => proptest::strategy::Just(0.0f64),
        4 => -255.0f64..255.0,
    ];
    proptest::collection::vec(value, rows * columns)
        .prop_map(move |v| Array2d::from_fn(rows, columns, |r, c| v[r * columns + c]))
        .boxed()
}

fn dims(
    rows: impl Into<SizeRange>,
    columns: impl Into<SizeRange>,
) -> BoxedStrategy<(usize, usize)> {
    let rows = dim(rows);
    let columns = dim(columns);
    rows.prop_flat_map(move |r| columns.clone().prop_map(move |c| (r, c)))
        .boxed()
}

fn dim(range: impl Into<SizeRange>) -> RangeInclusive<usize> {
    let range = range.into();
    range.start()..=range.end_incl()
}

#[cfg(not(miri))]
#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_arbitrary_fixed_dims((rows, columns) in arbitrary_gradients(3, 7)) {
            assert_eq!(rows.dimensions(), (3, 7));
            assert_eq!(columns.dimensions(), (3, 7));
        }

        #[test]
        fn test_arbitrary_ranges((rows, columns) in arbitrary_gradients(1..30, 2..=15)) {
            assert!((1..30).contains(&rows.rows()));
            assert!((2..=15).contains(&rows.columns()));
            assert_eq!(rows.dimensions(), columns.dimensions());
        }
    }
}
