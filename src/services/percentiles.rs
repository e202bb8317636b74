//! Quantile helpers for already-sorted slices.
//!
//! - Empty input => `None`.
//! - `quantile <= 0` => first element.
//! - `quantile >= 1` => last element.
//! - Otherwise the position `quantile * (len - 1)` is interpolated linearly
//!   between its two neighbouring elements.

/// Returns the linearly interpolated quantile of a slice that is already
/// sorted in ascending order. `quantile` is a fraction in `[0, 1]`.
pub fn quantile_sorted(sorted_values: &[f64], quantile: f64) -> Option<f64> {
    let last = sorted_values.len().checked_sub(1)?;
    if quantile <= 0.0 {
        return sorted_values.first().copied();
    }
    if quantile >= 1.0 {
        return sorted_values.get(last).copied();
    }

    let position = quantile * last as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    let low = sorted_values[lower];
    let high = sorted_values[upper];
    Some(low + (high - low) * fraction)
}

/// Sorts a copy of `values`, dropping NaN, and returns its quantile.
pub fn quantile_unsorted(values: &[f64], quantile: f64) -> Option<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    sorted.sort_by(f64::total_cmp);
    quantile_sorted(&sorted, quantile)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantile_sorted_returns_none_for_empty_input() {
        let values: [f64; 0] = [];
        assert_eq!(quantile_sorted(&values, 0.5), None);
    }

    #[test]
    fn quantile_sorted_clamps_to_first_and_last() {
        let values = [10.0, 20.0, 30.0];
        assert_eq!(quantile_sorted(&values, -1.0), Some(10.0));
        assert_eq!(quantile_sorted(&values, 0.0), Some(10.0));
        assert_eq!(quantile_sorted(&values, 1.0), Some(30.0));
        assert_eq!(quantile_sorted(&values, 10.0), Some(30.0));
    }

    #[test]
    fn sixty_fifth_percentile_interpolates_between_neighbours() {
        // len=5 => position = 0.65 * 4 = 2.6 => 10 + 0.6 * (20 - 10)
        let values = [10.0, 10.0, 10.0, 20.0, 20.0];
        let value = quantile_sorted(&values, 0.65).unwrap();
        assert!((value - 16.0).abs() < 1e-9);
    }

    #[test]
    fn exact_positions_return_the_element() {
        let values = [0.0, 1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile_sorted(&values, 0.25), Some(1.0));
        assert_eq!(quantile_sorted(&values, 0.5), Some(2.0));
        assert_eq!(quantile_sorted(&values, 0.75), Some(3.0));
    }

    #[test]
    fn single_value_is_its_own_quantile() {
        assert_eq!(quantile_sorted(&[7.0], 0.65), Some(7.0));
    }

    #[test]
    fn quantile_unsorted_ignores_nan_and_order() {
        let values = [20.0, f64::NAN, 10.0, 20.0, 10.0, 10.0];
        let value = quantile_unsorted(&values, 0.65).unwrap();
        assert!((value - 16.0).abs() < 1e-9);
        assert_eq!(quantile_unsorted(&[f64::NAN], 0.65), None);
    }
}
