//! Population Statistics
//!
//! Min/max/mean/median over component values and the rescaling used
//! by the scoring pass. Median is the middle element for odd-length
//! input and the mean of the two middle elements for even-length
//! input; all statistics are undefined on empty input and callers
//! must guard.

use otv_core::types::ComponentStats;

/// Median of `values`; `None` on empty input
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).expect("component values are finite"));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

/// Mean of `values`; `None` on empty input
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Minimum of `values`; `None` on empty input
pub fn min(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

/// Maximum of `values`; `None` on empty input
pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

/// All four statistics at once; `None` on empty input
pub fn component_stats(values: &[f64]) -> Option<ComponentStats> {
    Some(ComponentStats {
        min: min(values)?,
        max: max(values)?,
        average: mean(values)?,
        median: median(values)?,
    })
}

/// Rescale `value` into [0, 1] against its population statistics.
/// A zero-variance population rescales to 1.0.
pub fn scaled(value: f64, stats: &ComponentStats) -> f64 {
    let range = stats.max - stats.min;
    if range == 0.0 {
        return 1.0;
    }
    (value - stats.min) / range
}

/// Rescaled score where a lower raw value is better
pub fn scaled_lower_is_better(value: f64, stats: &ComponentStats) -> f64 {
    1.0 - scaled(value, stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_even_length() {
        assert_eq!(median(&[1.0, 3.0, 5.0, 7.0]), Some(4.0));
    }

    #[test]
    fn test_median_odd_length() {
        assert_eq!(median(&[2.0, 4.0, 9.0]), Some(4.0));
    }

    #[test]
    fn test_median_unsorted_input() {
        assert_eq!(median(&[9.0, 2.0, 4.0]), Some(4.0));
    }

    #[test]
    fn test_median_empty_is_none() {
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_mean_min_max() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(mean(&values), Some(2.5));
        assert_eq!(min(&values), Some(1.0));
        assert_eq!(max(&values), Some(4.0));
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_component_stats() {
        let stats = component_stats(&[1.0, 3.0, 5.0, 7.0]).unwrap();
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 7.0);
        assert_eq!(stats.average, 4.0);
        assert_eq!(stats.median, 4.0);
        assert!(component_stats(&[]).is_none());
    }

    #[test]
    fn test_scaled_zero_variance() {
        let stats = component_stats(&[5.0]).unwrap();
        assert_eq!(scaled(5.0, &stats), 1.0);
        assert_eq!(scaled_lower_is_better(5.0, &stats), 0.0);
    }

    #[test]
    fn test_scaled_range() {
        let stats = component_stats(&[0.0, 10.0]).unwrap();
        assert_eq!(scaled(0.0, &stats), 0.0);
        assert_eq!(scaled(5.0, &stats), 0.5);
        assert_eq!(scaled(10.0, &stats), 1.0);
        assert_eq!(scaled_lower_is_better(0.0, &stats), 1.0);
    }
}
