//! Gap-bounded linear interpolation over a single measurement column.

/// Fills runs of missing samples that are at most `max_gap` long.
///
/// Samples are treated as equally spaced (the position in the slice is the
/// x-axis). `None` and `NaN` both count as missing.
///
/// * A short run between two known samples is filled on the straight line
///   between them.
/// * A short run at the start or the end of the slice has a known neighbour
///   on one side only and takes that neighbour's value.
/// * A run longer than `max_gap` is left completely missing.
/// * A slice with no known samples is returned unchanged.
///
/// ```
/// use air_quality::interpolate_bounded;
///
/// let filled = interpolate_bounded(&[Some(0.0), None, None, Some(3.0)], 2);
/// assert_eq!(filled, vec![Some(0.0), Some(1.0), Some(2.0), Some(3.0)]);
///
/// let wide = interpolate_bounded(&[Some(0.0), None, None, None, Some(4.0)], 2);
/// assert_eq!(wide, vec![Some(0.0), None, None, None, Some(4.0)]);
/// ```
pub fn interpolate_bounded(values: &[Option<f64>], max_gap: usize) -> Vec<Option<f64>> {
    let mut filled: Vec<Option<f64>> = values
        .iter()
        .map(|value| value.filter(|v| !v.is_nan()))
        .collect();

    let mut idx = 0;
    while idx < filled.len() {
        if filled[idx].is_some() {
            idx += 1;
            continue;
        }

        let run_start = idx;
        while idx < filled.len() && filled[idx].is_none() {
            idx += 1;
        }
        let run_end = idx; // exclusive
        let run_len = run_end - run_start;
        if run_len > max_gap {
            continue;
        }

        let before = run_start.checked_sub(1).and_then(|i| filled[i]);
        let after = filled.get(run_end).copied().flatten();

        match (before, after) {
            (Some(left), Some(right)) => {
                let steps = (run_len + 1) as f64;
                for (offset, slot) in filled[run_start..run_end].iter_mut().enumerate() {
                    *slot = Some(left + (right - left) * (offset + 1) as f64 / steps);
                }
            }
            (Some(edge), None) | (None, Some(edge)) => {
                for slot in filled[run_start..run_end].iter_mut() {
                    *slot = Some(edge);
                }
            }
            (None, None) => {}
        }
    }

    filled
}

/// Number of samples still missing.
pub fn count_missing(values: &[Option<f64>]) -> usize {
    values.iter().filter(|v| v.is_none()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_gap_is_midpoint() {
        let filled = interpolate_bounded(&[Some(1.0), None, Some(3.0)], 2);
        assert_eq!(filled, vec![Some(1.0), Some(2.0), Some(3.0)]);
    }

    #[test]
    fn test_two_sample_gap_is_linear() {
        let filled = interpolate_bounded(&[Some(10.0), None, None, Some(40.0)], 2);
        assert_eq!(filled, vec![Some(10.0), Some(20.0), Some(30.0), Some(40.0)]);
    }

    #[test]
    fn test_wide_gap_stays_missing() {
        let values = [Some(1.0), None, None, None, Some(5.0), None, Some(7.0)];
        let filled = interpolate_bounded(&values, 2);
        assert_eq!(
            filled,
            vec![Some(1.0), None, None, None, Some(5.0), Some(6.0), Some(7.0)]
        );
        assert_eq!(count_missing(&filled), 3);
    }

    #[test]
    fn test_edges_use_nearest_known_value() {
        let filled = interpolate_bounded(&[None, None, Some(5.0), Some(6.0), None], 2);
        assert_eq!(
            filled,
            vec![Some(5.0), Some(5.0), Some(5.0), Some(6.0), Some(6.0)]
        );
    }

    #[test]
    fn test_wide_leading_gap_stays_missing() {
        let filled = interpolate_bounded(&[None, None, None, Some(2.0)], 2);
        assert_eq!(filled, vec![None, None, None, Some(2.0)]);
    }

    #[test]
    fn test_all_missing_and_empty() {
        assert_eq!(interpolate_bounded(&[None, None], 2), vec![None, None]);
        assert!(interpolate_bounded(&[], 2).is_empty());
    }

    #[test]
    fn test_nan_counts_as_missing() {
        let filled = interpolate_bounded(&[Some(2.0), Some(f64::NAN), Some(4.0)], 2);
        assert_eq!(filled, vec![Some(2.0), Some(3.0), Some(4.0)]);
    }
}
