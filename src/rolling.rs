/// Trailing mean over `window` values. A position only gets a value once the
/// window is full, so the first `window - 1` entries are `None`.
///
/// A zero window never fills and yields only `None`; configured windows are
/// rejected by `Windows::validate` before they get here.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut means = Vec::with_capacity(values.len());
    if window == 0 {
        means.resize(values.len(), None);
        return means;
    }

    let mut sum = 0.0;
    for (index, value) in values.iter().enumerate() {
        sum += value;
        if index >= window {
            sum -= values[index - window];
        }
        if index + 1 >= window {
            means.push(Some(sum / window as f64));
        } else {
            means.push(None);
        }
    }
    means
}

#[cfg(test)]
mod tests {
    use crate::rolling::rolling_mean;

    #[test]
    fn test_rolling_mean() {
        let means = rolling_mean(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert_eq!(means, vec![None, None, Some(2.0), Some(3.0), Some(4.0)]);
    }

    #[test]
    fn test_window_of_one_is_identity() {
        let means = rolling_mean(&[7.0, 0.0, 3.5], 1);
        assert_eq!(means, vec![Some(7.0), Some(0.0), Some(3.5)]);
    }

    #[test]
    fn test_zero_window_never_fills() {
        let means = rolling_mean(&[1.0, 2.0, 3.0], 0);
        assert_eq!(means, vec![None, None, None]);
    }

    #[test]
    fn test_input_shorter_than_window() {
        let means = rolling_mean(&[1.0, 2.0], 150);
        assert_eq!(means, vec![None, None]);
    }

    #[test]
    fn test_error_percentage() {
        let had_error = [0.0, 1.0, 0.0, 0.0];
        let means: Vec<Option<f64>> = rolling_mean(&had_error, 2)
            .into_iter()
            .map(|mean| mean.map(|mean| mean * 100.0))
            .collect();
        assert_eq!(means, vec![None, Some(50.0), Some(50.0), Some(0.0)]);
    }

    #[test]
    fn test_long_series_does_not_drift() {
        let values: Vec<f64> = (0..10_000).map(|i| (i % 7) as f64 * 0.1).collect();
        let means = rolling_mean(&values, 7);
        for mean in means.into_iter().skip(6) {
            assert!((mean.unwrap() - 0.3).abs() < 1e-9);
        }
    }
}
