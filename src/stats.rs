//! Small numeric helpers shared by scoring, profiling and estimation.

/// Arithmetic mean, or `None` for an empty input.
pub(crate) fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0.0), |(sum, count), value| (sum + value, count + 1.0));
    (count > 0.0).then_some(sum / count)
}

/// Population standard deviation (ddof = 0).
pub(crate) fn population_std(values: &[f64]) -> f64 {
    let Some(centre) = mean(values.iter().copied()) else {
        return 0.0;
    };
    mean(values.iter().map(|value| (value - centre).powi(2))).map_or(0.0, f64::sqrt)
}

/// Standardises values against their own mean and population standard
/// deviation. A constant column maps to all zeros.
pub(crate) fn z_scores(values: &[f64]) -> Vec<f64> {
    let centre = mean(values.iter().copied()).unwrap_or(0.0);
    let spread = population_std(values);
    if spread <= f64::EPSILON * centre.abs().max(1.0) {
        return vec![0.0; values.len()];
    }
    values
        .iter()
        .map(|value| (value - centre) / spread)
        .collect()
}

/// Logistic function.
pub(crate) fn sigmoid(value: f64) -> f64 {
    1.0 / (1.0 + (-value).exp())
}

/// Rounds to two decimal places, halves away from zero.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
