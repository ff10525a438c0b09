//! Least-squares and spread helpers

/// Slope of the ordinary least-squares line through `(xs[i], ys[i])`.
///
/// `slope = (n·Σxy − Σx·Σy) / (n·Σx² − (Σx)²)`
///
/// Returns `None` for mismatched or empty inputs, when every x is identical
/// (zero denominator), or when the result is not finite.
pub fn least_squares_slope(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.is_empty() || xs.len() != ys.len() {
        return None;
    }

    let n = xs.len() as f64;
    let (mut s_x, mut s_y, mut s_xy, mut s_xx) = (0.0, 0.0, 0.0, 0.0);
    for (&x, &y) in xs.iter().zip(ys) {
        s_x += x;
        s_y += y;
        s_xy += x * y;
        s_xx += x * x;
    }

    let denominator = n * s_xx - s_x * s_x;
    if denominator == 0.0 {
        return None;
    }

    let slope = (n * s_xy - s_x * s_y) / denominator;
    slope.is_finite().then_some(slope)
}

/// Population standard deviation. NaN for an empty slice.
pub fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}
