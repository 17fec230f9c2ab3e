//! Statistical utilities shared by charts and analytics

use dv_core::Value;

/// Arithmetic mean, `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Pair two cell sequences, dropping pairs where either side is not numeric
pub fn numeric_pairs<'a, X, Y>(xs: X, ys: Y) -> (Vec<f64>, Vec<f64>)
where
    X: IntoIterator<Item = &'a Value>,
    Y: IntoIterator<Item = &'a Value>,
{
    xs.into_iter()
        .zip(ys)
        .filter_map(|(x, y)| Some((x.as_f64()?, y.as_f64()?)))
        .unzip()
}

/// Pearson correlation coefficient over paired samples.
///
/// Extra samples on the longer side are ignored. Fewer than two pairs or a
/// zero-variance side yields `0`; the result is clamped to `[-1, 1]`.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return 0.0;
    }
    let (xs, ys) = (&xs[..n], &ys[..n]);

    let mean_x = xs.iter().sum::<f64>() / n as f64;
    let mean_y = ys.iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;

    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denominator = (var_x * var_y).sqrt();
    if denominator == 0.0 || !denominator.is_finite() {
        return 0.0;
    }

    let r = cov / denominator;
    if r.is_finite() {
        r.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}
