//! Statistical helper functions for the TTT pipeline.
//!
//! The `nan_*` family skips NaN ("no data") entries instead of letting them
//! poison the result, mirroring how missing grid cells are handled upstream.

/// Mean of the non-NaN values. Returns NaN if there are none.
pub fn nan_mean(data: &[f64]) -> f64 {
    let (sum, n) = data
        .iter()
        .filter(|x| !x.is_nan())
        .fold((0.0, 0usize), |(s, n), &x| (s + x, n + 1));
    if n == 0 {
        return f64::NAN;
    }
    sum / n as f64
}

/// Population standard deviation (N denominator) of the non-NaN values.
/// Returns NaN if there are none.
pub fn nan_std(data: &[f64]) -> f64 {
    let m = nan_mean(data);
    if m.is_nan() {
        return f64::NAN;
    }
    let (ss, n) = data
        .iter()
        .filter(|x| !x.is_nan())
        .fold((0.0, 0usize), |(s, n), &x| (s + (x - m) * (x - m), n + 1));
    (ss / n as f64).sqrt()
}

/// Mean and population standard deviation of the values where `keep` is
/// true and the value is not NaN.
///
/// Both results are NaN when nothing qualifies.
pub fn masked_mean_std(data: &[f64], keep: impl Fn(usize) -> bool) -> (f64, f64) {
    let selected: Vec<f64> = data
        .iter()
        .enumerate()
        .filter(|&(i, x)| keep(i) && !x.is_nan())
        .map(|(_, &x)| x)
        .collect();
    (nan_mean(&selected), nan_std(&selected))
}

/// Index of the largest value in `data`, treating NaN as negative infinity.
///
/// Ties resolve to the earliest index. Returns `None` for an empty slice.
pub fn argmax_first(data: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &x) in data.iter().enumerate() {
        let v = if x.is_nan() { f64::NEG_INFINITY } else { x };
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}
