/// Percent change against the value `periods` rows earlier: `cur / prev - 1`.
///
/// The first `periods` positions and `0 / 0` are undefined. A zero previous
/// value with a non-zero current one yields an infinite change, which is kept.
pub fn pct_change(values: &[f64], periods: usize) -> Vec<Option<f64>> {
    values
        .iter()
        .enumerate()
        .map(|(i, &cur)| {
            if periods == 0 || i < periods {
                return None;
            }
            let change = cur / values[i - periods] - 1.0;
            (!change.is_nan()).then_some(change)
        })
        .collect()
}
