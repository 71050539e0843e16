/// Divides and rounds to the nearest integer, with exact halves rounding up.
/// Returns 0 for a zero denominator.
pub fn round_half_up(numerator: u64, denominator: u64) -> u64 {
    if denominator == 0 {
        return 0;
    }
    let n = u128::from(numerator);
    let d = u128::from(denominator);
    // floor((2n + d) / 2d) == floor(n/d + 1/2)
    ((2 * n + d) / (2 * d)) as u64
}
