//! Student's t critical values
//!
//! Two-tailed 95% critical values indexed by degrees of freedom.

/// Critical value used once the table runs out (normal approximation)
pub const NORMAL_CRITICAL_95: f64 = 1.96;

/// Two-tailed 95% critical values for df = 1..=30
const T_TABLE_95: [f64; 30] = [
    12.706, 4.303, 3.182, 2.776, 2.571, 2.447, 2.365, 2.306, 2.262, 2.228, // 1-10
    2.201, 2.179, 2.160, 2.145, 2.131, 2.120, 2.110, 2.101, 2.093, 2.086, // 11-20
    2.080, 2.074, 2.069, 2.064, 2.060, 2.056, 2.052, 2.048, 2.045, 2.042, // 21-30
];

/// Critical value for `df` degrees of freedom.
///
/// `df = 0` (a single sample) and `df > 30` fall back to [`NORMAL_CRITICAL_95`].
pub fn t_critical_95(df: usize) -> f64 {
    match df {
        1..=30 => T_TABLE_95[df - 1],
        _ => NORMAL_CRITICAL_95,
    }
}
