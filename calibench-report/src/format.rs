//! Result Formatting

use calibench_core::{BenchmarkResult, HistogramError, format_duration};

/// Format a number with `,` thousands separators and at most two fraction
/// digits, dropping trailing zeros.
///
/// ```
/// use calibench_report::format_number;
///
/// assert_eq!(format_number(1_234_567.891), "1,234,567.89");
/// assert_eq!(format_number(12.5), "12.5");
/// ```
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let fixed = format!("{:.2}", value.abs());
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');

    let mut output = String::with_capacity(fixed.len() + integer.len() / 3 + 1);
    if value < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        output.push('-');
    }
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            output.push(',');
        }
        output.push(digit);
    }
    if !fraction.is_empty() {
        output.push('.');
        output.push_str(fraction);
    }

    output
}

/// Render one result as a console line:
///
/// ```text
/// <name> x <ops> ops/sec ± <error>% (<N> runs sampled)	min..max=(<min> ... <max>) p75=<p75> p99=<p99>
/// ```
pub fn format_result_line(result: &BenchmarkResult) -> Result<String, HistogramError> {
    let histogram = &result.histogram;

    Ok(format!(
        "{} x {} ops/sec ± {}% ({} runs sampled)\tmin..max=({} ... {}) p75={} p99={}",
        result.name,
        format_number(result.ops_sec),
        format_number(histogram.error()?),
        histogram.samples()?,
        format_duration(histogram.min()?),
        format_duration(histogram.max()?),
        format_duration(histogram.percentile(75.0)?),
        format_duration(histogram.percentile(99.0)?),
    ))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use calibench_stats::Histogram;

    pub(crate) fn sample_result(name: &str) -> BenchmarkResult {
        let mut histogram = Histogram::new();
        for value in [1_000.0, 1_100.0, 1_200.0, 1_300.0] {
            histogram.record(value).unwrap();
        }
        histogram.finish().unwrap();

        BenchmarkResult {
            name: name.to_string(),
            ops_sec: 123_456.0,
            iterations: 400_000,
            total_time_ns: 3_240_000_000,
            cycles: 4,
            histogram,
        }
    }

    #[test]
    fn test_format_number_grouping() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(999.0), "999");
        assert_eq!(format_number(1_000.0), "1,000");
        assert_eq!(format_number(100.0), "100");
        assert_eq!(format_number(98.766), "98.77");
        assert_eq!(format_number(-1_234.5), "-1,234.5");
    }

    #[test]
    fn test_format_number_tiny_values() {
        assert_eq!(format_number(0.004), "0");
        assert_eq!(format_number(-0.001), "0");
        assert_eq!(format_number(f64::INFINITY), "inf");
    }

    #[test]
    fn test_result_line() {
        let line = format_result_line(&sample_result("demo")).unwrap();
        assert_eq!(
            line,
            "demo x 123,456 ops/sec ± 17.86% (4 runs sampled)\t\
             min..max=(1.00µs ... 1.30µs) p75=1.20µs p99=1.30µs"
        );
    }

    #[test]
    fn test_result_line_needs_sealed_histogram() {
        let mut result = sample_result("open");
        result.histogram = Histogram::new();
        assert_eq!(
            format_result_line(&result),
            Err(HistogramError::NotFinished)
        );
    }
}
