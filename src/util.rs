// Utility helpers for parsing, basic statistics and number formatting.
//
// Parsing is forgiving: anything that does not read as a finite number
// becomes `None` so the rest of the crate only sees clean, typed values.
use num_format::{Locale, ToFormattedString};

/// Parse a CSV cell into `f64`.
///
/// - Trims whitespace and strips thousands separators.
/// - Accepts scientific notation (`1.5e+03`), which the OWID export uses.
/// - Returns `None` for empty cells, text, `NaN` and infinities.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    let s = s.replace(',', "");
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn parse_i32_safe(s: Option<&str>) -> Option<i32> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<i32>().ok()
}

/// `numerator / denominator`, or `None` when the denominator is zero or the
/// result is not finite.
pub fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        return None;
    }
    Some(numerator / denominator).filter(|v| v.is_finite())
}

/// Sum of the present values; `None` when there are none.
pub fn sum_present<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    values
        .into_iter()
        .flatten()
        .fold(None, |acc, v| Some(acc.unwrap_or(0.0) + v))
}

pub fn mean(v: &[f64]) -> Option<f64> {
    if v.is_empty() {
        return None;
    }
    Some(v.iter().sum::<f64>() / v.len() as f64)
}

/// Quantile with linear interpolation between closest ranks.
///
/// `sorted` must be ascending and `q` in `[0, 1]`.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals with locale-aware thousands separators, e.g. `1,234,567.89`.
    let s = format!("{:.*}", decimals, n.abs());
    // Values that round to zero print unsigned.
    let neg = n < 0.0 && s.bytes().any(|b| matches!(b, b'1'..=b'9'));
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

/// Like [`format_number`] but renders a missing value as an em dash.
pub fn format_opt(n: Option<f64>, decimals: usize) -> String {
    n.map_or_else(|| "\u{2014}".to_string(), |v| format_number(v, decimals))
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_owid_numbers() {
        assert_eq!(parse_f64_safe(Some(" 1,234.5 ")), Some(1234.5));
        assert_eq!(parse_f64_safe(Some("1.5e+03")), Some(1500.0));
        assert_eq!(parse_f64_safe(Some("")), None);
        assert_eq!(parse_f64_safe(Some("n/a")), None);
        assert_eq!(parse_f64_safe(Some("NaN")), None);
        assert_eq!(parse_f64_safe(None), None);
    }

    #[test]
    fn ratio_rejects_zero_denominator() {
        assert_eq!(ratio(1.0, 0.0), None);
        assert_eq!(ratio(1.0, 4.0), Some(0.25));
    }

    #[test]
    fn sum_present_distinguishes_empty_from_zero() {
        assert_eq!(sum_present([None, None]), None);
        assert_eq!(sum_present([Some(0.0), None]), Some(0.0));
        assert_eq!(sum_present([Some(1.5), None, Some(2.0)]), Some(3.5));
    }

    #[test]
    fn quantile_interpolates() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&v, 0.0), Some(1.0));
        assert_eq!(quantile(&v, 1.0), Some(4.0));
        assert!((quantile(&v, 0.5).unwrap() - 2.5).abs() < 1e-12);
        assert_eq!(quantile(&[], 0.5), None);
    }

    #[test]
    fn formats_with_separators() {
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(-12.5, 1), "-12.5");
        assert_eq!(format_number(3.0, 0), "3");
        assert_eq!(format_opt(None, 2), "\u{2014}");
        assert_eq!(format_int(9855), "9,855");
    }

    #[test]
    fn values_rounding_to_zero_have_no_sign() {
        assert_eq!(format_number(-0.001, 2), "0.00");
        assert_eq!(format_number(-0.0, 1), "0.0");
        assert_eq!(format_number(-0.4, 0), "0");
        assert_eq!(format_number(-0.006, 2), "-0.01");
    }
}
