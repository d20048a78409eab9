//! Number format classification and display rendering of numeric cell values.
//!
//! Only the distinction that changes a value's text matters here: whether a number is a
//! date/time serial or a plain number. Plain numbers render in their shortest form
//! regardless of the cell's number format.

use std::collections::HashMap;

/// How a numeric cell value is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueFormat {
    /// Plain number.
    #[default]
    General,
    /// Date, or date with time: `YYYY-MM-DD HH:MM:SS`.
    DateTime,
    /// Time of day or duration without a date part: `HH:MM:SS`.
    TimeOnly,
}

/// Built-in number format IDs that Excel defines as dates or times.
/// See: ECMA-376 Part 1, Section 18.8.30 (plus the CJK date IDs 27-36 and 50-58).
pub const fn builtin_value_format(id: u32) -> ValueFormat {
    match id {
        14..=17 | 22 | 27..=31 | 34..=36 | 50..=58 => ValueFormat::DateTime,
        18..=21 | 32 | 33 | 45..=47 => ValueFormat::TimeOnly,
        _ => ValueFormat::General,
    }
}

/// Strip quoted literals, bracketed sections, and escaped characters from a format code.
fn format_tokens(format_code: &str) -> String {
    let lower = format_code.to_lowercase();
    let mut in_quotes = false;
    let mut in_brackets = false;
    let mut skip_next = false;
    let mut cleaned = String::with_capacity(lower.len());

    for c in lower.chars() {
        if skip_next {
            skip_next = false;
            continue;
        }
        match c {
            '"' => in_quotes = !in_quotes,
            '[' if !in_quotes => in_brackets = true,
            ']' if !in_quotes => in_brackets = false,
            // `\x` escapes a literal, `_x` pads by the width of x, `*x` repeats x
            '\\' | '_' | '*' if !in_quotes && !in_brackets => skip_next = true,
            _ if !in_quotes && !in_brackets => cleaned.push(c),
            _ => {}
        }
    }

    cleaned
}

/// Classify a custom format code.
pub fn classify_format_code(format_code: &str) -> ValueFormat {
    // Only the first section decides; later sections cover negatives/zero/text.
    let first_section = format_code.split(';').next().unwrap_or("");
    let cleaned = format_tokens(first_section);
    if cleaned == "general" {
        return ValueFormat::General;
    }

    let has_year = cleaned.contains('y');
    let has_day = cleaned.contains('d');
    let has_hour = cleaned.contains('h');
    // m is month/minute only when not a numeric placeholder format
    let has_m = cleaned.contains('m') && !cleaned.contains('#') && !cleaned.contains('0');
    let has_seconds = cleaned.contains('s') && cleaned.contains(':');
    // elapsed-time codes like [h]:mm:ss lose their bracket part above
    let elapsed = format_code.to_lowercase().contains("[h]")
        || format_code.to_lowercase().contains("[mm]")
        || format_code.to_lowercase().contains("[ss]");

    if has_year || has_day {
        ValueFormat::DateTime
    } else if has_hour || has_seconds || elapsed {
        ValueFormat::TimeOnly
    } else if has_m {
        // a bare month code such as "mmm"
        ValueFormat::DateTime
    } else {
        ValueFormat::General
    }
}

/// Resolve the value format for a number format id, consulting custom formats first.
pub fn resolve_value_format(num_fmt_id: u32, custom: &HashMap<u32, String>) -> ValueFormat {
    if let Some(code) = custom.get(&num_fmt_id) {
        return classify_format_code(code);
    }
    builtin_value_format(num_fmt_id)
}

/// Date/time text for a serial, or `None` when the format is General or the serial
/// has no calendar representation.
pub fn format_date_value(value: f64, format: ValueFormat, date1904: bool) -> Option<String> {
    match format {
        ValueFormat::General => None,
        ValueFormat::DateTime | ValueFormat::TimeOnly => {
            format_serial(value, format == ValueFormat::TimeOnly, date1904)
        }
    }
}

/// Shortest text for a plain number: integral values drop the fraction.
#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
pub fn format_general(value: f64) -> String {
    if value.is_finite() && value == value.trunc() && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Days from 1970-01-01 to 1899-12-30 (the 1900-system epoch for serials past the leap bug).
const EPOCH_1900: i64 = -25_569;
/// Days from 1970-01-01 to 1904-01-01.
const EPOCH_1904: i64 = -24_107;
const SECONDS_PER_DAY: i64 = 86_400;

/// Render an Excel serial as `YYYY-MM-DD HH:MM:SS`, or `HH:MM:SS` for time-only formats.
///
/// Returns `None` for serials outside the representable range (negative, or past 9999).
#[allow(clippy::cast_possible_truncation)]
fn format_serial(serial: f64, time_only: bool, date1904: bool) -> Option<String> {
    if !serial.is_finite() || serial < 0.0 || serial >= 2_958_466.0 {
        return None;
    }

    let total_seconds = (serial * SECONDS_PER_DAY as f64).round() as i64;
    let days = total_seconds.div_euclid(SECONDS_PER_DAY);
    let secs = total_seconds.rem_euclid(SECONDS_PER_DAY);
    let (hour, minute, second) = (secs / 3600, (secs % 3600) / 60, secs % 60);

    if time_only {
        // durations longer than a day keep counting hours
        let hours = days * 24 + hour;
        return Some(format!("{hours:02}:{minute:02}:{second:02}"));
    }

    let unix_days = if date1904 {
        EPOCH_1904 + days
    } else if days < 61 {
        // Excel treats 1900 as a leap year; serials before the phantom Feb 29 are off by one
        EPOCH_1900 + 1 + days
    } else {
        EPOCH_1900 + days
    };
    let (year, month, day) = civil_from_days(unix_days);

    Some(format!(
        "{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}"
    ))
}

/// Convert days since 1970-01-01 to a proleptic Gregorian (year, month, day).
fn civil_from_days(days: i64) -> (i64, i64, i64) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_general_format() {
        assert_eq!(format_general(42.0), "42");
        assert_eq!(format_general(-7.0), "-7");
        assert_eq!(format_general(3.5), "3.5");
        assert_eq!(format_general(0.1 + 0.2), "0.30000000000000004");
    }

    #[test_case(14, ValueFormat::DateTime)]
    #[test_case(22, ValueFormat::DateTime)]
    #[test_case(20, ValueFormat::TimeOnly)]
    #[test_case(46, ValueFormat::TimeOnly)]
    #[test_case(0, ValueFormat::General)]
    #[test_case(4, ValueFormat::General)]
    #[test_case(49, ValueFormat::General)]
    fn test_builtin_formats(id: u32, expected: ValueFormat) {
        assert_eq!(builtin_value_format(id), expected);
    }

    #[test_case("yyyy-mm-dd", ValueFormat::DateTime)]
    #[test_case("d-mmm-yy", ValueFormat::DateTime)]
    #[test_case("mmm", ValueFormat::DateTime)]
    #[test_case("hh:mm:ss", ValueFormat::TimeOnly)]
    #[test_case("[h]:mm", ValueFormat::TimeOnly)]
    #[test_case("#,##0.00", ValueFormat::General)]
    #[test_case("0.00%", ValueFormat::General)]
    #[test_case("0.00E+00", ValueFormat::General)]
    #[test_case("\"days\" 0", ValueFormat::General)]
    #[test_case("[Red]#,##0;[Blue]-#,##0", ValueFormat::General)]
    #[test_case("General", ValueFormat::General)]
    fn test_classify_format_code(code: &str, expected: ValueFormat) {
        assert_eq!(classify_format_code(code), expected);
    }

    #[test]
    fn test_custom_format_overrides_builtin_id() {
        let mut custom = HashMap::new();
        custom.insert(164, "yyyy/mm/dd".to_string());
        assert_eq!(resolve_value_format(164, &custom), ValueFormat::DateTime);
        assert_eq!(resolve_value_format(165, &custom), ValueFormat::General);
    }

    #[test_case(1.0, "1900-01-01 00:00:00")]
    #[test_case(59.0, "1900-02-28 00:00:00")]
    #[test_case(61.0, "1900-03-01 00:00:00")]
    #[test_case(45_000.0, "2023-03-15 00:00:00")]
    #[test_case(45_000.5, "2023-03-15 12:00:00")]
    #[test_case(2_958_465.0, "9999-12-31 00:00:00")]
    fn test_date_1900(serial: f64, expected: &str) {
        assert_eq!(format_date_value(serial, ValueFormat::DateTime, false).unwrap(), expected);
    }

    #[test]
    fn test_date_1904() {
        assert_eq!(
            format_date_value(0.0, ValueFormat::DateTime, true).unwrap(),
            "1904-01-01 00:00:00"
        );
        assert_eq!(
            format_date_value(43_538.0, ValueFormat::DateTime, true).unwrap(),
            "2023-03-15 00:00:00"
        );
    }

    #[test]
    fn test_time_only() {
        assert_eq!(format_date_value(0.75, ValueFormat::TimeOnly, false).unwrap(), "18:00:00");
        assert_eq!(format_date_value(1.5, ValueFormat::TimeOnly, false).unwrap(), "36:00:00");
    }

    #[test]
    fn test_serial_outside_calendar_has_no_date() {
        assert_eq!(format_date_value(-1.0, ValueFormat::DateTime, false), None);
        assert_eq!(format_date_value(3_000_000.0, ValueFormat::DateTime, false), None);
        assert_eq!(format_date_value(45_000.0, ValueFormat::General, false), None);
    }
}
