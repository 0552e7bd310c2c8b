//! Progress arithmetic and number formatting.

/// Decimal-separator settings for display formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberLocale {
    pub decimal_separator: char,
}

impl Default for NumberLocale {
    fn default() -> Self {
        Self {
            decimal_separator: '.',
        }
    }
}

impl NumberLocale {
    /// Comma-decimal locales (`de`, `fr`, ...).
    pub fn comma() -> Self {
        Self {
            decimal_separator: ',',
        }
    }
}

/// Returns progress from `start` towards `target` in percent.
///
/// - Degenerate range (`target == start`): 100 when `current >= target`, else 0.
/// - Otherwise `(current - start) / (target - start) * 100`, floored at 0.
///   Values above 100 are returned as-is.
pub fn calculate_progress(start: f64, target: f64, current: f64) -> f64 {
    if target == start {
        return if current >= target { 100.0 } else { 0.0 };
    }
    let percentage = (current - start) / (target - start) * 100.0;
    percentage.max(0.0)
}

/// Whether a precise percentage counts as completed.
pub fn is_complete(percentage: f64) -> bool {
    percentage >= 100.0
}

/// Legacy 0..=100 integer progress; fractional values are floored so that
/// 100 is only reported once the goal is actually complete.
pub fn legacy_progress(percentage: f64) -> i32 {
    if !percentage.is_finite() {
        return if percentage > 0.0 { 100 } else { 0 };
    }
    percentage.floor().clamp(0.0, 100.0) as i32
}

/// Formats `value` with the default `.` separator.
///
/// Integral values render without decimals when `is_decimal` is false; every
/// other value renders with exactly one decimal place.
pub fn format_number(value: f64, is_decimal: bool) -> String {
    format_number_localized(value, is_decimal, NumberLocale::default())
}

pub fn format_number_localized(value: f64, is_decimal: bool, locale: NumberLocale) -> String {
    if !is_decimal && is_integral(value) {
        return format!("{value:.0}");
    }
    let rendered = format!("{value:.1}");
    if locale.decimal_separator == '.' {
        rendered
    } else {
        rendered.replacen('.', &locale.decimal_separator.to_string(), 1)
    }
}

/// Formats a progress percentage, e.g. `50%` or `33.3%`.
pub fn format_percentage(percentage: f64) -> String {
    format!("{}%", format_number(percentage, false))
}

fn is_integral(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0
}

#[cfg(test)]
mod tests {
    use super::{
        calculate_progress, format_number, format_number_localized, format_percentage,
        legacy_progress, NumberLocale,
    };

    #[test]
    fn degenerate_range_is_all_or_nothing() {
        assert_eq!(calculate_progress(5.0, 5.0, 5.0), 100.0);
        assert_eq!(calculate_progress(5.0, 5.0, 7.0), 100.0);
        assert_eq!(calculate_progress(5.0, 5.0, 3.0), 0.0);
    }

    #[test]
    fn overachievement_is_not_clamped() {
        assert_eq!(calculate_progress(0.0, 10.0, 20.0), 200.0);
    }

    #[test]
    fn regression_below_start_is_floored_at_zero() {
        assert_eq!(calculate_progress(10.0, 20.0, 5.0), 0.0);
    }

    #[test]
    fn in_range_progress_is_bounded_and_monotonic() {
        let mut previous = -1.0;
        for step in 0..=40 {
            let current = 2.0 + f64::from(step) * 0.25;
            let value = calculate_progress(2.0, 12.0, current);
            assert!((0.0..=100.0).contains(&value), "{value} out of range");
            assert!(value >= previous);
            previous = value;
        }
    }

    #[test]
    fn decreasing_targets_are_supported() {
        // Weight loss style goal: 80 -> 70.
        assert_eq!(calculate_progress(80.0, 70.0, 75.0), 50.0);
    }

    #[test]
    fn format_number_follows_decimal_flag_and_integrality() {
        assert_eq!(format_number(3.0, false), "3");
        assert_eq!(format_number(3.0, true), "3.0");
        assert_eq!(format_number(3.5, false), "3.5");
        assert_eq!(format_number(4.36, true), "4.4");
    }

    #[test]
    fn format_number_uses_locale_separator() {
        assert_eq!(format_number_localized(3.5, true, NumberLocale::comma()), "3,5");
        assert_eq!(format_number_localized(3.0, false, NumberLocale::comma()), "3");
    }

    #[test]
    fn percentage_and_legacy_progress() {
        assert_eq!(format_percentage(50.0), "50%");
        assert_eq!(format_percentage(200.0), "200%");
        assert_eq!(legacy_progress(99.9), 99);
        assert_eq!(legacy_progress(250.0), 100);
        assert_eq!(legacy_progress(-5.0), 0);
    }
}
