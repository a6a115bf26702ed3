//! Lenient numeric parsing and compact decimal formatting.
//!
//! Stored motor files depend on this exact grammar, so it is checked by hand
//! before deferring to the standard float parser (which would also take
//! `inf`, `NaN`, and friends).

/// Parse a decimal number with optional sign, fraction, and exponent.
///
/// Accepted: `54`, `54.`, `.5`, `-1.5e3`, `+2E-2` (surrounding whitespace
/// ignored). Everything else yields `None`.
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if !is_decimal(trimmed.as_bytes()) {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn is_decimal(bytes: &[u8]) -> bool {
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let int_digits = i - int_start;

    let mut frac_digits = 0;
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        frac_digits = i - frac_start;
    }
    if int_digits == 0 && frac_digits == 0 {
        return false;
    }

    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        i += 1;
        if i < bytes.len() && matches!(bytes[i], b'+' | b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }

    i == bytes.len()
}

/// Format with at most `max_decimals` places, dropping trailing zeros.
pub fn format_trimmed(value: f64, max_decimals: usize) -> String {
    let mut text = format!("{value:.max_decimals$}");
    if text.contains('.') {
        let keep = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(keep);
    }
    if text == "-0" {
        text = "0".to_string();
    }
    text
}
