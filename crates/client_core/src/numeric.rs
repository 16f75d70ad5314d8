//! Lenient decimal parsing for form text.

/// Parses the longest leading decimal literal of `raw`.
///
/// Leading whitespace is skipped and trailing garbage ignored, so `"1.5 mol"`
/// yields `1.5` while `"mol"` and `""` yield `None`. Exponents are only
/// consumed when followed by digits. Literals that overflow `f64` yield `None`.
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let text = raw.trim_start();
    let bytes = text.as_bytes();
    let len = bytes.len();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let int_start = end;
    while end < len && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let int_digits = end - int_start;

    let mut frac_digits = 0;
    if end < len && bytes[end] == b'.' {
        let mut cursor = end + 1;
        while cursor < len && bytes[cursor].is_ascii_digit() {
            cursor += 1;
            frac_digits += 1;
        }
        if int_digits > 0 || frac_digits > 0 {
            end = cursor;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if end < len && matches!(bytes[end], b'e' | b'E') {
        let mut cursor = end + 1;
        if cursor < len && matches!(bytes[cursor], b'+' | b'-') {
            cursor += 1;
        }
        let exp_start = cursor;
        while cursor < len && bytes[cursor].is_ascii_digit() {
            cursor += 1;
        }
        if cursor > exp_start {
            end = cursor;
        }
    }

    text[..end]
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}
