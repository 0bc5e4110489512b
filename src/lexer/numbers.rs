use std::ops::Range;

pub(crate) struct ParsedNumber {
    pub(crate) value: f64,
    pub(crate) literal_len: usize,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum NumberErrorKind {
    Malformed,
    // Too large for an `f64`, such as `1e400`
    OutOfRange,
}

#[derive(Debug)]
pub(crate) struct NumberParseError {
    pub(crate) kind: NumberErrorKind,
    pub(crate) literal: String,
    pub(crate) span: Range<usize>,
}

/// Scans the numeric literal at the start of `source`: digits with at most one `.`, optionally
/// followed by an exponent. An `e` only starts an exponent when digits follow it (after an
/// optional sign), otherwise it is left for the lexer, so `2e` is two times the constant `e`.
pub(crate) fn parse_number(source: &[u8]) -> Result<ParsedNumber, NumberParseError> {
    let mut end = 0;
    let mut has_fraction = false;
    let mut has_digits = false;

    while let Some(&c) = source.get(end) {
        match c {
            b'0'..=b'9' => has_digits = true,
            b'.' if !has_fraction => has_fraction = true,
            _ => break,
        }
        end += 1;
    }

    let malformed = |end: usize| NumberParseError {
        kind: NumberErrorKind::Malformed,
        literal: String::from_utf8_lossy(&source[..end]).into_owned(),
        span: 0..end,
    };

    // "1.2.3", "1..2" and friends
    if source.get(end) == Some(&b'.') {
        let mut tail = end;
        while matches!(source.get(tail), Some(b'0'..=b'9' | b'.')) {
            tail += 1;
        }
        return Err(malformed(tail));
    }

    if !has_digits {
        return Err(malformed(end));
    }

    if matches!(source.get(end), Some(b'e' | b'E')) {
        let mut exponent_end = end + 1;
        if matches!(source.get(exponent_end), Some(b'+' | b'-')) {
            exponent_end += 1;
        }

        let digits_start = exponent_end;
        while matches!(source.get(exponent_end), Some(b'0'..=b'9')) {
            exponent_end += 1;
        }

        if exponent_end > digits_start {
            end = exponent_end;
        }
    }

    let literal = std::str::from_utf8(&source[..end]).map_err(|_| malformed(end))?;
    let value = literal.parse::<f64>().map_err(|_| malformed(end))?;
    if value.is_infinite() {
        return Err(NumberParseError {
            kind: NumberErrorKind::OutOfRange,
            ..malformed(end)
        });
    }

    Ok(ParsedNumber {
        value,
        literal_len: end,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_literals() {
        for (input, expected, len) in [
            ("3", 3.0, 1),
            ("345", 345.0, 3),
            ("3.25", 3.25, 4),
            ("3.", 3.0, 2),
            (".5", 0.5, 2),
            ("1.5e3", 1500.0, 5),
            ("2E-2", 0.02, 4),
            ("2e+1", 20.0, 4),
            ("12x", 12.0, 2),
            ("2e", 2.0, 1),
            ("2ex", 2.0, 1),
            ("2e+", 2.0, 1),
            ("4)", 4.0, 1),
            ("1e-400", 0.0, 6),
            ("1.7976931348623157e308", f64::MAX, 22),
        ] {
            let parsed = parse_number(input.as_bytes()).expect(input);
            assert_eq!(parsed.value, expected, "when parsing '{input}'");
            assert_eq!(parsed.literal_len, len, "when parsing '{input}'");
        }
    }

    #[test]
    fn malformed_literals() {
        for (input, literal) in [("1.2.3", "1.2.3"), ("1..2", "1..2"), (".", "."), ("4.5.+1", "4.5.")] {
            let err = parse_number(input.as_bytes())
                .err()
                .unwrap_or_else(|| panic!("'{input}' should not parse"));
            assert_eq!(err.kind, NumberErrorKind::Malformed);
            assert_eq!(err.literal, literal);
            assert_eq!(err.span, 0..literal.len());
        }
    }

    #[test]
    fn out_of_range_literals() {
        for input in ["1e400", "2.5E+309", "99999e999"] {
            let err = parse_number(input.as_bytes())
                .err()
                .unwrap_or_else(|| panic!("'{input}' should not parse"));
            assert_eq!(err.kind, NumberErrorKind::OutOfRange);
            assert_eq!(err.literal, input);
            assert_eq!(err.span, 0..input.len());
        }
    }
}
