use crate::error::NumeralError;

pub(crate) const MIN_BASE: u32 = 2;
pub(crate) const MAX_BASE: u32 = 36;

fn check_base(base: u32) -> Result<(), NumeralError> {
    if (MIN_BASE..=MAX_BASE).contains(&base) {
        Ok(())
    } else {
        Err(NumeralError::UnsupportedBase(base))
    }
}

/// Positional value of `input` in `base`: Σ digit_i × base^(n-1-i).
///
/// Strict: every character must belong to the base's alphabet (`0-9`, then
/// `a-z` case-insensitively). Whitespace, signs and prefixes are rejected,
/// so callers reading lines from a prompt should trim first.
pub(crate) fn parse_positional(input: &str, base: u32) -> Result<u64, NumeralError> {
    check_base(base)?;
    if input.is_empty() {
        return Err(NumeralError::Empty);
    }

    let mut value: u64 = 0;
    for (i, ch) in input.chars().enumerate() {
        let digit = ch.to_digit(base).ok_or(NumeralError::InvalidDigit {
            digit: ch,
            position: i + 1,
            base,
        })?;
        value = value
            .checked_mul(u64::from(base))
            .and_then(|v| v.checked_add(u64::from(digit)))
            .ok_or(NumeralError::Overflow { base })?;
    }
    Ok(value)
}

pub(crate) fn binary_to_decimal(input: &str) -> Result<u64, NumeralError> {
    parse_positional(input, 2)
}

/// Digits of `value` in `base`, lowercase, most significant first.
pub(crate) fn format_positional(mut value: u64, base: u32) -> Result<String, NumeralError> {
    check_base(base)?;
    if value == 0 {
        return Ok("0".into());
    }

    let mut digits = Vec::new();
    while value > 0 {
        let d = (value % u64::from(base)) as u32;
        // d < base <= 36, so from_digit always succeeds
        digits.push(char::from_digit(d, base).unwrap_or('?'));
        value /= u64::from(base);
    }
    Ok(digits.iter().rev().collect())
}

/// Human name for the bases people actually type.
pub(crate) fn base_name(base: u32) -> String {
    match base {
        2 => "binary".into(),
        8 => "octal".into(),
        10 => "decimal".into(),
        16 => "hex".into(),
        other => format!("base {other}"),
    }
}
