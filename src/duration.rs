use std::time::Duration;

const NANOS_PER_SEC: u128 = 1_000_000_000;

// Fraction digits beyond this are below nanosecond resolution for every unit.
const MAX_FRACTION_DIGITS: usize = 18;

// Roughly 292 years, the longest span a signed 64-bit nanosecond count holds.
const MAX_NANOS: u128 = i64::MAX as u128;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseDurationError {
    #[error("empty duration")]
    Empty,
    #[error("negative duration {0:?}")]
    Negative(String),
    #[error("invalid duration {0:?}")]
    Invalid(String),
    #[error("missing unit in duration {0:?}")]
    MissingUnit(String),
    #[error("unknown unit {unit:?} in duration {input:?}")]
    UnknownUnit { unit: String, input: String },
    #[error("duration {0:?} is too large")]
    Overflow(String),
    #[error("duration must be greater than zero")]
    Zero,
}

fn unit_nanos(unit: &str) -> Option<u128> {
    let nanos = match unit {
        "ns" => 1,
        "us" | "µs" | "μs" => 1_000,
        "ms" => 1_000_000,
        "s" => NANOS_PER_SEC,
        "m" => 60 * NANOS_PER_SEC,
        "h" => 3_600 * NANOS_PER_SEC,
        _ => return None,
    };
    Some(nanos)
}

fn split_digits(s: &str) -> (&str, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(end)
}

/// Parses `<number><unit>` terms such as `1h30m` or `1.5s`. A bare `0` needs no unit.
pub fn parse_duration(input: &str) -> Result<Duration, ParseDurationError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(ParseDurationError::Empty);
    }
    if s.starts_with('-') {
        return Err(ParseDurationError::Negative(input.to_owned()));
    }
    let mut rest = s.strip_prefix('+').unwrap_or(s);
    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(ParseDurationError::Invalid(input.to_owned()));
    }

    let overflow = || ParseDurationError::Overflow(input.to_owned());
    let mut total: u128 = 0;
    while !rest.is_empty() {
        let (whole, tail) = split_digits(rest);
        let (fraction, tail) = match tail.strip_prefix('.') {
            Some(after_dot) => split_digits(after_dot),
            None => ("", tail),
        };
        if whole.is_empty() && fraction.is_empty() {
            return Err(ParseDurationError::Invalid(input.to_owned()));
        }

        let unit_end = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_end);
        if unit.is_empty() {
            return Err(ParseDurationError::MissingUnit(input.to_owned()));
        }
        let scale = unit_nanos(unit).ok_or_else(|| ParseDurationError::UnknownUnit {
            unit: unit.to_owned(),
            input: input.to_owned(),
        })?;

        let mut nanos = if whole.is_empty() {
            0
        } else {
            let whole: u128 = whole.parse().map_err(|_| overflow())?;
            whole.checked_mul(scale).ok_or_else(overflow)?
        };
        if !fraction.is_empty() {
            let fraction = &fraction[..fraction.len().min(MAX_FRACTION_DIGITS)];
            let digits: u128 = fraction.parse().map_err(|_| overflow())?;
            nanos += digits * scale / 10u128.pow(fraction.len() as u32);
        }
        total = total.checked_add(nanos).ok_or_else(overflow)?;
        rest = tail;
    }

    if total > MAX_NANOS {
        return Err(overflow());
    }
    Ok(Duration::new(
        (total / NANOS_PER_SEC) as u64,
        (total % NANOS_PER_SEC) as u32,
    ))
}

pub fn parse_run_duration(input: &str) -> Result<Duration, ParseDurationError> {
    match parse_duration(input)? {
        d if d.is_zero() => Err(ParseDurationError::Zero),
        d => Ok(d),
    }
}
