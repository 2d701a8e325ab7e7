use super::nmea::Sentence;
use super::FrameError;
use crate::domain::{CtdReading, Measurements};

const FIELD_DELIMITER: u8 = b',';

/// Decimal places kept by the fixed-point representation (`FIXED_POINT_SCALE` = 10^3).
const FRACTION_DIGITS: u32 = 3;

/// Extract temperature, pressure and conductivity, in that order, from a validated sentence.
pub fn parse(sentence: Sentence<'_>) -> Result<Measurements, FrameError> {
    let mut rest = sentence.as_bytes();
    let mut next_field = || -> Result<i32, FrameError> {
        let delimiter = rest
            .iter()
            .position(|&b| b == FIELD_DELIMITER)
            .ok_or(FrameError::MalformedField)?;
        rest = &rest[delimiter + 1..];
        Ok(to_fixed(rest))
    };

    let temperature = next_field()?;
    let pressure = next_field()?;
    let conductivity = next_field()?;

    Ok(Measurements {
        temperature,
        pressure,
        conductivity,
    })
}

/// Parse `sentence` and store the measurements in `reading`.
///
/// The reading is left untouched if any field is missing. Status and
/// timestamp are never modified.
pub fn parse_into(sentence: Sentence<'_>, reading: &mut CtdReading) -> Result<(), FrameError> {
    let measurements = parse(sentence)?;
    reading.apply(measurements);
    Ok(())
}

/// Convert the decimal number at the start of `text` to fixed point, truncating toward zero.
///
/// Accepts leading whitespace, an optional sign and a decimal point. Parsing
/// stops at the first byte that cannot continue the number, so `"45.67*3A"`
/// reads as `45670` and text without digits reads as `0`. Values beyond the
/// `i32` range saturate.
pub fn to_fixed(text: &[u8]) -> i32 {
    let mut bytes = text
        .iter()
        .copied()
        .skip_while(|b| b.is_ascii_whitespace())
        .peekable();

    let negative = match bytes.peek() {
        Some(b'-') => {
            bytes.next();
            true
        }
        Some(b'+') => {
            bytes.next();
            false
        }
        _ => false,
    };

    let mut magnitude: i32 = 0;
    let mut fraction: Option<u32> = None;
    for b in bytes {
        match (b, fraction) {
            (b'0'..=b'9', None) => magnitude = shift_in(magnitude, b),
            (b'0'..=b'9', Some(n)) if n < FRACTION_DIGITS => {
                magnitude = shift_in(magnitude, b);
                fraction = Some(n + 1);
            }
            // dropped digits truncate
            (b'0'..=b'9', Some(_)) => {}
            (b'.', None) => fraction = Some(0),
            _ => break,
        }
    }

    for _ in fraction.unwrap_or(0)..FRACTION_DIGITS {
        magnitude = magnitude.saturating_mul(10);
    }

    if negative {
        -magnitude
    } else {
        magnitude
    }
}

fn shift_in(value: i32, digit: u8) -> i32 {
    value
        .saturating_mul(10)
        .saturating_add(i32::from(digit - b'0'))
}

#[cfg(test)]
mod tests {
    extern crate std;
    use super::super::nmea::{checksum, validate};
    use super::*;
    use crate::domain::Status;
    use std::{format, string::String};

    fn sentence(body: &str) -> String {
        format!("${}*{:02X}\r\n", body, checksum(body.as_bytes()))
    }

    #[test]
    fn test_to_fixed() {
        assert_eq!(12340, to_fixed(b"12.34"));
        assert_eq!(2345, to_fixed(b"2.345"));
        assert_eq!(-2345, to_fixed(b"-2.345"));
        assert_eq!(1500, to_fixed(b"+1.5"));
        assert_eq!(7000, to_fixed(b"7"));
        assert_eq!(500, to_fixed(b".5"));
        assert_eq!(45670, to_fixed(b"45.67*3A\r\n"));
        assert_eq!(3000, to_fixed(b"  3,4"));
    }

    #[test]
    fn test_to_fixed_truncates_toward_zero() {
        assert_eq!(1234, to_fixed(b"1.23456"));
        assert_eq!(-1234, to_fixed(b"-1.23499"));
        assert_eq!(0, to_fixed(b"-0.0009"));
        assert_eq!(999, to_fixed(b"0.9999"));
    }

    #[test]
    fn test_to_fixed_degenerate_input() {
        assert_eq!(0, to_fixed(b""));
        assert_eq!(0, to_fixed(b"-"));
        assert_eq!(0, to_fixed(b"*5F"));
        assert_eq!(1200, to_fixed(b"1.2.3"));
        assert_eq!(i32::MAX, to_fixed(b"99999999999"));
        assert_eq!(-i32::MAX, to_fixed(b"-99999999999"));
    }

    #[test]
    fn test_parse_reply() {
        let reply = sentence("AQCTD,12.34,2.345,45.67");
        let m = parse(validate(reply.as_bytes()).unwrap()).unwrap();
        assert_eq!(
            Measurements {
                temperature: 12340,
                pressure: 2345,
                conductivity: 45670,
            },
            m
        );
    }

    #[test]
    fn test_parse_negative_fields() {
        let reply = sentence("AQCTD,-1.85,-0.01,-3.20");
        let m = parse(validate(reply.as_bytes()).unwrap()).unwrap();
        assert_eq!(-1850, m.temperature);
        assert_eq!(-10, m.pressure);
        assert_eq!(-3200, m.conductivity);
    }

    #[test]
    fn test_two_fields_are_malformed() {
        let reply = sentence("AQCTD,12.34,2.345");
        let s = validate(reply.as_bytes()).unwrap();
        assert_eq!(Err(FrameError::MalformedField), parse(s));
    }

    #[test]
    fn test_delimiters_after_checksum_do_not_count() {
        let reply = format!("{},1.00,2.00", sentence("AQCTD,12.34,2.345"));
        let s = validate(reply.as_bytes()).unwrap();
        assert_eq!(Err(FrameError::MalformedField), parse(s));
    }

    #[test]
    fn test_parse_into_is_all_or_nothing() {
        let mut reading = CtdReading::new();

        let short = sentence("AQCTD,1.00,2.00");
        let s = validate(short.as_bytes()).unwrap();
        assert_eq!(Err(FrameError::MalformedField), parse_into(s, &mut reading));
        assert_eq!(CtdReading::new(), reading);

        let full = sentence("AQCTD,1.00,2.00,3.00");
        let s = validate(full.as_bytes()).unwrap();
        assert_eq!(Ok(()), parse_into(s, &mut reading));
        assert_eq!(1000, reading.measurements().temperature);
        assert_eq!(2000, reading.measurements().pressure);
        assert_eq!(3000, reading.measurements().conductivity);
        assert_eq!(Status::Invalid, reading.status());
        assert_eq!(None, reading.timestamp());
    }
}
