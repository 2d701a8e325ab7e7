use super::FrameError;

/// Talker and sentence identifier the probe prefixes every reply with.
pub const SENTENCE_START: &[u8] = b"$AQCTD";

const CHECKSUM_DELIMITER: u8 = b'*';

/// A checksum-verified sentence, from `$` up to but excluding `*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sentence<'a> {
    bytes: &'a [u8],
}

impl<'a> Sentence<'a> {
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

/// Locate the CTD sentence in `buf` and verify its checksum.
pub fn validate(buf: &[u8]) -> Result<Sentence<'_>, FrameError> {
    let start = find(buf, SENTENCE_START).ok_or(FrameError::FrameNotFound)?;
    let frame = &buf[start..];

    let end = frame
        .iter()
        .position(|&b| b == CHECKSUM_DELIMITER)
        .ok_or(FrameError::ChecksumMismatch)?;
    let expected = frame
        .get(end + 1..end + 3)
        .and_then(parse_hex_byte)
        .ok_or(FrameError::ChecksumMismatch)?;

    // XOR of everything between '$' and '*'
    if checksum(&frame[1..end]) != expected {
        return Err(FrameError::ChecksumMismatch);
    }

    Ok(Sentence {
        bytes: &frame[..end],
    })
}

/// NMEA checksum: XOR of all payload bytes.
pub fn checksum(payload: &[u8]) -> u8 {
    payload.iter().fold(0, |acc, b| acc ^ b)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn parse_hex_byte(s: &[u8]) -> Option<u8> {
    match s {
        [high, low] => Some((hex_digit(*high)? << 4) | hex_digit(*low)?),
        _ => None,
    }
}

fn hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'A'..=b'F' => Some(c - b'A' + 10),
        b'a'..=b'f' => Some(c - b'a' + 10),
        _ => None,
    }
}
