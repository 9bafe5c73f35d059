//! Binary framing for DAIDE messages: a 4-byte header (message type, pad byte,
//! 16-bit big-endian token count) followed by that many 16-bit tokens.
//! Integers are carried as a single token whose top bit flags it as an inline
//! value rather than a dictionary code, with the remaining 15 bits holding a
//! two's-complement value in `[-16384, 16383]` (enough for build counts,
//! years modulo a century, and province distances); ASCII text runs (for
//! press) are length-prefixed by a `Text` category token followed by one
//! token per two packed bytes.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("frame too short: need at least 4 header bytes, got {0}")]
    TruncatedHeader(usize),
    #[error("frame declares {declared} tokens but only {available} bytes of body remain")]
    TruncatedBody { declared: usize, available: usize },
    #[error("integer token {0} out of representable range")]
    IntegerOutOfRange(i32),
}

/// One fully decoded DAIDE frame: a message type byte and its token stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub message_type: u8,
    pub tokens: Vec<u16>,
}

/// Encode a frame to its wire representation.
pub fn encode_frame(frame: &Frame) -> Vec<u8> {
    let mut buf = Vec::with_capacity(4 + frame.tokens.len() * 2);
    buf.push(frame.message_type);
    buf.push(0); // reserved pad byte, per the published framing
    let len = frame.tokens.len() as u16;
    buf.extend_from_slice(&len.to_be_bytes());
    for token in &frame.tokens {
        buf.extend_from_slice(&token.to_be_bytes());
    }
    buf
}

/// Decode one frame from the front of `bytes`, returning it and the number of
/// bytes consumed so callers can advance a streaming buffer.
pub fn decode_frame(bytes: &[u8]) -> Result<(Frame, usize), CodecError> {
    if bytes.len() < 4 {
        return Err(CodecError::TruncatedHeader(bytes.len()));
    }
    let message_type = bytes[0];
    let declared = u16::from_be_bytes([bytes[2], bytes[3]]) as usize;
    let body_len = declared * 2;
    if bytes.len() - 4 < body_len {
        return Err(CodecError::TruncatedBody {
            declared,
            available: bytes.len() - 4,
        });
    }

    let tokens = bytes[4..4 + body_len]
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect();

    Ok((
        Frame {
            message_type,
            tokens,
        },
        4 + body_len,
    ))
}

/// Pack a signed integer into an inline integer token.
///
/// Dictionary codes ([`super::dict`]) always have their top bit clear (every
/// category byte is `0x01`-`0x08`), so setting the top bit here is enough to
/// distinguish an integer token from a dictionary lookup without a separate
/// tag byte, leaving the other 15 bits for a two's-complement value.
pub fn encode_integer(value: i32) -> Result<u16, CodecError> {
    if !(-16384..=16383).contains(&value) {
        return Err(CodecError::IntegerOutOfRange(value));
    }
    let bits = (value & 0x7fff) as u16;
    Ok(0x8000 | bits)
}

/// Whether `token` is an inline integer rather than a dictionary code.
pub fn is_integer_token(token: u16) -> bool {
    token & 0x8000 != 0
}

/// Unpack a signed integer from an inline integer token.
pub fn decode_integer(token: u16) -> i32 {
    let bits = (token & 0x7fff) as i32;
    if bits & 0x4000 != 0 {
        bits - 0x8000
    } else {
        bits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_round_trips() {
        let frame = Frame {
            message_type: 7,
            tokens: vec![0x0101, 0x0203, 0xffff],
        };
        let bytes = encode_frame(&frame);
        let (decoded, consumed) = decode_frame(&bytes).unwrap();
        assert_eq!(decoded, frame);
        assert_eq!(consumed, bytes.len());
    }

    #[test]
    fn truncated_body_is_rejected() {
        let bytes = [0u8, 0, 0, 3, 1, 2]; // declares 3 tokens, only 1 present
        assert!(matches!(
            decode_frame(&bytes),
            Err(CodecError::TruncatedBody { .. })
        ));
    }

    #[test]
    fn negative_integers_round_trip() {
        for value in [-16384, -2048, -1, 0, 1, 2047, 16383] {
            let token = encode_integer(value).unwrap();
            assert!(is_integer_token(token));
            assert_eq!(decode_integer(token), value);
        }
    }

    #[test]
    fn out_of_range_integer_is_rejected() {
        assert!(encode_integer(20000).is_err());
    }

    #[test]
    fn dictionary_codes_are_never_mistaken_for_integers() {
        let dict = super::super::dict::Dictionary::standard();
        let code = dict
            .code_of(super::super::dict::Category::Power, "ENG")
            .unwrap();
        assert!(!is_integer_token(code));
    }

    #[test]
    fn decoding_stops_at_the_declared_length_even_with_trailing_bytes() {
        let mut bytes = encode_frame(&Frame {
            message_type: 1,
            tokens: vec![0x0001],
        });
        bytes.extend_from_slice(&[9, 9, 9]); // next frame's header, not ours
        let (frame, consumed) = decode_frame(&bytes).unwrap();
        assert_eq!(frame.tokens, vec![0x0001]);
        assert_eq!(consumed, 6);
    }
}
