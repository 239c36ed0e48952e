//! The engine keeps its config in UTF-16LE, not the platform's default
//! encoding. Reading it any other way produces garbled text rather than an
//! error, so every byte of config I/O goes through here.

use thiserror::Error;

const BOM: [u8; 2] = [0xFF, 0xFE];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    /// The engine's own form.
    #[default]
    Crlf,
    Lf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Crlf => "\r\n",
            Self::Lf => "\n",
        }
    }

    /// Decided by the first line break; CRLF when there is none.
    pub fn detect(text: &str) -> Self {
        match text.find('\n') {
            Some(i) if i > 0 && text.as_bytes()[i - 1] == b'\r' => Self::Crlf,
            Some(_) => Self::Lf,
            None => Self::Crlf,
        }
    }
}

/// How a config file was laid out on disk, kept so writes reproduce it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextFormat {
    pub bom: bool,
    pub line_ending: LineEnding,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum EncodingError {
    #[error("UTF-16LE data has an odd length of {0} bytes")]
    OddLength(usize),
    #[error("invalid UTF-16LE data at byte offset {0}")]
    InvalidUtf16(usize),
}

/// Decodes UTF-16LE, stripping a leading BOM. Returns the text and whether a
/// BOM was present.
pub fn decode_utf16le(bytes: &[u8]) -> Result<(String, bool), EncodingError> {
    let (bom, body) = match bytes.strip_prefix(&BOM) {
        Some(rest) => (true, rest),
        None => (false, bytes),
    };

    if body.len() % 2 != 0 {
        return Err(EncodingError::OddLength(bytes.len()));
    }

    let units = body.chunks_exact(2).map(|pair| u16::from_le_bytes([pair[0], pair[1]]));

    let mut text = String::with_capacity(body.len() / 2);
    let mut offset = if bom { BOM.len() } else { 0 };
    for decoded in char::decode_utf16(units) {
        match decoded {
            Ok(c) => {
                offset += c.len_utf16() * 2;
                text.push(c);
            }
            Err(_) => return Err(EncodingError::InvalidUtf16(offset)),
        }
    }

    Ok((text, bom))
}

pub fn encode_utf16le(text: &str, bom: bool) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len() * 2 + 2);
    if bom {
        bytes.extend_from_slice(&BOM);
    }
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    bytes
}
