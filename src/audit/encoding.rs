//! Fallback text decoding for hand-maintained log files.

use std::fmt;

/// Text encodings tried when reading an audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// Strict UTF-8. Input starting with a byte-order mark is rejected so the
    /// BOM-aware variant handles it.
    Utf8,
    /// UTF-8 with a leading byte-order mark, which is stripped.
    Utf8Bom,
    /// Windows code page 1252. Five bytes in 0x80..=0x9F are unassigned.
    Windows1252,
    /// ISO-8859-1. Every byte maps to the code point of the same value.
    Latin1,
}

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Code points for 0x80..=0x9F in Windows-1252; `None` marks unassigned bytes.
#[rustfmt::skip]
const CP1252_HIGH: [Option<char>; 32] = [
    Some('\u{20AC}'), None,             Some('\u{201A}'), Some('\u{0192}'),
    Some('\u{201E}'), Some('\u{2026}'), Some('\u{2020}'), Some('\u{2021}'),
    Some('\u{02C6}'), Some('\u{2030}'), Some('\u{0160}'), Some('\u{2039}'),
    Some('\u{0152}'), None,             Some('\u{017D}'), None,
    None,             Some('\u{2018}'), Some('\u{2019}'), Some('\u{201C}'),
    Some('\u{201D}'), Some('\u{2022}'), Some('\u{2013}'), Some('\u{2014}'),
    Some('\u{02DC}'), Some('\u{2122}'), Some('\u{0161}'), Some('\u{203A}'),
    Some('\u{0153}'), None,             Some('\u{017E}'), Some('\u{0178}'),
];

impl TextEncoding {
    /// Order in which audit logs are decoded.
    pub const FALLBACK_ORDER: [Self; 4] = [
        Self::Utf8,
        Self::Utf8Bom,
        Self::Windows1252,
        Self::Latin1,
    ];

    /// Decodes `bytes`, or returns `None` if they are invalid in this encoding.
    #[must_use]
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            Self::Utf8 => {
                if bytes.starts_with(UTF8_BOM) {
                    return None;
                }
                std::str::from_utf8(bytes).ok().map(str::to_string)
            }
            Self::Utf8Bom => {
                let body = bytes.strip_prefix(UTF8_BOM)?;
                std::str::from_utf8(body).ok().map(str::to_string)
            }
            Self::Windows1252 => bytes
                .iter()
                .map(|&b| match b {
                    0x80..=0x9F => CP1252_HIGH[usize::from(b - 0x80)],
                    _ => Some(char::from(b)),
                })
                .collect(),
            Self::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Utf8 => "utf-8",
            Self::Utf8Bom => "utf-8-sig",
            Self::Windows1252 => "cp1252",
            Self::Latin1 => "iso-8859-1",
        })
    }
}

/// Decodes with the first encoding in `order` that accepts `bytes`.
#[must_use]
pub fn decode_first(bytes: &[u8], order: &[TextEncoding]) -> Option<(TextEncoding, String)> {
    order
        .iter()
        .find_map(|&encoding| encoding.decode(bytes).map(|text| (encoding, text)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_utf8_wins_first() {
        let (encoding, text) =
            decode_first("café.safetensors".as_bytes(), &TextEncoding::FALLBACK_ORDER).unwrap();
        assert_eq!(encoding, TextEncoding::Utf8);
        assert_eq!(text, "café.safetensors");
    }

    #[test]
    fn test_bom_is_stripped() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(b"a.safetensors");
        let (encoding, text) = decode_first(&bytes, &TextEncoding::FALLBACK_ORDER).unwrap();
        assert_eq!(encoding, TextEncoding::Utf8Bom);
        assert_eq!(text, "a.safetensors");
    }

    #[test]
    fn test_cp1252_smart_quotes() {
        let bytes = b"\x93quoted\x94 \x80.safetensors";
        let (encoding, text) = decode_first(bytes, &TextEncoding::FALLBACK_ORDER).unwrap();
        assert_eq!(encoding, TextEncoding::Windows1252);
        assert_eq!(text, "\u{201C}quoted\u{201D} \u{20AC}.safetensors");
    }

    #[test]
    fn test_unassigned_cp1252_byte_falls_to_latin1() {
        let (encoding, text) = decode_first(b"x\x81y", &TextEncoding::FALLBACK_ORDER).unwrap();
        assert_eq!(encoding, TextEncoding::Latin1);
        assert_eq!(text, "x\u{81}y");
    }

    #[test]
    fn test_all_fail_without_latin1() {
        let order = [TextEncoding::Utf8, TextEncoding::Windows1252];
        assert!(decode_first(b"\x81\xFF", &order).is_none());
    }

    #[test]
    fn test_display_names() {
        assert_eq!(TextEncoding::Utf8Bom.to_string(), "utf-8-sig");
        assert_eq!(TextEncoding::Latin1.to_string(), "iso-8859-1");
    }
}
