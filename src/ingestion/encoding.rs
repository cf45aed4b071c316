//! Text decoding for CSV input.
//!
//! CSV exports arrive either as UTF-8 (with or without a byte-order mark) or in the Big5 code
//! page used by many regional spreadsheet tools. The file carries no reliable label, so the
//! decision is made from the bytes:
//!
//! 1. A leading UTF-8 BOM is authoritative: it is stripped and the rest is decoded as UTF-8.
//! 2. Otherwise the buffer is decoded as UTF-8. If that needed replacement characters and the
//!    text does not contain a mis-decoded BOM (`ï»¿`), the original bytes are decoded as Big5.
//! 3. Otherwise the UTF-8 text is used.
//!
//! Byte sequences that are valid in both encodings cannot be told apart; UTF-8 wins.

use std::borrow::Cow;
use std::fmt;

use encoding_rs::{BIG5, UTF_8};

/// The UTF-8 byte-order mark.
pub const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// A UTF-8 BOM that went through a Latin-1 decode at some earlier step.
const MISDECODED_BOM: &str = "\u{00EF}\u{00BB}\u{00BF}";

/// Which decoding was applied to a CSV buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncodingDecision {
    /// Leading BOM stripped, remainder decoded as UTF-8.
    Utf8Bom,
    /// No BOM; UTF-8 decoding kept.
    Utf8,
    /// No BOM; UTF-8 produced replacement characters, decoded as Big5 instead.
    Big5,
}

impl EncodingDecision {
    /// Label of the encoding that was used (`"UTF-8"` or `"Big5"`).
    pub fn encoding_name(self) -> &'static str {
        match self {
            EncodingDecision::Utf8Bom | EncodingDecision::Utf8 => UTF_8.name(),
            EncodingDecision::Big5 => BIG5.name(),
        }
    }
}

impl fmt::Display for EncodingDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodingDecision::Utf8Bom => f.write_str("utf-8 (bom)"),
            EncodingDecision::Utf8 => f.write_str("utf-8"),
            EncodingDecision::Big5 => f.write_str("big5"),
        }
    }
}

/// Decoded CSV text plus the decision that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText<'a> {
    pub text: Cow<'a, str>,
    pub encoding: EncodingDecision,
}

/// Classify `bytes` without keeping the decoded text.
pub fn detect_encoding(bytes: &[u8]) -> EncodingDecision {
    decode_csv_bytes(bytes).encoding
}

/// Decode a raw CSV buffer. Never fails; invalid sequences become U+FFFD in the chosen encoding.
pub fn decode_csv_bytes(bytes: &[u8]) -> DecodedText<'_> {
    if let Some(rest) = bytes.strip_prefix(&UTF8_BOM) {
        let (text, _) = UTF_8.decode_without_bom_handling(rest);
        tracing::debug!(encoding = %EncodingDecision::Utf8Bom, bytes = bytes.len(), "decoded csv");
        return DecodedText {
            text,
            encoding: EncodingDecision::Utf8Bom,
        };
    }

    let (utf8, had_errors) = UTF_8.decode_without_bom_handling(bytes);
    if had_errors && !utf8.contains(MISDECODED_BOM) {
        let (text, big5_errors) = BIG5.decode_without_bom_handling(bytes);
        tracing::debug!(
            encoding = %EncodingDecision::Big5,
            bytes = bytes.len(),
            lossy = big5_errors,
            "utf-8 decode was lossy, fell back to big5"
        );
        return DecodedText {
            text,
            encoding: EncodingDecision::Big5,
        };
    }

    tracing::debug!(
        encoding = %EncodingDecision::Utf8,
        bytes = bytes.len(),
        lossy = had_errors,
        "decoded csv"
    );
    DecodedText {
        text: utf8,
        encoding: EncodingDecision::Utf8,
    }
}
