//! Character encoding conversion for headers and cell values.
//!
//! Conversion never fails once the encodings are resolved: malformed source
//! bytes decode to U+FFFD and characters the target cannot represent are
//! written as HTML decimal character references (`&#NNNN;`).

use crate::error::{ExportError, Result};
use encoding_rs::Encoding;
use std::borrow::Cow;

/// Encoding of raw database bytes when nothing else is configured.
pub const DEFAULT_SOURCE_ENCODING: &str = "gbk";

/// Encoding of the values written into the workbook by default.
pub const DEFAULT_TARGET_ENCODING: &str = "utf-8";

/// Resolves an encoding label (`gbk`, `utf-8`, `latin1`, ...).
pub fn resolve(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| ExportError::config(format!("unknown encoding label '{label}'")))
}

/// Converts raw bytes from a source encoding to a target encoding.
#[derive(Debug, Clone, Copy)]
pub struct Transcoder {
    source: &'static Encoding,
    target: &'static Encoding,
}

impl Transcoder {
    /// Creates a transcoder from two encoding labels.
    pub fn new(source: &str, target: &str) -> Result<Self> {
        Ok(Self::from_encodings(resolve(source)?, resolve(target)?))
    }

    pub fn from_encodings(source: &'static Encoding, target: &'static Encoding) -> Self {
        Self { source, target }
    }

    pub fn source(&self) -> &'static Encoding {
        self.source
    }

    pub fn target(&self) -> &'static Encoding {
        self.target
    }

    /// Decodes `raw` from the source encoding and returns its bytes in the
    /// target encoding.
    pub fn transcode<'a>(&self, raw: &'a [u8]) -> Cow<'a, [u8]> {
        if self.source == self.target && self.is_well_formed(raw) {
            return Cow::Borrowed(raw);
        }
        let text = self.decode(raw);
        match self.encode(&text) {
            Cow::Borrowed(bytes) => Cow::Owned(bytes.to_vec()),
            Cow::Owned(bytes) => Cow::Owned(bytes),
        }
    }

    /// Returns the text a cell should hold for `raw`.
    ///
    /// The value is restricted to what the target encoding can represent, but
    /// is handed back as a `String` since the workbook stores text as UTF-8.
    pub fn convert(&self, raw: &[u8]) -> String {
        self.read_target(&self.transcode(raw))
    }

    /// Like [`Transcoder::convert`] for text that is already decoded, such as
    /// driver-decoded columns and column names. Only the target applies.
    pub fn convert_text(&self, text: &str) -> String {
        if self.target == encoding_rs::UTF_8 {
            return text.to_string();
        }
        self.read_target(&self.encode(text))
    }

    /// Like [`Transcoder::convert`], mapping `None` (SQL NULL) to an empty
    /// string without touching the codec.
    pub fn convert_nullable(&self, raw: Option<&[u8]>) -> String {
        match raw {
            Some(bytes) => self.convert(bytes),
            None => String::new(),
        }
    }

    fn read_target(&self, bytes: &[u8]) -> String {
        let (text, _) = self.target.decode_without_bom_handling(bytes);
        text.into_owned()
    }

    fn decode<'a>(&self, raw: &'a [u8]) -> Cow<'a, str> {
        let (text, had_errors) = self.source.decode_without_bom_handling(raw);
        if had_errors {
            tracing::trace!(
                encoding = self.source.name(),
                "replaced malformed byte sequence with U+FFFD"
            );
        }
        text
    }

    fn encode<'a>(&self, text: &'a str) -> Cow<'a, [u8]> {
        let (bytes, _, _) = self.target.encode(text);
        bytes
    }

    fn is_well_formed(&self, raw: &[u8]) -> bool {
        self.source
            .decode_without_bom_handling_and_without_replacement(raw)
            .is_some()
    }
}

impl Default for Transcoder {
    fn default() -> Self {
        Self::from_encodings(encoding_rs::GBK, encoding_rs::UTF_8)
    }
}
