use encoding_rs::{UTF_8, WINDOWS_1250};
use std::borrow::Cow;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Text encodings the statistical exports come in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// cp1250, used by the CZSO codebook exports
    Windows1250,
    /// UTF-8 with an optional leading byte-order mark
    Utf8Sig,
}

/// Decoded file contents; `had_errors` is set when malformed bytes were replaced.
#[derive(Debug)]
pub struct DecodedText<'a> {
    pub text: Cow<'a, str>,
    pub had_errors: bool,
}

impl TextEncoding {
    pub fn decode(self, bytes: &[u8]) -> DecodedText<'_> {
        let (text, had_errors) = match self {
            TextEncoding::Windows1250 => WINDOWS_1250.decode_without_bom_handling(bytes),
            TextEncoding::Utf8Sig => {
                let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
                UTF_8.decode_without_bom_handling(body)
            }
        };
        DecodedText { text, had_errors }
    }
}
