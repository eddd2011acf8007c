//! Text decoding with a Latin-1 family fallback.

use encoding_rs::{Encoding, UTF_8, UTF_16BE, UTF_16LE, WINDOWS_1252};

use tabnorm_model::SourceEncoding;

/// Decoded file contents and the encoding that worked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub text: String,
    pub encoding: SourceEncoding,
}

/// Decodes raw bytes.
///
/// A byte-order mark decides the encoding outright. Otherwise strict UTF-8 is
/// tried first, then windows-1252. Returns `None` if no candidate decodes the
/// input without replacement characters.
pub fn decode_bytes(bytes: &[u8]) -> Option<Decoded> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let text = encoding.decode_without_bom_handling_and_without_replacement(&bytes[bom_len..])?;
        return Some(Decoded {
            text: text.into_owned(),
            encoding: source_encoding(encoding),
        });
    }

    for encoding in [UTF_8, WINDOWS_1252] {
        if let Some(text) = encoding.decode_without_bom_handling_and_without_replacement(bytes) {
            return Some(Decoded {
                text: text.into_owned(),
                encoding: source_encoding(encoding),
            });
        }
        tracing::debug!(encoding = encoding.name(), "decoding failed, trying next candidate");
    }
    None
}

fn source_encoding(encoding: &'static Encoding) -> SourceEncoding {
    if encoding == UTF_16LE {
        SourceEncoding::Utf16Le
    } else if encoding == UTF_16BE {
        SourceEncoding::Utf16Be
    } else if encoding == WINDOWS_1252 {
        SourceEncoding::Windows1252
    } else {
        SourceEncoding::Utf8
    }
}
