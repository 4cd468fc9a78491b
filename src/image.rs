//! Program image loading.
//!
//! Two on-disk formats:
//! - `.hex` text images: whitespace-separated hex byte pairs; `;` starts
//!   a comment, blank lines are ignored
//! - anything else is read as a raw binary image
//!
//! Either way the result is a flat byte vector that a loader copies into
//! machine memory at address zero.

use std::path::Path;
use thiserror::Error;

/// Load a program image from disk.
///
/// Files with a `.hex` extension are parsed as text; everything else is
/// taken verbatim.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<Vec<u8>, ImageError> {
    let path = path.as_ref();
    let is_hex = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("hex"))
        .unwrap_or(false);

    if is_hex {
        let source =
            std::fs::read_to_string(path).map_err(|e| ImageError::Io(e.to_string()))?;
        parse_hex(&source)
    } else {
        std::fs::read(path).map_err(|e| ImageError::Io(e.to_string()))
    }
}

/// Parse a text image into bytes.
pub fn parse_hex(source: &str) -> Result<Vec<u8>, ImageError> {
    let mut bytes = Vec::new();

    for (line_num, line) in source.lines().enumerate() {
        let code = match line.find(';') {
            Some(i) => &line[..i],
            None => line,
        };

        for token in code.split_whitespace() {
            let byte = u8::from_str_radix(token, 16).map_err(|_| ImageError::Parse {
                line: line_num + 1,
                token: token.to_string(),
            })?;
            bytes.push(byte);
        }
    }

    Ok(bytes)
}

/// Errors that can occur while loading an image.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("parse error on line {line}: {token:?} is not a hex byte")]
    Parse { line: usize, token: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_with_comments() {
        let source = "\
; a tiny program
30 f0 2a 00 00 00  ; irmovl $42, %eax

00                 ; halt
";
        let bytes = parse_hex(source).unwrap();
        assert_eq!(bytes, vec![0x30, 0xF0, 0x2A, 0, 0, 0, 0x00]);
    }

    #[test]
    fn test_parse_hex_rejects_bad_tokens() {
        let err = parse_hex("30 f0\nzz").unwrap_err();
        assert_eq!(
            err,
            ImageError::Parse {
                line: 2,
                token: "zz".to_string()
            }
        );
    }

    #[test]
    fn test_parse_hex_empty_is_empty() {
        assert_eq!(parse_hex("; nothing\n\n").unwrap(), Vec::<u8>::new());
    }
}
