//! Scanning text for PEM blocks.
//!
//! PEM wraps base64 encoded DER data between delimiter lines of the form
//! `-----BEGIN <label>-----` and `-----END <label>-----`. This module
//! finds one such block with a given label on a stream and hands back the
//! decoded payload.
//!
//! Reading is strictly byte-by-byte so nothing past the end delimiter is
//! consumed and the stream can be scanned again for further blocks.

use std::io;
use std::io::Read;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use crate::err::ParseError;
use crate::stream::PushbackReader;


//------------ read_block ----------------------------------------------------

/// Scans a stream for a PEM block with the given label.
///
/// Discards data until a line reading `-----BEGIN <label>-----` is found,
/// then collects the base64 body up to the matching end line and decodes
/// it. Returns `Ok(None)` if the stream runs out before a begin line shows
/// up. A block that is begun but never ended, or a body that is not valid
/// base64, is an error.
pub fn read_block<R: Read>(
    source: &mut PushbackReader<R>,
    label: &str,
) -> Result<Option<Vec<u8>>, ParseError> {
    let begin = format!("-----BEGIN {}-----", label).into_bytes();
    let end = format!("-----END {}-----", label).into_bytes();

    loop {
        match read_line(source)? {
            Some(line) => {
                if trim(&line) == begin.as_slice() {
                    break
                }
            }
            None => return Ok(None)
        }
    }

    let mut body = Vec::new();
    loop {
        let line = match read_line(source)? {
            Some(line) => line,
            None => {
                return Err(ParseError::malformed("unterminated PEM block"))
            }
        };
        let line = trim(&line);
        if line == end.as_slice() {
            break
        }
        body.extend_from_slice(line);
    }

    match STANDARD.decode(&body) {
        Ok(data) => Ok(Some(data)),
        Err(err) => Err(ParseError::malformed(err.to_string()))
    }
}

/// Reads one line off the stream.
///
/// A line ends with a line feed, which is consumed but not included.
/// Returns `Ok(None)` on end of input; a final line without a line feed is
/// still returned.
fn read_line<R: Read>(
    source: &mut PushbackReader<R>
) -> Result<Option<Vec<u8>>, io::Error> {
    let mut line = Vec::new();
    loop {
        match source.take_byte()? {
            Some(b'\n') => return Ok(Some(line)),
            Some(octet) => line.push(octet),
            None => {
                return Ok(if line.is_empty() { None } else { Some(line) })
            }
        }
    }
}

/// Strips leading and trailing ASCII whitespace, carriage returns included.
fn trim(mut line: &[u8]) -> &[u8] {
    while let Some((first, rest)) = line.split_first() {
        if first.is_ascii_whitespace() { line = rest }
        else { break }
    }
    while let Some((last, rest)) = line.split_last() {
        if last.is_ascii_whitespace() { line = rest }
        else { break }
    }
    line
}


//============ Tests =========================================================
