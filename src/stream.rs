//! Looking at and framing the raw byte stream.
//!
//! Everything in this crate starts from a plain [`std::io::Read`] stream.
//! This module provides the three small tools working directly on it:
//! [`PushbackReader`] allowing a single byte of lookahead, [`sniff`] which
//! classifies the data ahead by that one byte, and [`read_frame`] which
//! copies exactly one complete BER/DER encoded value off the stream so it
//! can be decoded in memory.
//!
//! [`PushbackReader`]: struct.PushbackReader.html
//! [`sniff`]: fn.sniff.html
//! [`read_frame`]: fn.read_frame.html

use std::io;
use std::io::Read;
use std::mem;
use bytes::Bytes;
use crate::err::ParseError;


//------------ PushbackReader ------------------------------------------------

/// A reader wrapper keeping one byte of lookahead.
///
/// The byte returned by [`peek`] stays available: the next [`take_byte`] or
/// `Read::read` call will produce it again before touching the underlying
/// stream.
///
/// [`peek`]: #method.peek
/// [`take_byte`]: #method.take_byte
#[derive(Debug)]
pub struct PushbackReader<R> {
    /// The wrapped stream.
    inner: R,

    /// A byte already read off the stream but not yet consumed.
    pending: Option<u8>,
}

impl<R> PushbackReader<R> {
    /// Creates a new wrapper around a stream.
    pub fn new(inner: R) -> Self {
        PushbackReader { inner, pending: None }
    }

    /// Unwraps the reader, returning the underlying stream.
    ///
    /// A byte held in the lookahead buffer is lost.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> PushbackReader<R> {
    /// Returns the next byte without consuming it.
    ///
    /// Returns `Ok(None)` if the stream is exhausted.
    pub fn peek(&mut self) -> Result<Option<u8>, io::Error> {
        if self.pending.is_none() {
            self.pending = self.take_byte()?;
        }
        Ok(self.pending)
    }

    /// Takes the next byte off the stream.
    ///
    /// Returns `Ok(None)` if the stream is exhausted.
    pub fn take_byte(&mut self) -> Result<Option<u8>, io::Error> {
        if let Some(octet) = self.pending.take() {
            return Ok(Some(octet))
        }
        let mut buf = [0u8];
        loop {
            match self.inner.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                Err(ref err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => return Err(err),
            }
        }
    }
}


//--- Read

impl<R: Read> Read for PushbackReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, io::Error> {
        if buf.is_empty() {
            return Ok(0)
        }
        if let Some(octet) = self.pending.take() {
            buf[0] = octet;
            return Ok(1)
        }
        self.inner.read(buf)
    }
}


//------------ Encoding ------------------------------------------------------

/// The framing of the data ahead on a stream.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Encoding {
    /// Binary BER or DER encoded data.
    Der,

    /// Textual data, presumably PEM.
    Pem,
}

/// The identifier octet of a constructed value of type SEQUENCE.
///
/// Every binary framing we accept, whether a bare certificate or a
/// `ContentInfo` carrying `SignedData`, opens with this octet.
const SEQUENCE_IDENT: u8 = 0x30;

/// Classifies the data ahead on a stream by its first byte.
///
/// Returns `Ok(None)` if the stream is exhausted. Otherwise the byte is
/// left unconsumed in the lookahead buffer for whoever reads next.
pub fn sniff<R: Read>(
    source: &mut PushbackReader<R>
) -> Result<Option<Encoding>, io::Error> {
    Ok(source.peek()?.map(|octet| {
        if octet == SEQUENCE_IDENT { Encoding::Der }
        else { Encoding::Pem }
    }))
}


//------------ read_frame ----------------------------------------------------

/// The maximum nesting depth when framing indefinite length values.
const MAX_DEPTH: usize = 64;

/// Reads one complete encoded value off a stream.
///
/// Copies the identifier octets, length octets, and content of exactly one
/// BER/DER encoded value into an owned buffer, leaving the stream
/// positioned right after it. Definite lengths in short and long form,
/// multi-byte tag numbers, and indefinite length constructed values are
/// all handled.
///
/// Returns `Ok(None)` if the stream is exhausted before the first byte.
/// Running out of data anywhere later means a truncated value and results
/// in an error.
pub fn read_frame<R: Read>(
    source: &mut PushbackReader<R>
) -> Result<Option<Bytes>, ParseError> {
    let first = match source.take_byte()? {
        Some(octet) => octet,
        None => return Ok(None)
    };
    let mut frame = Vec::new();
    read_value(source, first, &mut frame, 0)?;
    Ok(Some(frame.into()))
}

/// Reads the remainder of one value whose first identifier octet is given.
///
/// Appends the complete encoding of the value, including the already
/// consumed `first` octet, to `frame`.
fn read_value<R: Read>(
    source: &mut PushbackReader<R>,
    first: u8,
    frame: &mut Vec<u8>,
    depth: usize,
) -> Result<(), ParseError> {
    if depth > MAX_DEPTH {
        return Err(ParseError::malformed("nested values too deep"))
    }
    frame.push(first);

    // Identifier octets. Tag numbers 31 and up continue into subsequent
    // octets with the high bit marking continuation.
    if first & 0x1f == 0x1f {
        loop {
            let octet = require_byte(source)?;
            frame.push(octet);
            if octet & 0x80 == 0 {
                break
            }
        }
    }

    // Length octets.
    let length = require_byte(source)?;
    frame.push(length);
    if length == 0x80 {
        // Indefinite length. Only constructed values can use it. The
        // content is a run of values ended by an end-of-value marker.
        if first & 0x20 == 0 {
            return Err(ParseError::malformed(
                "indefinite length on primitive value"
            ))
        }
        loop {
            let octet = require_byte(source)?;
            if octet == 0 {
                frame.push(octet);
                let octet = require_byte(source)?;
                frame.push(octet);
                if octet != 0 {
                    return Err(ParseError::malformed(
                        "invalid end-of-value marker"
                    ))
                }
                break
            }
            read_value(source, octet, frame, depth + 1)?;
        }
    }
    else {
        let length = if length & 0x80 == 0 {
            usize::from(length)
        }
        else {
            let count = usize::from(length & 0x7f);
            if count > mem::size_of::<usize>() {
                return Err(ParseError::malformed("value length out of range"))
            }
            let mut res = 0usize;
            for _ in 0..count {
                let octet = require_byte(source)?;
                frame.push(octet);
                res = (res << 8) | usize::from(octet);
            }
            res
        };
        read_content(source, length, frame)?;
    }
    Ok(())
}

/// Takes one byte that has to be there.
fn require_byte<R: Read>(
    source: &mut PushbackReader<R>
) -> Result<u8, ParseError> {
    match source.take_byte()? {
        Some(octet) => Ok(octet),
        None => Err(ParseError::malformed("unexpected end of data"))
    }
}

/// Appends exactly `length` content octets to the frame.
fn read_content<R: Read>(
    source: &mut PushbackReader<R>,
    length: usize,
    frame: &mut Vec<u8>,
) -> Result<(), ParseError> {
    let got = source.by_ref().take(length as u64).read_to_end(frame)?;
    if got < length {
        Err(ParseError::malformed("unexpected end of data"))
    }
    else {
        Ok(())
    }
}


//============ Tests =========================================================
