//! Error handling.
//!
//! Extraction can fail in exactly two ways: the stream itself refuses to
//! produce data, or the data it produces doesn't conform. Both are folded
//! into the single [`ParseError`] type re-exported at the crate root.
//!
//! [`ParseError`]: enum.ParseError.html

use std::{error, fmt, io};
use std::convert::Infallible;
use bcder::decode::{ContentError, DecodeError};


//------------ ParseError ----------------------------------------------------

/// An error happened while extracting certificates.
///
/// Running out of input is not an error: the extraction operations signal
/// exhaustion through `None` instead. Consequently, an error is always
/// terminal for the data it occurred in. When it happens while iterating
/// over the certificate bag of a `SignedData` structure, the remaining bag
/// entries are discarded.
#[derive(Debug)]
pub enum ParseError {
    /// Reading from the underlying stream failed.
    Io(io::Error),

    /// The data was not correctly encoded.
    ///
    /// The contained error describes what exactly was wrong.
    Malformed(ContentError),
}

impl ParseError {
    /// Creates a malformed-data error from a description.
    pub fn malformed(err: impl Into<ContentError>) -> Self {
        ParseError::Malformed(err.into())
    }
}


//--- From

impl From<io::Error> for ParseError {
    fn from(err: io::Error) -> Self {
        ParseError::Io(err)
    }
}

impl From<DecodeError<Infallible>> for ParseError {
    fn from(err: DecodeError<Infallible>) -> Self {
        ParseError::Malformed(err.to_string().into())
    }
}


//--- Display and Error

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParseError::Io(err) => {
                write!(f, "reading stream failed: {}", err)
            }
            ParseError::Malformed(err) => {
                write!(f, "malformed certificate data: {}", err)
            }
        }
    }
}

impl error::Error for ParseError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            ParseError::Io(err) => Some(err),
            ParseError::Malformed(_) => None,
        }
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display() {
        let err = ParseError::malformed("no certificate ahead");
        assert_eq!(
            err.to_string(),
            "malformed certificate data: no certificate ahead"
        );
        let err = ParseError::from(
            io::Error::new(io::ErrorKind::Other, "pipe broke")
        );
        assert_eq!(err.to_string(), "reading stream failed: pipe broke");
    }
}
