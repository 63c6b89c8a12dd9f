//! Pulling attribute certificates off a stream.
//!
//! The [`AttrCertReader`] owns a byte stream and hands out the attribute
//! certificates found on it, whatever their framing: bare DER, a PKCS#7
//! SignedData envelope, or a PEM block. Since the reader owns the stream,
//! every stream gets its own extraction state and independent streams can
//! be processed concurrently through independent readers.
//!
//! [`AttrCertReader`]: struct.AttrCertReader.html

use std::io;
use bcder::{Mode, Oid};
use bytes::Bytes;
use crate::cert::AttrCert;
use crate::err::ParseError;
use crate::oid;
use crate::pem;
use crate::signed::CertificateBag;
use crate::stream;
use crate::stream::{Encoding, PushbackReader};


//------------ AttrCertReader ------------------------------------------------

/// The label of the PEM blocks we are interested in.
const PEM_LABEL: &str = "ATTRIBUTE CERTIFICATE";

/// A reader extracting attribute certificates from a byte stream.
///
/// Repeated calls to [`next_cert`] return the certificates on the stream
/// in order until `Ok(None)` signals exhaustion. A SignedData envelope
/// found on the stream contributes all the attribute certificates of its
/// certificate bag, one call each, with entries of other kinds silently
/// skipped.
///
/// Reading is blocking and synchronous; on a stream that neither produces
/// a byte nor signals end-of-input a call will hang. Timeouts are the
/// business of the stream, not of this type.
///
/// [`next_cert`]: #method.next_cert
#[derive(Debug)]
pub struct AttrCertReader<R> {
    /// The stream, wrapped for one byte of lookahead.
    source: PushbackReader<R>,

    /// The certificate bag currently being iterated, if any.
    ///
    /// This is `Some(_)` exactly while inside a SignedData envelope.
    bag: Option<CertificateBag>,
}

impl<R> AttrCertReader<R> {
    /// Creates a reader extracting certificates from the given stream.
    pub fn new(stream: R) -> Self {
        AttrCertReader {
            source: PushbackReader::new(stream),
            bag: None
        }
    }

    /// Unwraps the reader, returning the underlying stream.
    pub fn into_inner(self) -> R {
        self.source.into_inner()
    }
}

impl<'a> AttrCertReader<&'a [u8]> {
    /// Creates a reader over a byte slice.
    ///
    /// This is the convenience for data already in memory; the slice
    /// itself serves as the stream.
    pub fn from_slice(data: &'a [u8]) -> Self {
        Self::new(data)
    }
}

impl<R: io::Read> AttrCertReader<R> {
    /// Returns the next attribute certificate from the stream.
    ///
    /// Returns `Ok(None)` when the stream has run out of certificates.
    /// Once that happened, further calls keep returning `Ok(None)` unless
    /// the stream produces more data.
    ///
    /// An error means the data on the stream is unusable from the point
    /// the error occurred. If it happened while iterating a certificate
    /// bag, the remaining entries of that bag are dropped so a subsequent
    /// call continues with whatever follows on the stream instead of
    /// running into the same entry again.
    pub fn next_cert(&mut self) -> Result<Option<AttrCert>, ParseError> {
        let res = self.step();
        if res.is_err() {
            self.bag = None;
        }
        res
    }

    /// Performs one round of the extraction state machine.
    fn step(&mut self) -> Result<Option<AttrCert>, ParseError> {
        // Resume iterating a previously installed bag. An exhausted bag is
        // dropped, ending this stretch of SignedData iteration.
        if let Some(bag) = self.bag.as_mut() {
            match bag.next_attr_cert()? {
                Some(cert) => return Ok(Some(cert)),
                None => {
                    self.bag = None;
                    return Ok(None)
                }
            }
        }

        match stream::sniff(&mut self.source)? {
            None => Ok(None),
            Some(Encoding::Pem) => self.next_pem(),
            Some(Encoding::Der) => self.next_der(),
        }
    }

    /// Extracts a certificate from a PEM block.
    ///
    /// A PEM block always holds exactly one certificate, so this never
    /// installs a bag.
    fn next_pem(&mut self) -> Result<Option<AttrCert>, ParseError> {
        match pem::read_block(&mut self.source, PEM_LABEL)? {
            Some(der) => {
                AttrCert::decode(der.as_slice())
                    .map(Some).map_err(Into::into)
            }
            None => Ok(None)
        }
    }

    /// Extracts a certificate from binary DER data.
    ///
    /// Reads one complete top-level value off the stream and decides what
    /// it is before decoding it for real: a SignedData envelope has its
    /// certificate bag installed for iteration, anything else must be a
    /// bare attribute certificate.
    fn next_der(&mut self) -> Result<Option<AttrCert>, ParseError> {
        let frame = match stream::read_frame(&mut self.source)? {
            Some(frame) => frame,
            None => return Ok(None)
        };
        match classify(&frame)? {
            TopLevel::SignedData => {
                let mut bag = CertificateBag::decode(frame)?;
                let cert = bag.next_attr_cert()?;
                // The bag is kept even when it yielded nothing so that
                // the next call observes its exhaustion in order, just
                // like with a bag that did yield certificates.
                self.bag = Some(bag);
                Ok(cert)
            }
            TopLevel::BareCert => {
                AttrCert::decode(frame).map(Some).map_err(Into::into)
            }
        }
    }

    /// Returns all remaining attribute certificates on the stream.
    ///
    /// The returned sequence is in extraction order. It may well be empty.
    pub fn all_certs(&mut self) -> Result<Vec<AttrCert>, ParseError> {
        let mut res = Vec::new();
        while let Some(cert) = self.next_cert()? {
            res.push(cert)
        }
        Ok(res)
    }
}


//--- Iterator

impl<R: io::Read> Iterator for AttrCertReader<R> {
    type Item = Result<AttrCert, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_cert().transpose()
    }
}


//------------ TopLevel ------------------------------------------------------

/// The two things a top-level DER value on a stream can turn out to be.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum TopLevel {
    /// A ContentInfo structure carrying SignedData.
    SignedData,

    /// A bare attribute certificate.
    BareCert,
}

/// Classifies one framed top-level value without committing to decode it.
///
/// A sequence opening with the signed-data object identifier is an
/// envelope. A sequence opening with anything that is not an object
/// identifier can only be a bare certificate. A sequence opening with any
/// other object identifier can be neither and is rejected here rather
/// than via a doomed certificate decode.
fn classify(frame: &Bytes) -> Result<TopLevel, ParseError> {
    Mode::Ber.decode(frame.as_ref(), |cons| {
        cons.take_sequence(|cons| {
            let res = match Oid::take_opt_from(cons)? {
                Some(ref oid) if *oid == oid::SIGNED_DATA => {
                    TopLevel::SignedData
                }
                Some(_) => {
                    return Err(cons.content_err(
                        "expected attribute certificate or signed data"
                    ))
                }
                None => TopLevel::BareCert,
            };
            cons.skip_all()?;
            Ok(res)
        })
    }).map_err(Into::into)
}


//============ Tests =========================================================
