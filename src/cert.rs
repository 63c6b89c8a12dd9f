//! The attribute certificate itself.
//!
//! An X.509 attribute certificate is defined in RFC 5755 as:
//!
//! ```text
//! AttributeCertificate ::= SEQUENCE {
//!     acinfo              AttributeCertificateInfo,
//!     signatureAlgorithm  AlgorithmIdentifier,
//!     signatureValue      BIT STRING }
//! ```
//!
//! This crate only locates and frames certificates, it doesn't interpret
//! them, so [`AttrCert`] checks that a value has this overall shape and
//! otherwise keeps the parts as raw encoded data for someone else to dig
//! into.
//!
//! [`AttrCert`]: struct.AttrCert.html

use bcder::{BitString, Captured, Mode};
use bcder::decode::{self, DecodeError, IntoSource, Source};


//------------ AttrCert ------------------------------------------------------

/// An X.509 attribute certificate.
///
/// The type keeps the constituent parts of the certificate in their
/// encoded form. No fields are interpreted and no validation beyond the
/// outer structure is performed.
#[derive(Clone, Debug)]
pub struct AttrCert {
    /// The AttributeCertificateInfo sequence with the actual content.
    info: Captured,

    /// The AlgorithmIdentifier sequence of the signature algorithm.
    algorithm: Captured,

    /// The signature over the info sequence.
    signature: BitString,
}

/// # Decoding
///
impl AttrCert {
    /// Decodes a bare DER or BER encoded attribute certificate.
    pub fn decode<S: IntoSource>(
        source: S
    ) -> Result<Self, DecodeError<<S::Source as Source>::Error>> {
        Mode::Ber.decode(source, Self::take_from)
    }

    /// Takes a single attribute certificate from a constructed value.
    pub fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        cons.take_sequence(Self::from_constructed)
    }

    /// Parses the content of the attribute certificate sequence.
    ///
    /// This is split out from [`take_from`] because the certificate bag of
    /// a `SignedData` structure carries the content implicitly tagged,
    /// without the sequence header.
    ///
    /// [`take_from`]: #method.take_from
    pub fn from_constructed<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        Ok(AttrCert {
            info: cons.capture(|cons| {
                cons.take_sequence(|cons| cons.skip_all())
            })?,
            algorithm: cons.capture(|cons| {
                cons.take_sequence(|cons| cons.skip_all())
            })?,
            signature: BitString::take_from(cons)?,
        })
    }
}

/// # Access to the Parts
///
impl AttrCert {
    /// Returns the raw AttributeCertificateInfo sequence.
    pub fn info(&self) -> &Captured {
        &self.info
    }

    /// Returns the raw AlgorithmIdentifier sequence.
    pub fn algorithm(&self) -> &Captured {
        &self.algorithm
    }

    /// Returns the signature value.
    pub fn signature(&self) -> &BitString {
        &self.signature
    }
}


//============ Tests =========================================================
