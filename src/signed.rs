//! The certificate bag of a PKCS#7 SignedData structure.
//!
//! A `SignedData` structure can carry a set of certificates next to its
//! signed content. The only thing this crate wants from the structure is
//! that set, so everything else is skipped over. The relevant parts of
//! RFC 5652:
//!
//! ```text
//! ContentInfo             ::= SEQUENCE {
//!     contentType             ContentType,
//!     content                 [0] EXPLICIT ANY DEFINED BY contentType }
//!
//! SignedData              ::= SEQUENCE {
//!     version                 CMSVersion,
//!     digestAlgorithms        DigestAlgorithmIdentifiers,
//!     encapContentInfo        EncapsulatedContentInfo,
//!     certificates            [0] IMPLICIT CertificateSet OPTIONAL,
//!     crls                    [1] IMPLICIT RevocationInfoChoices OPTIONAL,
//!     signerInfos             SignerInfos }
//!
//! CertificateSet          ::= SET OF CertificateChoices
//!
//! CertificateChoices      ::= CHOICE {
//!     certificate             Certificate,
//!     extendedCertificate     [0] IMPLICIT ExtendedCertificate,
//!     v1AttrCert              [1] IMPLICIT AttributeCertificateV1,
//!     v2AttrCert              [2] IMPLICIT AttributeCertificateV2,
//!     other                   [3] IMPLICIT OtherCertificateFormat }
//! ```
//!
//! Each member of the certificate set becomes a [`BagEntry`] when the
//! structure is decoded; certificates are only built from the entries as
//! they are asked for.
//!
//! [`BagEntry`]: enum.BagEntry.html

use bcder::{Captured, Mode, Tag};
use bcder::decode::{self, DecodeError, IntoSource, Source};
use smallvec::SmallVec;
use crate::cert::AttrCert;
use crate::err::ParseError;
use crate::oid;


//------------ BagEntry ------------------------------------------------------

/// One member of the certificate set of a SignedData structure.
///
/// The set is a `SET OF CertificateChoices`. Only the v2 attribute
/// certificate choice ever produces output; the other choices are kept
/// merely so iteration can count past them in order.
#[derive(Clone, Debug)]
pub enum BagEntry {
    /// A v2 attribute certificate, the `[2]` choice.
    ///
    /// The captured data is the content of the implicitly tagged value,
    /// which is the body of the certificate sequence without its header.
    AttrCert(Captured),

    /// A plain public key certificate, the untagged choice.
    Cert(Captured),

    /// Any of the remaining choices.
    Other,
}

impl BagEntry {
    /// Takes the next entry from the certificate set.
    ///
    /// Returns `Ok(None)` if the set is exhausted.
    fn take_opt_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Option<Self>, DecodeError<S::Error>> {
        if let Some(cap) = cons.take_opt_constructed_if(
            Tag::CTX_2, |cons| cons.capture_all()
        )? {
            return Ok(Some(BagEntry::AttrCert(cap)))
        }
        if let Some(cap) = cons.take_opt_sequence(
            |cons| cons.capture_all()
        )? {
            return Ok(Some(BagEntry::Cert(cap)))
        }
        Ok(cons.skip_one()?.map(|()| BagEntry::Other))
    }
}


//------------ CertificateBag ------------------------------------------------

/// The certificate set of a SignedData structure, ready for iteration.
///
/// The bag keeps its entries in their original order together with a
/// cursor so that the attribute certificates among them can be handed out
/// one call at a time. Entries are visited at most once.
#[derive(Clone, Debug)]
pub struct CertificateBag {
    /// The members of the certificate set in original order.
    entries: SmallVec<[BagEntry; 4]>,

    /// The index of the next entry to visit.
    next: usize,
}

/// # Decoding
///
impl CertificateBag {
    /// Decodes a ContentInfo structure wrapping SignedData.
    ///
    /// Everything other than the certificate set is skipped. An absent
    /// certificate set results in an empty bag.
    pub fn decode<S: IntoSource>(
        source: S
    ) -> Result<Self, DecodeError<<S::Source as Source>::Error>> {
        Mode::Ber.decode(source, Self::take_from)
    }

    /// Takes a ContentInfo wrapping SignedData from a constructed value.
    pub fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        cons.take_sequence(|cons| {
            oid::SIGNED_DATA.skip_if(cons)?; // contentType
            cons.take_constructed_if(Tag::CTX_0, Self::take_signed_data)
        })
    }

    /// Parses the SignedData sequence, keeping only the certificate set.
    fn take_signed_data<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        cons.take_sequence(|cons| {
            // version -- any CMS version will do
            cons.take_primitive_if(Tag::INTEGER, |prim| prim.skip_all())?;
            cons.take_set(|cons| cons.skip_all())?; // digestAlgorithms
            cons.take_sequence(|cons| cons.skip_all())?; // encapContentInfo
            let entries = match cons.take_opt_constructed_if(
                Tag::CTX_0, Self::take_entries
            )? {
                Some(entries) => entries,
                None => SmallVec::new()
            };
            cons.skip_all()?; // crls and signerInfos
            Ok(CertificateBag { entries, next: 0 })
        })
    }

    /// Parses the members of the certificate set.
    fn take_entries<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<SmallVec<[BagEntry; 4]>, DecodeError<S::Error>> {
        let mut entries = SmallVec::new();
        while let Some(entry) = BagEntry::take_opt_from(cons)? {
            entries.push(entry)
        }
        Ok(entries)
    }
}

/// # Iteration
///
impl CertificateBag {
    /// Returns the next attribute certificate from the bag.
    ///
    /// Advances the cursor past entries of other kinds. Returns `Ok(None)`
    /// once all entries have been visited.
    pub fn next_attr_cert(
        &mut self
    ) -> Result<Option<AttrCert>, ParseError> {
        while self.next < self.entries.len() {
            let entry = &self.entries[self.next];
            self.next += 1;
            if let BagEntry::AttrCert(cap) = entry {
                let cert = cap.clone().decode(AttrCert::from_constructed)?;
                return Ok(Some(cert))
            }
        }
        Ok(None)
    }

    /// Returns the number of entries of any kind in the bag.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the bag has no entries at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use bcder::encode;
    use bcder::encode::{PrimitiveContent, Values};
    use super::*;

    /// The body of an attribute certificate whose info holds `seed`.
    fn cert_body(seed: u8) -> impl encode::Values {
        (
            encode::sequence(seed.encode()),
            encode::sequence(oid::SIGNED_DATA.encode()),
            0u8.encode_as(Tag::BIT_STRING),
        )
    }

    /// A v2 attribute certificate entry for the certificate set.
    fn attr_entry(seed: u8) -> impl encode::Values {
        encode::sequence_as(Tag::CTX_2, cert_body(seed))
    }

    /// Something that looks like a public key certificate entry.
    fn cert_entry() -> impl encode::Values {
        encode::sequence((1u8.encode(), 2u8.encode()))
    }

    /// A ContentInfo with SignedData around the given certificate set.
    fn signed_data(entries: impl encode::Values) -> Vec<u8> {
        encode::sequence((
            oid::SIGNED_DATA.encode(),
            encode::sequence_as(Tag::CTX_0, encode::sequence((
                1u8.encode(), // version
                encode::set( // digestAlgorithms
                    encode::sequence(oid::SIGNED_DATA.encode())
                ),
                encode::sequence(oid::SIGNED_DATA.encode()), // encap
                encode::sequence_as(Tag::CTX_0, entries), // certificates
            ))),
        )).to_captured(Mode::Der).into_bytes().to_vec()
    }

    #[test]
    fn mixed_bag() {
        let data = signed_data((
            cert_entry(),
            attr_entry(11),
            cert_entry(),
            attr_entry(12),
        ));
        let mut bag = CertificateBag::decode(data.as_slice()).unwrap();
        assert_eq!(bag.len(), 4);
        let first = bag.next_attr_cert().unwrap().unwrap();
        let second = bag.next_attr_cert().unwrap().unwrap();
        assert!(bag.next_attr_cert().unwrap().is_none());
        assert_eq!(
            first.info().as_slice(),
            b"\x30\x03\x02\x01\x0b"
        );
        assert_eq!(
            second.info().as_slice(),
            b"\x30\x03\x02\x01\x0c"
        );
    }

    #[test]
    fn no_matching_entries() {
        let data = signed_data((cert_entry(), cert_entry()));
        let mut bag = CertificateBag::decode(data.as_slice()).unwrap();
        assert_eq!(bag.len(), 2);
        assert!(bag.next_attr_cert().unwrap().is_none());
    }

    #[test]
    fn missing_certificate_set() {
        // No [0] tagged certificates field at all.
        let data = encode::sequence((
            oid::SIGNED_DATA.encode(),
            encode::sequence_as(Tag::CTX_0, encode::sequence((
                1u8.encode(),
                encode::set(
                    encode::sequence(oid::SIGNED_DATA.encode())
                ),
                encode::sequence(oid::SIGNED_DATA.encode()),
            ))),
        )).to_captured(Mode::Der).into_bytes().to_vec();
        let mut bag = CertificateBag::decode(data.as_slice()).unwrap();
        assert!(bag.is_empty());
        assert!(bag.next_attr_cert().unwrap().is_none());
    }

    #[test]
    fn wrong_content_type() {
        // An OID that is not signed-data must be rejected.
        const OTHER: bcder::ConstOid = bcder::Oid(
            &[42, 134, 72, 134, 247, 13, 1, 7, 1]
        );
        let data = encode::sequence((
            OTHER.encode(),
            encode::sequence_as(Tag::CTX_0, encode::sequence(1u8.encode())),
        )).to_captured(Mode::Der).into_bytes().to_vec();
        assert!(CertificateBag::decode(data.as_slice()).is_err());
    }

    #[test]
    fn malformed_entry_fails_on_demand() {
        // The bag decodes fine, constructing the certificate from the
        // broken entry is what fails.
        let broken = encode::sequence_as(
            Tag::CTX_2, 5u8.encode() // not a certificate body
        );
        let data = signed_data((attr_entry(1), broken));
        let mut bag = CertificateBag::decode(data.as_slice()).unwrap();
        assert!(bag.next_attr_cert().unwrap().is_some());
        assert!(bag.next_attr_cert().is_err());
    }
}
