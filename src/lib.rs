//! Extraction of X.509 attribute certificates from encoded data.
//!
//! Attribute certificates bind a set of attributes to a holder without
//! carrying a public key. They appear in the wild in three framings: as a
//! bare DER-encoded `AttributeCertificate` structure, tucked into the
//! certificate bag of a PKCS#7 `SignedData` envelope, or wrapped in a
//! PEM block labelled `ATTRIBUTE CERTIFICATE`.
//!
//! The central type of this crate is [`AttrCertReader`]. It wraps any
//! [`std::io::Read`] stream, decides which of the three framings the data
//! ahead uses by looking at a single byte, and hands out the certificates
//! one by one:
//!
//! ```rust,ignore
//! use attrcert::AttrCertReader;
//!
//! let mut reader = AttrCertReader::new(file);
//! while let Some(cert) = reader.next_cert()? {
//!     // ...
//! }
//! ```
//!
//! A `SignedData` envelope may carry any number of attribute certificates
//! interleaved with other certificate kinds; the reader yields the
//! attribute certificates in their original order and skips the rest.
//! Certificates themselves are kept opaque: [`AttrCert`] checks the outer
//! shape of the structure and exposes its parts as raw encoded data but
//! does not interpret or validate any fields.
//!
//! ASN.1 decoding is done by the [`bcder`] crate.
//!
//! [`AttrCert`]: cert/struct.AttrCert.html
//! [`AttrCertReader`]: reader/struct.AttrCertReader.html

pub use self::cert::AttrCert;
pub use self::err::ParseError;
pub use self::reader::AttrCertReader;

pub mod cert;
pub mod err;
pub mod oid;
pub mod pem;
pub mod reader;
pub mod signed;
pub mod stream;
