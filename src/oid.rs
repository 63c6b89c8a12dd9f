//! Object identifiers used by this crate.
//!
//! This module collects the object identifier constants needed to pick
//! apart the framings we support.

use bcder::{ConstOid, Oid};


/// The PKCS#7 signed-data content type.
///
/// Identifies the content of a `ContentInfo` structure as a `SignedData`
/// structure. See RFC 5652, section 5.1.
///
/// Identifier: 1.2.840.113549.1.7.2
pub const SIGNED_DATA: ConstOid =
    Oid(&[42, 134, 72, 134, 247, 13, 1, 7, 2]);


//============ Tests =========================================================
