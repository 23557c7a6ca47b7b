//! Decoder for TPM2 `TPMS_ATTEST` structures.
//!
//! The layout follows TPM 2.0 Part 2 (Structures), all integers big-endian:
//!
//! ```text
//! magic u32 | type u16 | qualifiedSigner TPM2B_NAME | extraData TPM2B_DATA
//! | clockInfo (clock u64, resetCount u32, restartCount u32, safe u8)
//! | firmwareVersion u64 | attested (union selected by type)
//! ```
//!
//! Only quote, certify and creation attestations are decoded. Bytes after the
//! structure are ignored.

use thiserror::Error;

/// `TPM_GENERATED_VALUE`, the magic that opens every TPM-produced attestation.
pub const TPM_GENERATED_VALUE: u32 = 0xff54_4347;

/// `TPM_ST_ATTEST_CERTIFY`.
pub const ST_ATTEST_CERTIFY: u16 = 0x8017;
/// `TPM_ST_ATTEST_QUOTE`.
pub const ST_ATTEST_QUOTE: u16 = 0x8018;
/// `TPM_ST_ATTEST_CREATION`.
pub const ST_ATTEST_CREATION: u16 = 0x801A;

/// Upper bound on PCR selections in a quote (`HASH_COUNT` for current TPMs).
const MAX_PCR_SELECTIONS: u32 = 16;

/// Reasons a blob is not a well-formed attestation structure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TpmDecodeError {
    /// Input ended before a field could be read.
    #[error("truncated at offset {offset}: need {needed} more bytes")]
    Truncated {
        /// Offset of the field that could not be read.
        offset: usize,
        /// Bytes missing.
        needed: usize,
    },
    /// First four bytes are not `TPM_GENERATED_VALUE`.
    #[error("incorrect magic value: {0:#010x}")]
    BadMagic(u32),
    /// Attestation type is not quote, certify or creation.
    #[error("unsupported attestation type: {0:#06x}")]
    UnknownType(u16),
    /// A name's hash algorithm has no known digest size.
    #[error("unsupported name hash algorithm: {0:#06x}")]
    UnknownNameAlgorithm(u16),
    /// A name's digest does not match its hash algorithm.
    #[error("name digest for algorithm {alg:#06x} is {len} bytes")]
    NameDigestLength {
        /// Hash algorithm identifier.
        alg: u16,
        /// Length found.
        len: usize,
    },
    /// A quote selects more PCR banks than a TPM can hold.
    #[error("too many PCR selections: {0}")]
    TooManySelections(u32),
}

/// `TPM2B_NAME`: identifies an entity by handle or by hashed public area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Name {
    /// Zero-length name.
    Empty,
    /// Permanent or transient handle.
    Handle(u32),
    /// Hash algorithm and digest of the entity's public area.
    Digest {
        /// `TPM_ALG_ID` of the hash.
        alg: u16,
        /// Digest bytes.
        digest: Vec<u8>,
    },
}

/// `TPMS_CLOCK_INFO`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockInfo {
    /// Milliseconds the TPM has been powered since its last clear.
    pub clock: u64,
    /// Number of TPM resets since the last clear.
    pub reset_count: u32,
    /// Number of restarts since the last reset.
    pub restart_count: u32,
    /// Whether `clock` is guaranteed not to have rolled back.
    pub safe: bool,
}

/// One entry of a `TPML_PCR_SELECTION`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcrSelection {
    /// PCR bank hash algorithm.
    pub hash: u16,
    /// Bitmap of selected PCRs.
    pub select: Vec<u8>,
}

/// Type-specific part of an attestation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attested {
    /// `TPMS_QUOTE_INFO`.
    Quote {
        /// Selected PCRs.
        selections: Vec<PcrSelection>,
        /// Digest over the selected PCR values.
        pcr_digest: Vec<u8>,
    },
    /// `TPMS_CERTIFY_INFO`.
    Certify {
        /// Name of the certified object.
        name: Name,
        /// Qualified name of the certified object.
        qualified_name: Name,
    },
    /// `TPMS_CREATION_INFO`.
    Creation {
        /// Name of the created object.
        object_name: Name,
        /// Creation data hash.
        creation_hash: Vec<u8>,
    },
}

/// Decoded `TPMS_ATTEST`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttestationData {
    /// `TPM_ST_ATTEST_*` tag.
    pub attest_type: u16,
    /// Name of the signing key.
    pub qualified_signer: Name,
    /// Caller-supplied nonce.
    pub extra_data: Vec<u8>,
    /// Clock state when the attestation was produced.
    pub clock_info: ClockInfo,
    /// Vendor firmware version.
    pub firmware_version: u64,
    /// Type-specific content.
    pub attested: Attested,
}

/// Decodes a `TPMS_ATTEST` blob.
///
/// # Errors
///
/// Returns [`TpmDecodeError`] if the input is empty or truncated, carries the
/// wrong magic, an unsupported type, or a name hashed with an unknown algorithm.
/// Bytes left over after the structure are not an error.
pub fn decode_attestation(data: &[u8]) -> Result<AttestationData, TpmDecodeError> {
    let mut cursor = Cursor::new(data);

    let magic = cursor.u32()?;
    if magic != TPM_GENERATED_VALUE {
        return Err(TpmDecodeError::BadMagic(magic));
    }
    let attest_type = cursor.u16()?;
    let qualified_signer = cursor.name()?;
    let extra_data = cursor.sized()?;
    let clock_info = cursor.clock_info()?;
    let firmware_version = cursor.u64()?;

    let attested = match attest_type {
        ST_ATTEST_QUOTE => {
            let count = cursor.u32()?;
            if count > MAX_PCR_SELECTIONS {
                return Err(TpmDecodeError::TooManySelections(count));
            }
            let mut selections = Vec::with_capacity(count as usize);
            for _ in 0..count {
                let hash = cursor.u16()?;
                let size = cursor.u8()? as usize;
                let select = cursor.take(size)?.to_vec();
                selections.push(PcrSelection { hash, select });
            }
            Attested::Quote {
                selections,
                pcr_digest: cursor.sized()?,
            }
        }
        ST_ATTEST_CERTIFY => Attested::Certify {
            name: cursor.name()?,
            qualified_name: cursor.name()?,
        },
        ST_ATTEST_CREATION => Attested::Creation {
            object_name: cursor.name()?,
            creation_hash: cursor.sized()?,
        },
        other => return Err(TpmDecodeError::UnknownType(other)),
    };

    Ok(AttestationData {
        attest_type,
        qualified_signer,
        extra_data,
        clock_info,
        firmware_version,
        attested,
    })
}

/// Digest size of a known `TPM_ALG_ID`.
fn digest_size(alg: u16) -> Option<usize> {
    match alg {
        0x0004 => Some(20),                   // sha1
        0x000B | 0x0012 | 0x0027 => Some(32), // sha256, sm3_256, sha3_256
        0x000C | 0x0028 => Some(48),          // sha384, sha3_384
        0x000D | 0x0029 => Some(64),          // sha512, sha3_512
        _ => None,
    }
}

struct Cursor<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], TpmDecodeError> {
        if self.remaining() < len {
            return Err(TpmDecodeError::Truncated {
                offset: self.offset,
                needed: len - self.remaining(),
            });
        }
        let bytes = &self.data[self.offset..self.offset + len];
        self.offset += len;
        Ok(bytes)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], TpmDecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn u8(&mut self) -> Result<u8, TpmDecodeError> {
        Ok(self.array::<1>()?[0])
    }

    fn u16(&mut self) -> Result<u16, TpmDecodeError> {
        Ok(u16::from_be_bytes(self.array()?))
    }

    fn u32(&mut self) -> Result<u32, TpmDecodeError> {
        Ok(u32::from_be_bytes(self.array()?))
    }

    fn u64(&mut self) -> Result<u64, TpmDecodeError> {
        Ok(u64::from_be_bytes(self.array()?))
    }

    /// `TPM2B_*`: u16 length prefix followed by that many bytes.
    fn sized(&mut self) -> Result<Vec<u8>, TpmDecodeError> {
        let len = self.u16()? as usize;
        Ok(self.take(len)?.to_vec())
    }

    fn name(&mut self) -> Result<Name, TpmDecodeError> {
        let start = self.offset;
        let bytes = self.sized()?;
        match bytes.len() {
            0 => Ok(Name::Empty),
            4 => Ok(Name::Handle(u32::from_be_bytes([
                bytes[0], bytes[1], bytes[2], bytes[3],
            ]))),
            1 => Err(TpmDecodeError::Truncated {
                offset: start + 2,
                needed: 1,
            }),
            _ => {
                let alg = u16::from_be_bytes([bytes[0], bytes[1]]);
                let digest = bytes[2..].to_vec();
                match digest_size(alg) {
                    None => Err(TpmDecodeError::UnknownNameAlgorithm(alg)),
                    Some(expected) if expected != digest.len() => {
                        Err(TpmDecodeError::NameDigestLength {
                            alg,
                            len: digest.len(),
                        })
                    }
                    Some(_) => Ok(Name::Digest { alg, digest }),
                }
            }
        }
    }

    fn clock_info(&mut self) -> Result<ClockInfo, TpmDecodeError> {
        Ok(ClockInfo {
            clock: self.u64()?,
            reset_count: self.u32()?,
            restart_count: self.u32()?,
            safe: self.u8()? != 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(attest_type: u16) -> Vec<u8> {
        let mut out = TPM_GENERATED_VALUE.to_be_bytes().to_vec();
        out.extend_from_slice(&attest_type.to_be_bytes());
        out.extend_from_slice(&[0, 4, 0x40, 0, 0, 1]); // handle name
        out.extend_from_slice(&[0, 2, 0xaa, 0xbb]); // extra data
        out.extend_from_slice(&7u64.to_be_bytes());
        out.extend_from_slice(&1u32.to_be_bytes());
        out.extend_from_slice(&0u32.to_be_bytes());
        out.push(1);
        out.extend_from_slice(&0x2017_0619u64.to_be_bytes());
        out
    }

    #[test]
    fn decodes_certify() {
        let mut blob = header(ST_ATTEST_CERTIFY);
        blob.extend_from_slice(&[0, 0]);
        blob.extend_from_slice(&[0, 4, 0x81, 0, 0, 1]);
        let decoded = decode_attestation(&blob).unwrap();
        assert_eq!(decoded.qualified_signer, Name::Handle(0x4000_0001));
        assert_eq!(decoded.extra_data, vec![0xaa, 0xbb]);
        assert!(decoded.clock_info.safe);
        assert_eq!(
            decoded.attested,
            Attested::Certify {
                name: Name::Empty,
                qualified_name: Name::Handle(0x8100_0001),
            }
        );
    }

    #[test]
    fn decodes_creation_with_digest_name() {
        let mut blob = header(ST_ATTEST_CREATION);
        blob.extend_from_slice(&[0, 22, 0x00, 0x04]);
        blob.extend_from_slice(&[0x11; 20]);
        blob.extend_from_slice(&[0, 1, 0x5a]);
        let decoded = decode_attestation(&blob).unwrap();
        assert_eq!(
            decoded.attested,
            Attested::Creation {
                object_name: Name::Digest {
                    alg: 0x0004,
                    digest: vec![0x11; 20],
                },
                creation_hash: vec![0x5a],
            }
        );
    }

    #[test]
    fn rejects_time_and_audit_attestations() {
        for attest_type in [0x8014, 0x8015, 0x8016, 0x8019] {
            let mut blob = header(attest_type);
            blob.extend_from_slice(&[0u8; 64]);
            assert_eq!(
                decode_attestation(&blob),
                Err(TpmDecodeError::UnknownType(attest_type))
            );
        }
    }

    #[test]
    fn rejects_unknown_type() {
        let blob = header(0x8001);
        assert_eq!(
            decode_attestation(&blob),
            Err(TpmDecodeError::UnknownType(0x8001))
        );
    }

    #[test]
    fn ignores_trailing_bytes() {
        let mut blob = header(ST_ATTEST_CERTIFY);
        blob.extend_from_slice(&[0, 0, 0, 0]);
        blob.extend_from_slice(&[0xff, 0xff]);
        let decoded = decode_attestation(&blob).unwrap();
        assert_eq!(
            decoded.attested,
            Attested::Certify {
                name: Name::Empty,
                qualified_name: Name::Empty,
            }
        );
    }

    #[test]
    fn rejects_name_with_unknown_hash_algorithm() {
        let mut blob = header(ST_ATTEST_CERTIFY);
        blob.extend_from_slice(&[0, 3, 0x12, 0x34, 0x01]);
        blob.extend_from_slice(&[0, 0]);
        assert_eq!(
            decode_attestation(&blob),
            Err(TpmDecodeError::UnknownNameAlgorithm(0x1234))
        );
    }

    #[test]
    fn rejects_name_digest_of_wrong_length() {
        let mut blob = TPM_GENERATED_VALUE.to_be_bytes().to_vec();
        blob.extend_from_slice(&ST_ATTEST_QUOTE.to_be_bytes());
        blob.extend_from_slice(&[0, 5, 0x00, 0x0b, 1, 2, 3]);
        assert_eq!(
            decode_attestation(&blob),
            Err(TpmDecodeError::NameDigestLength { alg: 0x000b, len: 3 })
        );
    }

    #[test]
    fn empty_input_is_truncated() {
        assert_eq!(
            decode_attestation(&[]),
            Err(TpmDecodeError::Truncated {
                offset: 0,
                needed: 4
            })
        );
    }
}
