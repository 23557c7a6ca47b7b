use super::errors::JournalError;

/// Ledger journal magic bytes: `b"LML1"`.
pub const MAGIC: &[u8; 4] = b"LML1";

/// Current journal format version: `0x0001`.
pub const VERSION: u16 = 0x0001;

/// Header size in bytes.
pub const HEADER_SIZE: usize = 16;

/// Frame header size in bytes.
pub const FRAME_HEADER_SIZE: usize = 8;

/// Maximum payload size: 16 MiB.
///
/// Bounds a whole publish envelope. With `HashType::None` every annotation key
/// is the hex of the input, so the envelope grows by twice the input size per
/// annotation; a single-annotation envelope tops out near 8 MiB of input.
/// Larger messages fail with [`JournalError::PayloadTooLarge`] before anything
/// is written.
pub const MAX_PAYLOAD_SIZE: u32 = 16 * 1024 * 1024;

const FRAME_KIND_TOPIC_MESSAGE: u8 = 0x01;
const FRAME_KIND_CONTRACT_EXECUTION: u8 = 0x02;

/// Journal file header (16 bytes): magic, version, flags, reserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalHeader {
    /// Format version.
    pub version: u16,
}

impl JournalHeader {
    /// Header for the current format version.
    pub fn new() -> Self {
        Self { version: VERSION }
    }

    /// Serializes the header to bytes.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..4].copy_from_slice(MAGIC);
        bytes[4..6].copy_from_slice(&self.version.to_le_bytes());
        bytes
    }

    /// Deserializes a header, rejecting unknown versions and non-zero flags.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, JournalError> {
        if bytes.len() < HEADER_SIZE {
            return Err(JournalError::InvalidHeader(format!(
                "header too short: {} bytes",
                bytes.len()
            )));
        }
        if &bytes[0..4] != MAGIC {
            return Err(JournalError::InvalidHeader(format!(
                "invalid magic: {:?}, expected {:?}",
                &bytes[0..4],
                MAGIC
            )));
        }
        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        if version != VERSION {
            return Err(JournalError::InvalidHeader(format!(
                "unsupported version: 0x{:04x}, expected 0x{:04x}",
                version, VERSION
            )));
        }
        if bytes[6..HEADER_SIZE].iter().any(|b| *b != 0) {
            return Err(JournalError::InvalidHeader(
                "non-zero flags or reserved bytes".to_string(),
            ));
        }
        Ok(Self { version })
    }
}

impl Default for JournalHeader {
    fn default() -> Self {
        Self::new()
    }
}

/// Record frame kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// A message appended to a topic.
    TopicMessage,
    /// A contract function execution.
    ContractExecution,
    /// Unknown kind, skipped by readers.
    Unknown(u8),
}

impl FrameKind {
    /// Creates a FrameKind from a byte value.
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            FRAME_KIND_TOPIC_MESSAGE => FrameKind::TopicMessage,
            FRAME_KIND_CONTRACT_EXECUTION => FrameKind::ContractExecution,
            _ => FrameKind::Unknown(byte),
        }
    }

    /// Returns the byte value for this kind.
    pub fn to_byte(self) -> u8 {
        match self {
            FrameKind::TopicMessage => FRAME_KIND_TOPIC_MESSAGE,
            FrameKind::ContractExecution => FRAME_KIND_CONTRACT_EXECUTION,
            FrameKind::Unknown(b) => b,
        }
    }
}

/// Record frame header (8 bytes): kind, 3 reserved bytes, little-endian length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFrame {
    /// Frame kind.
    pub kind: FrameKind,
    /// Payload length in bytes.
    pub len: u32,
}

impl RecordFrame {
    /// Creates a frame header for a payload of `len` bytes.
    pub fn new(kind: FrameKind, len: usize) -> Result<Self, JournalError> {
        match u32::try_from(len) {
            Ok(len) if len <= MAX_PAYLOAD_SIZE => Ok(Self { kind, len }),
            _ => Err(JournalError::PayloadTooLarge {
                size: len,
                max: MAX_PAYLOAD_SIZE,
            }),
        }
    }

    /// Serializes the frame header to bytes.
    pub fn to_bytes(&self) -> [u8; FRAME_HEADER_SIZE] {
        let mut bytes = [0u8; FRAME_HEADER_SIZE];
        bytes[0] = self.kind.to_byte();
        bytes[4..8].copy_from_slice(&self.len.to_le_bytes());
        bytes
    }

    /// Deserializes a frame header found at `offset`.
    pub fn from_bytes(bytes: &[u8; FRAME_HEADER_SIZE], offset: u64) -> Result<Self, JournalError> {
        if bytes[1..4] != [0u8; 3] {
            return Err(JournalError::InvalidFrame {
                offset,
                reason: "non-zero reserved bytes".to_string(),
            });
        }
        let len = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        if len > MAX_PAYLOAD_SIZE {
            return Err(JournalError::InvalidFrame {
                offset,
                reason: format!("payload size {} exceeds maximum {}", len, MAX_PAYLOAD_SIZE),
            });
        }
        Ok(Self {
            kind: FrameKind::from_byte(bytes[0]),
            len,
        })
    }
}
