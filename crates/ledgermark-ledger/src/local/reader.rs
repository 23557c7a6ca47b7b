use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use super::errors::JournalError;
use super::frame::{FrameKind, JournalHeader, RecordFrame, FRAME_HEADER_SIZE, HEADER_SIZE};
use super::record::LedgerRecord;

/// Read mode for handling truncation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// Strict mode: truncated frames are errors.
    Strict,
    /// Permissive mode: truncation is treated as end-of-file.
    Permissive,
}

/// Sequential reader over a ledger journal.
///
/// ```rust,no_run
/// use ledgermark_ledger::local::{JournalReader, ReadMode};
///
/// let mut reader = JournalReader::open("testnet.lml", ReadMode::Strict)?;
/// while let Some(record) = reader.read_record()? {
///     println!("{}", record.transaction_id());
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct JournalReader {
    reader: BufReader<File>,
    mode: ReadMode,
    position: u64,
}

impl JournalReader {
    /// Opens a journal file and validates its header.
    pub fn open<P: AsRef<Path>>(path: P, mode: ReadMode) -> Result<Self, JournalError> {
        let mut reader = BufReader::new(File::open(path)?);
        let mut header_bytes = [0u8; HEADER_SIZE];
        reader.read_exact(&mut header_bytes).map_err(|e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                JournalError::InvalidHeader("header too short".to_string())
            } else {
                e.into()
            }
        })?;
        JournalHeader::from_bytes(&header_bytes)?;

        Ok(Self {
            reader,
            mode,
            position: HEADER_SIZE as u64,
        })
    }

    /// Returns the current read position in the file.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Fills `buf`. Returns `false` on end-of-file at a frame boundary, or on
    /// a short read in permissive mode.
    fn fill(&mut self, buf: &mut [u8], at_boundary: bool) -> Result<bool, JournalError> {
        let mut read = 0;
        while read < buf.len() {
            match self.reader.read(&mut buf[read..]) {
                Ok(0) => break,
                Ok(n) => read += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        if read == buf.len() {
            return Ok(true);
        }
        if read == 0 && at_boundary {
            return Ok(false);
        }
        match self.mode {
            ReadMode::Permissive => Ok(false),
            ReadMode::Strict => Err(JournalError::TruncatedFrame {
                offset: self.position,
            }),
        }
    }

    /// Reads the next frame. Returns `Ok(None)` at end-of-file, or at a
    /// truncated tail in permissive mode.
    pub fn read_frame(&mut self) -> Result<Option<(FrameKind, Vec<u8>)>, JournalError> {
        let mut header = [0u8; FRAME_HEADER_SIZE];
        if !self.fill(&mut header, true)? {
            return Ok(None);
        }
        let frame = RecordFrame::from_bytes(&header, self.position)?;

        let mut payload = vec![0u8; frame.len as usize];
        if !payload.is_empty() && !self.fill(&mut payload, false)? {
            return Ok(None);
        }
        self.position += (FRAME_HEADER_SIZE + payload.len()) as u64;
        Ok(Some((frame.kind, payload)))
    }

    /// Reads the next record, skipping unknown frame kinds.
    pub fn read_record(&mut self) -> Result<Option<LedgerRecord>, JournalError> {
        loop {
            match self.read_frame()? {
                None => return Ok(None),
                Some((FrameKind::TopicMessage, payload)) => {
                    return Ok(Some(LedgerRecord::TopicMessage(serde_json::from_slice(
                        &payload,
                    )?)));
                }
                Some((FrameKind::ContractExecution, payload)) => {
                    return Ok(Some(LedgerRecord::ContractExecution(
                        serde_json::from_slice(&payload)?,
                    )));
                }
                Some((FrameKind::Unknown(_), _)) => continue,
            }
        }
    }
}
