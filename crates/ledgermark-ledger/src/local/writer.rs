use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, Write};
use std::path::Path;

use super::errors::JournalError;
use super::frame::{FrameKind, JournalHeader, RecordFrame, HEADER_SIZE};
use super::record::LedgerRecord;

/// Options for journal writing.
#[derive(Debug, Clone, Default)]
pub struct WriteOptions {
    /// Whether to fsync after each append (default: false).
    pub sync: bool,
}

/// Append-only writer for a ledger journal.
///
/// New files get a header on open; existing files must carry a valid header
/// and are always appended to.
pub struct JournalWriter {
    file: File,
    sync: bool,
}

impl JournalWriter {
    /// Opens or creates a journal file for appending.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError`] if the file cannot be opened or an existing
    /// file does not start with a valid header.
    pub fn open<P: AsRef<Path>>(path: P, options: WriteOptions) -> Result<Self, JournalError> {
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(path)?;

        let len = file.metadata()?.len();
        if len == 0 {
            file.write_all(&JournalHeader::new().to_bytes())?;
            file.flush()?;
            if options.sync {
                file.sync_all()?;
            }
        } else {
            let mut header_bytes = [0u8; HEADER_SIZE];
            file.seek(io::SeekFrom::Start(0))?;
            file.read_exact(&mut header_bytes).map_err(|e| {
                if e.kind() == io::ErrorKind::UnexpectedEof {
                    JournalError::InvalidHeader(format!("header too short: {} bytes", len))
                } else {
                    e.into()
                }
            })?;
            JournalHeader::from_bytes(&header_bytes)?;
            file.seek(io::SeekFrom::End(0))?;
        }

        Ok(Self {
            file,
            sync: options.sync,
        })
    }

    /// Appends a record as a JSON frame of the matching kind.
    pub fn append(&mut self, record: &LedgerRecord) -> Result<(), JournalError> {
        let (kind, payload) = match record {
            LedgerRecord::TopicMessage(r) => (FrameKind::TopicMessage, serde_json::to_vec(r)?),
            LedgerRecord::ContractExecution(r) => {
                (FrameKind::ContractExecution, serde_json::to_vec(r)?)
            }
        };
        self.append_raw(kind, &payload)
    }

    /// Appends a raw frame with the given kind and payload.
    pub fn append_raw(&mut self, kind: FrameKind, payload: &[u8]) -> Result<(), JournalError> {
        let frame = RecordFrame::new(kind, payload.len())?;
        self.file.write_all(&frame.to_bytes())?;
        self.file.write_all(payload)?;
        self.file.flush()?;
        if self.sync {
            self.file.sync_all()?;
        }
        Ok(())
    }

    /// Flushes and closes the file.
    pub fn finish(mut self) -> Result<(), JournalError> {
        self.file.flush()?;
        if self.sync {
            self.file.sync_all()?;
        }
        Ok(())
    }
}

impl Drop for JournalWriter {
    fn drop(&mut self) {
        let _ = self.file.flush();
        if self.sync {
            let _ = self.file.sync_all();
        }
    }
}
