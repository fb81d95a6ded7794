/*
    commit_log.rs - Append-only record log

    Durable, sequential storage of every accepted record.
    Replayed on open to rebuild the in-memory store.

    Frame layout (little-endian):
    [seq:8][timestamp:8][len:4][data:len][crc32(data):4]

    Features:
    - Append-only writes (no in-place updates)
    - CRC32 checksums for corruption detection
    - A frame cut short by a crash at the tail is dropped on open
    - A failed append is rolled back so the file stays frame-aligned
*/

use crate::core_board::store::errors::{BoardError, BoardResult};
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

const HEADER_LEN: usize = 8 + 8 + 4;
const CHECKSUM_LEN: usize = 4;

/// Larger than any encoded record; a length above this is corruption, not a torn write
const MAX_ENTRY_LEN: usize = 64 * 1024;

/// Entry in the commit log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Sequence number, equal to the entry's position in the log
    pub seq: u64,

    /// Timestamp (seconds)
    pub timestamp: u64,

    /// Entry data (serialized record)
    pub data: Vec<u8>,

    /// CRC32 checksum of `data`
    pub checksum: u32,
}

impl LogEntry {
    pub fn new(seq: u64, timestamp: u64, data: Vec<u8>) -> Self {
        let checksum = Self::calculate_checksum(&data);
        LogEntry { seq, timestamp, data, checksum }
    }

    fn calculate_checksum(data: &[u8]) -> u32 {
        crc32fast::hash(data)
    }

    pub fn verify_checksum(&self) -> bool {
        Self::calculate_checksum(&self.data) == self.checksum
    }

    fn encode(&self) -> Vec<u8> {
        let mut frame = Vec::with_capacity(HEADER_LEN + self.data.len() + CHECKSUM_LEN);
        frame.extend_from_slice(&self.seq.to_le_bytes());
        frame.extend_from_slice(&self.timestamp.to_le_bytes());
        frame.extend_from_slice(&(self.data.len() as u32).to_le_bytes());
        frame.extend_from_slice(&self.data);
        frame.extend_from_slice(&self.checksum.to_le_bytes());
        frame
    }
}

fn read_u64(buf: &[u8]) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&buf[..8]);
    u64::from_le_bytes(bytes)
}

fn read_u32(buf: &[u8]) -> u32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&buf[..4]);
    u32::from_le_bytes(bytes)
}

/// Decode every complete frame in `bytes`.
///
/// Returns the entries and the length of the intact prefix. Bytes after that
/// prefix belong to a frame that was never finished.
fn decode_entries(bytes: &[u8]) -> BoardResult<(Vec<LogEntry>, usize)> {
    let mut entries = Vec::new();
    let mut offset = 0;

    while offset < bytes.len() {
        let rest = &bytes[offset..];
        if rest.len() < HEADER_LEN {
            break;
        }

        let seq = read_u64(&rest[0..8]);
        let timestamp = read_u64(&rest[8..16]);
        let len = read_u32(&rest[16..20]) as usize;

        if len > MAX_ENTRY_LEN {
            return Err(BoardError::CorruptedData(format!(
                "Entry length {} at seq {} exceeds {}",
                len, seq, MAX_ENTRY_LEN
            )));
        }

        let frame_len = HEADER_LEN + len + CHECKSUM_LEN;
        if rest.len() < frame_len {
            break;
        }

        let data = rest[HEADER_LEN..HEADER_LEN + len].to_vec();
        let checksum = read_u32(&rest[HEADER_LEN + len..frame_len]);
        let entry = LogEntry { seq, timestamp, data, checksum };

        if !entry.verify_checksum() {
            return Err(BoardError::CorruptedData(format!("Invalid checksum at seq {}", seq)));
        }
        if entry.seq != entries.len() as u64 {
            return Err(BoardError::CorruptedData(format!(
                "Sequence {} found at position {}",
                entry.seq,
                entries.len()
            )));
        }

        entries.push(entry);
        offset += frame_len;
    }

    Ok((entries, offset))
}

/// Append-only commit log
#[derive(Debug)]
pub struct CommitLog {
    path: PathBuf,
    file: File,
    seq: u64,
    size: u64,
}

impl CommitLog {
    /// Create or open a commit log, returning it with the entries already on disk.
    ///
    /// An unfinished frame at the end of the file is truncated away.
    pub fn open(path: PathBuf) -> BoardResult<(Self, Vec<LogEntry>)> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new().create(true).append(true).read(true).open(&path)?;

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;

        let (entries, intact) = decode_entries(&bytes)?;
        if intact < bytes.len() {
            warn!(
                path = %path.display(),
                dropped_bytes = bytes.len() - intact,
                "Dropping unfinished frame at end of commit log"
            );
            file.set_len(intact as u64)?;
        }

        let log = CommitLog { path, file, seq: entries.len() as u64, size: intact as u64 };
        Ok((log, entries))
    }

    /// Append an entry to the log and sync it to disk
    pub fn append(&mut self, timestamp: u64, data: &[u8]) -> BoardResult<u64> {
        let entry = LogEntry::new(self.seq, timestamp, data.to_vec());
        let frame = entry.encode();

        let written = self.file.write_all(&frame).and_then(|_| self.file.sync_data());
        if let Err(e) = written {
            // Cut off whatever part of the frame made it out
            if let Err(rollback) = self.file.set_len(self.size) {
                warn!(error = %rollback, "Failed to roll back partial commit log frame");
            }
            return Err(e.into());
        }

        self.size += frame.len() as u64;
        self.seq += 1;

        Ok(entry.seq)
    }

    /// Read all entries from the log file
    pub fn read_all(&self) -> BoardResult<Vec<LogEntry>> {
        let bytes = std::fs::read(&self.path)?;
        let (entries, _) = decode_entries(&bytes)?;
        Ok(entries)
    }

    /// Get the current size of the log in bytes
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Get the sequence number the next append will receive
    pub fn current_seq(&self) -> u64 {
        self.seq
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Swap the handle for a read-only one so every append fails
    #[cfg(test)]
    pub(crate) fn make_read_only(&mut self) -> std::io::Result<()> {
        self.file = File::open(&self.path)?;
        Ok(())
    }

    /// Undo `make_read_only`
    #[cfg(test)]
    pub(crate) fn make_writable(&mut self) -> std::io::Result<()> {
        self.file = OpenOptions::new().append(true).read(true).open(&self.path)?;
        Ok(())
    }
}
