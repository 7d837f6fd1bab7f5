//! Sparse edit ledger and its on-disk IPS encoding.
//!
//! Every change the randomizer makes is captured as a record here rather
//! than written straight into the image. Records are ordered; when two
//! records target the same address the later one wins on apply, which is
//! also how the IPS format behaves on replay.

use crate::regions::Region;
use crate::{RandomizerError, Result};

const IPS_MAGIC: &[u8; 5] = b"PATCH";
const IPS_EOF: &[u8; 3] = b"EOF";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchRecord {
    /// Overwrite `bytes.len()` bytes starting at `addr`.
    Write { addr: usize, bytes: Vec<u8> },
    /// Overwrite `len` bytes at `addr` with a single fill byte.
    Fill { addr: usize, len: usize, byte: u8 },
}

#[derive(Debug, Default, Clone)]
pub struct PatchLedger {
    records: Vec<PatchRecord>,
}

impl PatchLedger {
    pub fn new() -> Self {
        PatchLedger::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn add(&mut self, addr: usize, bytes: impl Into<Vec<u8>>) {
        let bytes = bytes.into();
        if !bytes.is_empty() {
            self.records.push(PatchRecord::Write { addr, bytes });
        }
    }

    pub fn add_fill(&mut self, addr: usize, len: usize, byte: u8) {
        if len > 0 {
            self.records.push(PatchRecord::Fill { addr, len, byte });
        }
    }

    /// Records a region's worth of data. Contiguous regions become a single
    /// record; strided regions become one single-byte record per element so
    /// the bytes in between stay untouched.
    pub fn add_region(&mut self, region: Region, data: &[u8]) {
        if region.stride == 1 {
            self.add(region.offset, data);
        } else {
            for (i, &b) in data.iter().enumerate() {
                self.add(region.offset + i * region.stride, [b]);
            }
        }
    }

    /// Appends all of `other`'s records after this ledger's, preserving the
    /// relative order of each source.
    pub fn merge(&mut self, other: PatchLedger) {
        self.records.extend(other.records);
    }

    /// Applies every record to `buf` in insertion order. Each record
    /// independently overwrites its target bytes, so repeated application
    /// is idempotent. A record outside the buffer is a programmer error.
    pub fn apply(&self, buf: &mut [u8]) {
        for record in &self.records {
            match record {
                PatchRecord::Write { addr, bytes } => {
                    buf[*addr..*addr + bytes.len()].copy_from_slice(bytes);
                }
                PatchRecord::Fill { addr, len, byte } => {
                    buf[*addr..*addr + *len].fill(*byte);
                }
            }
        }
    }

    /// Serializes the ledger as an IPS patch: `PATCH`, then records of
    /// 3-byte big-endian address + 2-byte length + payload (length 0 marks
    /// a run-length record: 2-byte run length + fill byte), then `EOF`.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(IPS_MAGIC);
        for record in &self.records {
            match record {
                PatchRecord::Write { addr, bytes } => {
                    // Chunk oversized payloads; a record length field is
                    // only 16 bits.
                    for (i, chunk) in bytes.chunks(0xffff).enumerate() {
                        push_addr(&mut out, addr + i * 0xffff);
                        out.extend_from_slice(&(chunk.len() as u16).to_be_bytes());
                        out.extend_from_slice(chunk);
                    }
                }
                PatchRecord::Fill { addr, len, byte } => {
                    push_addr(&mut out, *addr);
                    out.extend_from_slice(&0u16.to_be_bytes());
                    out.extend_from_slice(&(*len as u16).to_be_bytes());
                    out.push(*byte);
                }
            }
        }
        out.extend_from_slice(IPS_EOF);
        out
    }

    /// Parses an IPS patch back into a ledger. Used to verify the encode /
    /// apply round trip.
    pub fn decode(data: &[u8]) -> Result<PatchLedger> {
        if data.len() < IPS_MAGIC.len() || &data[..IPS_MAGIC.len()] != IPS_MAGIC {
            return Err(RandomizerError::Config(
                "patch data does not start with an IPS header".to_string(),
            ));
        }

        let mut ledger = PatchLedger::new();
        let mut pos = IPS_MAGIC.len();
        loop {
            if pos + 3 > data.len() {
                return Err(RandomizerError::Config(
                    "IPS patch ended without an EOF marker".to_string(),
                ));
            }
            if &data[pos..pos + 3] == IPS_EOF {
                return Ok(ledger);
            }
            let addr =
                ((data[pos] as usize) << 16) | ((data[pos + 1] as usize) << 8) | data[pos + 2] as usize;
            pos += 3;
            if pos + 2 > data.len() {
                return Err(RandomizerError::Config("truncated IPS record".to_string()));
            }
            let len = u16::from_be_bytes([data[pos], data[pos + 1]]) as usize;
            pos += 2;
            if len == 0 {
                if pos + 3 > data.len() {
                    return Err(RandomizerError::Config("truncated IPS RLE record".to_string()));
                }
                let run = u16::from_be_bytes([data[pos], data[pos + 1]]) as usize;
                ledger.add_fill(addr, run, data[pos + 2]);
                pos += 3;
            } else {
                if pos + len > data.len() {
                    return Err(RandomizerError::Config("truncated IPS record".to_string()));
                }
                ledger.add(addr, data[pos..pos + len].to_vec());
                pos += len;
            }
        }
    }
}

fn push_addr(out: &mut Vec<u8>, addr: usize) {
    debug_assert!(addr < 1 << 24, "IPS address overflow");
    debug_assert!(
        addr.to_be_bytes()[5..] != *IPS_EOF,
        "record address collides with the EOF marker"
    );
    out.push((addr >> 16) as u8);
    out.push((addr >> 8) as u8);
    out.push(addr as u8);
}
