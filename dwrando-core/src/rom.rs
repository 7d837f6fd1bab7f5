//! ROM image container and identity verification.

use sha1::{Digest, Sha1};

use crate::regions::RegionId;
use crate::{RandomizerError, Result};

/// iNES header plus one 64 KiB PRG bank.
pub const EXPECTED_LEN: usize = 0x10010;

/// SHA-1 digests of the known original cartridge dumps.
const PRG0_SHA1: &[&str] = &[
    "6a50ce57097332393e0e8751924fd56456ef083c",
    "66330df6fe3e3c85adb8183721e5f88c149e52eb",
    "49974889619f1d8c39b6c20fa208c62a0a73ecce",
    "d98b8a3fc93bb2f1f5016326556b68998dd5f85d",
    "e81a693efe322be9584c97b55c6d7ae38ae44a66",
    "6e1a52b7b3a13494536bbab7248690861665001a",
    "3077d5bd5c5c3744398b122d5ee1bba7055c8d45",
];
const PRG1_SHA1: &[&str] = &["1ecc63aaac50a9612eaa8b69143858c3e48dd0ae"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RomVariant {
    Prg0,
    Prg1,
    Unknown,
}

impl RomVariant {
    /// Tag used in output filenames, e.g. `DWRando.C.42.PRG0.nes`.
    pub fn file_tag(&self) -> &'static str {
        match self {
            RomVariant::Prg0 => "PRG0.",
            RomVariant::Prg1 => "PRG1.",
            RomVariant::Unknown => "",
        }
    }
}

/// The raw byte image. Mutation happens only through an applied
/// [`crate::patch::PatchLedger`]; passes work on extracted copies.
pub struct RomImage {
    data: Vec<u8>,
}

impl RomImage {
    pub fn new(data: Vec<u8>) -> Result<Self> {
        if data.len() < EXPECTED_LEN {
            return Err(RandomizerError::Config(format!(
                "ROM image is {} bytes, expected at least {}",
                data.len(),
                EXPECTED_LEN
            )));
        }
        Ok(RomImage { data })
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn extract(&self, id: RegionId) -> Vec<u8> {
        id.region().extract(&self.data)
    }

    pub fn sha1_hex(&self) -> String {
        sha1_hex(&self.data)
    }

    /// Matches the image against the known original dumps. An unknown
    /// identity is not fatal here; the caller decides whether to proceed.
    pub fn identify(&self) -> RomVariant {
        let digest = self.sha1_hex();
        if PRG0_SHA1.contains(&digest.as_str()) {
            RomVariant::Prg0
        } else if PRG1_SHA1.contains(&digest.as_str()) {
            RomVariant::Prg1
        } else {
            RomVariant::Unknown
        }
    }
}

pub fn sha1_hex(data: &[u8]) -> String {
    let digest = Sha1::digest(data);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}
