//! Static catalog of the ROM data regions the randomizer touches.
//!
//! All offsets include the 16-byte iNES header and are fixed constants of
//! the original cartridge layout. A strided region holds one logical byte
//! every `stride` bytes (e.g. one column of a packed record table).

/// A named slice of the ROM image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub offset: usize,
    /// Number of logical bytes in the region.
    pub count: usize,
    /// Distance between consecutive logical bytes. 1 for contiguous data.
    pub stride: usize,
}

impl Region {
    pub const fn contiguous(offset: usize, count: usize) -> Self {
        Region { offset, count, stride: 1 }
    }

    pub const fn strided(offset: usize, count: usize, stride: usize) -> Self {
        Region { offset, count, stride }
    }

    /// One past the last byte the region touches.
    pub fn end(&self) -> usize {
        self.offset + (self.count - 1) * self.stride + 1
    }

    /// Copies the region's logical bytes out of `buf`. Regions are always
    /// extracted by copy and written back through the patch ledger, never
    /// aliased in place.
    pub fn extract(&self, buf: &[u8]) -> Vec<u8> {
        (0..self.count)
            .map(|i| buf[self.offset + i * self.stride])
            .collect()
    }
}

/// Every region the engine knows about. Lookups cannot fail; an unknown
/// region is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionId {
    /// 31 chests, 4 bytes each: map, x, y, content.
    Chests,
    /// 40 enemies, 16 bytes each.
    EnemyStats,
    /// 20 zone groups of 5 enemy slots.
    Zones,
    /// 64 nibble cells mapping 15x15 map blocks to zones.
    ZoneLayout,
    /// Per-spell MP cost, 10 spells.
    MpRequirements,
    /// 30 little-endian u16 XP thresholds.
    XpRequirements,
    /// 30 levels, 6 bytes each: str, agi, hp, mp, mask-hi, mask-lo.
    PlayerStats,
    /// 7 weapon shops, 0xfd-terminated inventories.
    ShopInventory,
    /// Level at which each of the 10 spells is learned.
    SpellLevels,
    /// Searchable item triples: placement flag, x, y.
    TokenLocation,
    FluteLocation,
    ArmorLocation,
    /// Forced encounter locations: map, x, y.
    Encounter1Location,
    Encounter2Location,
    Encounter3Location,
    /// Mirrors of the encounter locations used by the run handler.
    Encounter1Run,
    Encounter2Run,
    Encounter3Run,
    /// Enemy id of each forced encounter.
    EncounterEnemies,
    /// Kill-memory records for encounters 2 and 3: enemy id, location.
    Encounter2Kill,
    Encounter3Kill,
    TitleText,
    TokenDialogue,
    WillNotWorkText,
    /// RLE-encoded 120x120 overworld tile data.
    OverworldData,
    /// 120 little-endian u16 row pointers into the overworld data.
    OverworldPointers,
}

impl RegionId {
    pub const fn region(self) -> Region {
        match self {
            RegionId::Chests => Region::contiguous(0x5ddd, 124),
            RegionId::EnemyStats => Region::contiguous(0x5e5b, 640),
            RegionId::Zones => Region::contiguous(0xf55f, 100),
            RegionId::ZoneLayout => Region::contiguous(0xf532, 32),
            RegionId::MpRequirements => Region::contiguous(0x1d63, 10),
            RegionId::XpRequirements => Region::contiguous(0xf36b, 60),
            RegionId::PlayerStats => Region::contiguous(0x60dd, 180),
            RegionId::ShopInventory => Region::contiguous(0x19a1, 43),
            RegionId::SpellLevels => Region::strided(0xeaf9, 10, 4),
            RegionId::TokenLocation => Region::strided(0xe11e, 3, 6),
            RegionId::FluteLocation => Region::strided(0xe15d, 3, 6),
            RegionId::ArmorLocation => Region::strided(0xe173, 3, 6),
            RegionId::Encounter1Location => Region::strided(0xcd64, 3, 6),
            RegionId::Encounter2Location => Region::strided(0xcd7b, 3, 6),
            RegionId::Encounter3Location => Region::strided(0xcd98, 3, 6),
            RegionId::Encounter1Run => Region::strided(0xe8e7, 3, 6),
            RegionId::Encounter2Run => Region::strided(0xe90e, 3, 6),
            RegionId::Encounter3Run => Region::strided(0xe93b, 3, 6),
            RegionId::EncounterEnemies => Region::strided(0xcd74, 3, 29),
            RegionId::Encounter2Kill => Region::strided(0xe97e, 2, 6),
            RegionId::Encounter3Kill => Region::strided(0xe990, 2, 6),
            RegionId::TitleText => Region::contiguous(0x3f36, 143),
            RegionId::TokenDialogue => Region::contiguous(0xa238, 97),
            RegionId::WillNotWorkText => Region::contiguous(0xad95, 24),
            RegionId::OverworldData => Region::contiguous(0x1d6d, 0x2663 - 0x1d6d),
            RegionId::OverworldPointers => Region::contiguous(0x2663, 240),
        }
    }
}
