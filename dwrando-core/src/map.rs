//! Overworld map collaborator.
//!
//! The engine itself never generates terrain; it only needs a tile grid to
//! answer "which open land can be reached from Tantegel" and a ledger of
//! whatever edits the map side wants applied. `MapGenerator` is the seam a
//! real generator plugs into; `VanillaMap` decodes the stock overworld from
//! the ROM and leaves it untouched.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::Rng;

use crate::patch::PatchLedger;
use crate::regions::RegionId;
use crate::rom::RomImage;
use crate::{RandomizerError, Result};

pub const MAP_SIZE: usize = 120;

/// Vanilla Tantegel castle tile on the overworld.
pub const TANTEGEL: (u8, u8) = (43, 43);

pub mod tile {
    pub const GRASS: u8 = 0;
    pub const DESERT: u8 = 1;
    pub const HILLS: u8 = 2;
    pub const MOUNTAIN: u8 = 3;
    pub const WATER: u8 = 4;
    pub const WALL: u8 = 5;
    pub const TREES: u8 = 6;
    pub const SWAMP: u8 = 7;
    pub const TOWN: u8 = 8;
    pub const CAVE: u8 = 9;
    pub const CASTLE: u8 = 10;
    pub const BRIDGE: u8 = 11;
    pub const STAIRS: u8 = 12;
}

/// A 120x120 overworld tile grid, row major.
#[derive(Debug, Clone)]
pub struct MapGrid {
    tiles: Vec<u8>,
}

impl MapGrid {
    pub fn new(tiles: Vec<u8>) -> Self {
        debug_assert_eq!(tiles.len(), MAP_SIZE * MAP_SIZE);
        MapGrid { tiles }
    }

    pub fn filled(tile: u8) -> Self {
        MapGrid { tiles: vec![tile; MAP_SIZE * MAP_SIZE] }
    }

    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.tiles[y * MAP_SIZE + x]
    }

    pub fn set(&mut self, x: usize, y: usize, tile: u8) {
        self.tiles[y * MAP_SIZE + x] = tile;
    }

    fn walkable(tile: u8) -> bool {
        !matches!(tile, tile::MOUNTAIN | tile::WATER | tile::WALL)
    }

    /// Tiles a searchable item can sit on.
    fn open_land(tile: u8) -> bool {
        matches!(
            tile,
            tile::GRASS | tile::DESERT | tile::HILLS | tile::TREES | tile::SWAMP
        )
    }

    /// Picks a uniformly random open-land tile reachable on foot from
    /// `start`. Returns `None` when no such tile exists, which means the
    /// map layout is unusable.
    pub fn accessible_land(&self, start: (u8, u8), rng: &mut StdRng) -> Option<(u8, u8)> {
        let (sx, sy) = (start.0 as usize, start.1 as usize);
        if sx >= MAP_SIZE || sy >= MAP_SIZE {
            return None;
        }

        let mut seen = vec![false; MAP_SIZE * MAP_SIZE];
        let mut queue = VecDeque::new();
        let mut land = Vec::new();
        seen[sy * MAP_SIZE + sx] = true;
        queue.push_back((sx, sy));

        while let Some((x, y)) = queue.pop_front() {
            if Self::open_land(self.get(x, y)) {
                land.push((x as u8, y as u8));
            }
            let neighbors = [
                (x.wrapping_sub(1), y),
                (x + 1, y),
                (x, y.wrapping_sub(1)),
                (x, y + 1),
            ];
            for (nx, ny) in neighbors {
                if nx < MAP_SIZE && ny < MAP_SIZE && !seen[ny * MAP_SIZE + nx] {
                    seen[ny * MAP_SIZE + nx] = true;
                    if Self::walkable(self.get(nx, ny)) {
                        queue.push_back((nx, ny));
                    }
                }
            }
        }

        if land.is_empty() {
            None
        } else {
            Some(land[rng.gen_range(0..land.len())])
        }
    }
}

/// Interface the orchestrator consumes. The generator owns its own sparse
/// edits; the orchestrator merges them into the session ledger at commit.
pub trait MapGenerator {
    /// Attempts to build a fresh layout, drawing from `rng`. Returns false
    /// on an unusable result; the caller decides how often to retry.
    fn generate(&mut self, rng: &mut StdRng) -> bool;

    /// Whether a freshly generated layout is active (as opposed to the
    /// stock map).
    fn generated(&self) -> bool;

    fn grid(&self) -> &MapGrid;

    /// Tantegel's overworld tile, the origin for hint directions.
    fn start(&self) -> (u8, u8);

    /// Hands over the generator's accumulated edits.
    fn take_ledger(&mut self) -> PatchLedger;
}

/// The stock overworld, decoded from the ROM's run-length rows. Generation
/// is a no-op: the vanilla layout is always usable as-is.
pub struct VanillaMap {
    grid: MapGrid,
    ledger: PatchLedger,
}

impl VanillaMap {
    pub fn from_rom(rom: &RomImage) -> Result<Self> {
        let buf = rom.bytes();
        let pointers = RegionId::OverworldPointers.region();
        let mut tiles = Vec::with_capacity(MAP_SIZE * MAP_SIZE);

        for row in 0..MAP_SIZE {
            let p = pointers.offset + row * 2;
            let ptr = u16::from_le_bytes([buf[p], buf[p + 1]]) as usize;
            // Row pointers are CPU addresses into the mapped bank; the file
            // offset adds the iNES header and drops the bank base.
            let mut pos = (ptr + 16).checked_sub(0x8000).ok_or_else(|| {
                RandomizerError::Config(format!("overworld row {row} pointer out of range"))
            })?;

            let mut filled = 0usize;
            while filled < MAP_SIZE {
                let b = *buf.get(pos).ok_or_else(|| {
                    RandomizerError::Config(format!("overworld row {row} is truncated"))
                })?;
                pos += 1;
                let tile = b >> 4;
                let run = ((b & 0x0f) as usize + 1).min(MAP_SIZE - filled);
                tiles.extend(std::iter::repeat(tile).take(run));
                filled += run;
            }
        }

        Ok(VanillaMap { grid: MapGrid::new(tiles), ledger: PatchLedger::new() })
    }
}

impl MapGenerator for VanillaMap {
    fn generate(&mut self, _rng: &mut StdRng) -> bool {
        true
    }

    fn generated(&self) -> bool {
        false
    }

    fn grid(&self) -> &MapGrid {
        &self.grid
    }

    fn start(&self) -> (u8, u8) {
        TANTEGEL
    }

    fn take_ledger(&mut self) -> PatchLedger {
        std::mem::take(&mut self.ledger)
    }
}
