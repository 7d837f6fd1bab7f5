//! Enemy zone tables, zone layout, and the forced encounters.
//!
//! Twenty zone groups of five enemy slots each. The numeric range bounds
//! are fixed constants of the original data layout; they encode the game's
//! difficulty curve and are not derivable.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::{RandomizerError, Result};

pub const ZONE_COUNT: usize = 20;
pub const SLOTS_PER_ZONE: usize = 5;

/// Golem never appears as a wandering encounter.
const GOLEM: u8 = 24;
/// Pool the three forced encounters draw from in ultra mode: Golem, Axe
/// Knight, Blue Dragon, Stoneman, Armored Knight, Red Dragon.
const BOSS_POOL: [u8; 6] = [24, 33, 34, 35, 36, 37];

const RETRY_LIMIT: usize = 100;

/// Normal-tier zone table: ranges widen with the zone index, with fixed
/// wider bands for the graves, Charlock and the Rimuldar tunnel.
pub fn randomize_zones(zones: &mut [u8], rng: &mut StdRng) -> Result<()> {
    let mut new_zones = Vec::with_capacity(ZONE_COUNT * SLOTS_PER_ZONE);

    // Zone 0 surrounds Tantegel; keep it tame.
    for _ in 0..SLOTS_PER_ZONE {
        new_zones.push(rng.gen_range(0..=6u8) / 2);
    }

    // Zones 1-13: overworld, difficulty scaling with distance.
    for i in 1..=13u8 {
        let lo = i * 2 - 2;
        let hi = (i * 3).min(37);
        for _ in 0..SLOTS_PER_ZONE {
            new_zones.push(draw_avoiding_golem(lo, hi, rng)?);
        }
    }

    // Zone 14: Garin's Grave.
    for _ in 0..SLOTS_PER_ZONE {
        new_zones.push(rng.gen_range(7..=17));
    }
    // Zone 15: lower Garin's Grave.
    for _ in 0..SLOTS_PER_ZONE {
        new_zones.push(rng.gen_range(15..=23));
    }
    // Zones 16-18: Charlock.
    for i in 16..=18u8 {
        for _ in 0..SLOTS_PER_ZONE {
            new_zones.push(rng.gen_range(13 + i..=37));
        }
    }
    // Zone 19: Rimuldar tunnel.
    for _ in 0..SLOTS_PER_ZONE {
        new_zones.push(rng.gen_range(3..=11));
    }

    zones.copy_from_slice(&new_zones);
    Ok(())
}

fn draw_avoiding_golem(lo: u8, hi: u8, rng: &mut StdRng) -> Result<u8> {
    for _ in 0..RETRY_LIMIT {
        let enemy = rng.gen_range(lo..=hi);
        if enemy != GOLEM {
            return Ok(enemy);
        }
    }
    Err(RandomizerError::Constraint(format!(
        "could not draw a non-Golem enemy in {lo}..={hi}"
    )))
}

/// Ultra-tier zone table plus forced-encounter assignment. When a generated
/// map is active the zone layout itself is rerolled as well.
#[allow(clippy::too_many_arguments)]
pub fn randomize_zones_ultra(
    zones: &mut [u8],
    zone_layout: &mut [u8],
    encounter_enemies: &mut [u8],
    encounter_2_kill: &mut [u8],
    encounter_3_kill: &mut [u8],
    map_generated: bool,
    tantegel: (u8, u8),
    rng: &mut StdRng,
) {
    if map_generated {
        randomize_zone_layout(zone_layout, tantegel, rng);
    }

    let mut new_zones = Vec::with_capacity(ZONE_COUNT * SLOTS_PER_ZONE);
    for _ in 0..SLOTS_PER_ZONE {
        new_zones.push(rng.gen_range(0..=6));
    }
    for _ in 0..SLOTS_PER_ZONE {
        // Without a fresh layout, zone 1 still rings the starting area.
        if map_generated {
            new_zones.push(rng.gen_range(0..=37));
        } else {
            new_zones.push(rng.gen_range(0..=6));
        }
    }
    for _ in 0..(14 * SLOTS_PER_ZONE) {
        new_zones.push(rng.gen_range(0..=37));
    }
    for _ in 0..(3 * SLOTS_PER_ZONE) {
        new_zones.push(rng.gen_range(29..=37));
    }
    for _ in 0..SLOTS_PER_ZONE {
        new_zones.push(rng.gen_range(0..=37));
    }
    zones.copy_from_slice(&new_zones);

    // Forced encounters come from the boss pool; the kill-memory records
    // must name the same enemy or the fight replays wrong.
    for slot in encounter_enemies.iter_mut() {
        *slot = *BOSS_POOL.as_slice().choose(rng).unwrap();
    }
    encounter_2_kill[0] = encounter_enemies[1];
    encounter_3_kill[0] = encounter_enemies[2];
}

/// Rerolls which 15x15 map block belongs to which zone. Two cells pack into
/// one byte, high nibble first. Tantegel's cell is forced back to zone 0.
pub fn randomize_zone_layout(zone_layout: &mut [u8], tantegel: (u8, u8), rng: &mut StdRng) {
    for cell in zone_layout.iter_mut() {
        *cell = (rng.gen_range(1..=15u8) << 4) | rng.gen_range(1..=15u8);
    }

    let (tx, ty) = (tantegel.0 as usize, tantegel.1 as usize);
    let cell_index = (ty / 15) * 8 + tx / 15;
    if cell_index % 2 == 1 {
        zone_layout[cell_index / 2] &= 0xf0;
    } else {
        zone_layout[cell_index / 2] &= 0x0f;
    }
}
