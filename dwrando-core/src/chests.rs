//! Chest content shuffling.
//!
//! Contents are canonicalized, shuffled uniformly, then repaired so that no
//! progression item ends up locked behind Charlock and the throne room
//! always holds a key.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::{RandomizerError, Result};

pub const CHEST_COUNT: usize = 31;
/// Byte position of the content code within a 4-byte chest record.
const CONTENT: usize = 3;
const RECORD: usize = 4;

/// Chest indices inside Charlock castle.
pub const CHARLOCK: [usize; 7] = [11, 12, 13, 14, 15, 16, 24];
/// Chest indices in the Tantegel throne room.
pub const THRONE_ROOM: [usize; 3] = [4, 5, 6];
/// Item codes required for game progression.
pub const QUEST_ITEMS: [u8; 4] = [10, 13, 15, 16];

const KEY: u8 = 3;
const HARP: u8 = 0x0d;
const TOKEN_CHEST: u8 = 10;
const TOKEN_GROUND: u8 = 0x17;
const LARGE_GOLD: u8 = 21;

const RETRY_LIMIT: usize = 100;

/// Shuffles the contents of the 31-chest table in place. `token_loc` is the
/// searchable-token triple; its placement flag is cleared when the coin flip
/// moves the token into a chest.
pub fn shuffle_chests(chests: &mut [u8], token_loc: &mut [u8], rng: &mut StdRng) -> Result<()> {
    let mut contents: Vec<u8> = (0..CHEST_COUNT)
        .map(|i| chests[i * RECORD + CONTENT])
        .collect();

    for c in contents.iter_mut() {
        // The harp is a dead item once zones are shuffled; trade it for a key.
        if *c == HARP {
            *c = KEY;
        }
        // Collapse the gold tiers into the large stash.
        if (18..=20).contains(c) {
            *c = LARGE_GOLD;
        }
        if *c == TOKEN_GROUND {
            if rng.gen_range(0..=1) == 1 {
                // Pull the token off the overworld and into this chest.
                token_loc[0] = 0;
                *c = TOKEN_CHEST;
            } else {
                *c = KEY;
            }
        }
    }

    contents.shuffle(rng);

    // No quest item may sit in Charlock.
    for item in QUEST_ITEMS {
        for i in CHARLOCK {
            if contents[i] == item {
                let j = swap_target(&contents, rng)?;
                contents.swap(i, j);
            }
        }
    }

    // The throne room must hold at least one key.
    if !THRONE_ROOM.iter().any(|&i| contents[i] == KEY) {
        if let Some(i) = contents.iter().position(|&c| c == KEY) {
            let mut swapped = false;
            for _ in 0..RETRY_LIMIT {
                let j = *THRONE_ROOM.as_slice().choose(rng).unwrap();
                // Never trade a quest item into a Charlock key slot.
                if CHARLOCK.contains(&i) && QUEST_ITEMS.contains(&contents[j]) {
                    continue;
                }
                contents.swap(i, j);
                swapped = true;
                break;
            }
            if !swapped {
                return Err(RandomizerError::Constraint(
                    "could not place a key in the throne room".to_string(),
                ));
            }
        } else {
            return Err(RandomizerError::Constraint(
                "no key available for the throne room".to_string(),
            ));
        }
    }

    for (i, &c) in contents.iter().enumerate() {
        chests[i * RECORD + CONTENT] = c;
    }
    Ok(())
}

/// Draws a chest index outside Charlock that holds no quest item.
fn swap_target(contents: &[u8], rng: &mut StdRng) -> Result<usize> {
    for _ in 0..RETRY_LIMIT {
        let j = non_charlock_chest(rng);
        if !QUEST_ITEMS.contains(&contents[j]) {
            return Ok(j);
        }
    }
    Err(RandomizerError::Constraint(
        "no non-Charlock slot free of quest items".to_string(),
    ))
}

/// Uniform draw over the 24 chest indices outside Charlock.
fn non_charlock_chest(rng: &mut StdRng) -> usize {
    let mut chest = rng.gen_range(0..24);
    if chest > 10 {
        chest += 6; // skip 11-16
    }
    if chest > 23 {
        chest += 1; // skip 24
    }
    chest
}
