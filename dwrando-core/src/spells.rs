//! Spell learn-level schedule and the per-level spell masks.
//!
//! The mask rebuild is the one place two regions are touched together: it
//! derives the mask columns from the schedule and raises the MP column of
//! the player-stats table, so it takes both working copies explicitly.

use rand::rngs::StdRng;
use rand::Rng;

pub const SPELL_COUNT: usize = 10;
const LEVELS: usize = 30;
const ROW: usize = 6;
const MP: usize = 3;
const MASK_HI: usize = 4;
const MASK_LO: usize = 5;

/// Repel's slot in the schedule; it is pinned to level 8 in every mode.
const REPEL: usize = 7;
const REPEL_LEVEL: u8 = 8;

/// A caster with any spell available needs enough MP to cast something.
const MP_FLOOR: u8 = 6;

/// Pins repel to level 8 and rebuilds the masks. Idempotent; the session
/// calls this unconditionally before the schedule randomization.
pub fn move_repel(spell_levels: &mut [u8], player_stats: &mut [u8]) {
    spell_levels[REPEL] = REPEL_LEVEL;
    update_spell_masks(spell_levels, player_stats);
}

pub fn randomize_spell_learning(
    spell_levels: &mut [u8],
    player_stats: &mut [u8],
    ultra: bool,
    rng: &mut StdRng,
) {
    move_repel(spell_levels, player_stats);
    for level in spell_levels.iter_mut() {
        if ultra {
            *level = rng.gen_range(0..=16);
        } else {
            *level = (*level as i16 + rng.gen_range(-2..=2)).clamp(0, LEVELS as i16) as u8;
        }
    }
    update_spell_masks(spell_levels, player_stats);
}

/// Rebuilds the per-level spell masks from the schedule: bit `j` is set at
/// level `l` iff `spell_levels[j] <= l`. Levels with any spell available
/// get their MP raised to at least [`MP_FLOOR`].
pub fn update_spell_masks(spell_levels: &[u8], player_stats: &mut [u8]) {
    for i in 0..LEVELS {
        let level = (i + 1) as u8;
        let mut mask: u16 = 0;
        for (j, &learned_at) in spell_levels.iter().enumerate() {
            if learned_at <= level {
                mask |= 1 << j;
            }
        }
        if mask != 0 {
            let mp = &mut player_stats[i * ROW + MP];
            *mp = (*mp).max(MP_FLOOR);
        }
        player_stats[i * ROW + MASK_LO] = (mask & 0xff) as u8;
        player_stats[i * ROW + MASK_HI] = (mask >> 8) as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    const VANILLA_LEVELS: [u8; SPELL_COUNT] = [3, 4, 7, 9, 10, 12, 13, 15, 17, 19];

    fn mask_at(stats: &[u8], level: usize) -> u16 {
        let i = level - 1;
        ((stats[i * ROW + MASK_HI] as u16) << 8) | stats[i * ROW + MASK_LO] as u16
    }

    #[test]
    fn mask_bit_set_iff_spell_learned() {
        for seed in 0..50 {
            let mut levels = VANILLA_LEVELS.to_vec();
            let mut stats = vec![0u8; LEVELS * ROW];
            let mut rng = StdRng::seed_from_u64(seed);
            randomize_spell_learning(&mut levels, &mut stats, seed % 2 == 0, &mut rng);

            for l in 1..=LEVELS {
                let mask = mask_at(&stats, l);
                for (j, &learned_at) in levels.iter().enumerate() {
                    let expected = learned_at as usize <= l;
                    assert_eq!(mask & (1 << j) != 0, expected, "seed {seed} level {l} spell {j}");
                }
            }
        }
    }

    #[test]
    fn levels_with_spells_have_mp_floor() {
        for seed in 0..50 {
            let mut levels = VANILLA_LEVELS.to_vec();
            let mut stats = vec![0u8; LEVELS * ROW];
            let mut rng = StdRng::seed_from_u64(seed);
            randomize_spell_learning(&mut levels, &mut stats, false, &mut rng);
            for l in 1..=LEVELS {
                if mask_at(&stats, l) != 0 {
                    assert!(stats[(l - 1) * ROW + MP] >= MP_FLOOR, "seed {seed} level {l}");
                }
            }
        }
    }

    #[test]
    fn move_repel_is_idempotent() {
        let mut levels = VANILLA_LEVELS.to_vec();
        let mut stats = vec![0u8; LEVELS * ROW];
        move_repel(&mut levels, &mut stats);
        let (levels_once, stats_once) = (levels.clone(), stats.clone());
        move_repel(&mut levels, &mut stats);
        assert_eq!(levels, levels_once);
        assert_eq!(stats, stats_once);
        assert_eq!(levels[REPEL], REPEL_LEVEL);
    }

    #[test]
    fn normal_tier_moves_levels_at_most_two() {
        for seed in 0..50 {
            let mut levels = VANILLA_LEVELS.to_vec();
            let mut stats = vec![0u8; LEVELS * ROW];
            let mut rng = StdRng::seed_from_u64(seed);
            randomize_spell_learning(&mut levels, &mut stats, false, &mut rng);
            for (j, &level) in levels.iter().enumerate() {
                // Repel was pinned to 8 before the perturbation.
                let base = if j == REPEL { REPEL_LEVEL } else { VANILLA_LEVELS[j] };
                assert!((level as i16 - base as i16).abs() <= 2, "seed {seed} spell {j}");
            }
        }
    }
}
